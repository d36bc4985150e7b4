use float_cmp::{approx_eq, F64Margin};
use ndarray::{azip, Array1};
use num_complex::Complex64;

/// Tolerance used by [`ApproxEq`]. Two values compare equal when they are within
/// `epsilon` (absolute) or `ulps`, or when their difference is within `relative`
/// of the larger magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumMargin {
    pub epsilon: f64,
    pub relative: f64,
    pub ulps: i64,
}

impl NumMargin {
    pub fn new(epsilon: f64, relative: f64, ulps: i64) -> Self {
        NumMargin {
            epsilon,
            relative,
            ulps,
        }
    }

    pub fn absolute(epsilon: f64) -> Self {
        NumMargin {
            epsilon,
            relative: 0.0,
            ulps: 4,
        }
    }

    pub fn relative(relative: f64) -> Self {
        NumMargin {
            epsilon: 0.0,
            relative,
            ulps: 4,
        }
    }

    fn f64_margin(&self) -> F64Margin {
        F64Margin {
            epsilon: self.epsilon,
            ulps: self.ulps,
        }
    }
}

impl Default for NumMargin {
    fn default() -> Self {
        NumMargin {
            epsilon: 1e-10,
            relative: 1e-12,
            ulps: 4,
        }
    }
}

/// Approximate comparison used throughout the test suites
pub trait ApproxEq {
    fn approx_eq(&self, other: &Self, margin: NumMargin) -> bool;

    fn assert_approx_eq(&self, other: &Self, margin: NumMargin, test: &str, idx: &str);
}

impl ApproxEq for f64 {
    fn approx_eq(&self, other: &Self, margin: NumMargin) -> bool {
        if self == other {
            return true;
        }
        if approx_eq!(f64, *self, *other, margin.f64_margin()) {
            return true;
        }
        let largest = self.abs().max(other.abs());
        (self - other).abs() <= margin.relative * largest
    }

    fn assert_approx_eq(&self, other: &Self, margin: NumMargin, test: &str, idx: &str) {
        assert!(
            self.approx_eq(other, margin),
            " Failed test {} at location {}\n  exemplar: {}\n      calc: {}",
            test,
            idx,
            other,
            self
        );
    }
}

impl ApproxEq for Complex64 {
    fn approx_eq(&self, other: &Self, margin: NumMargin) -> bool {
        self.re.approx_eq(&other.re, margin) && self.im.approx_eq(&other.im, margin)
    }

    fn assert_approx_eq(&self, other: &Self, margin: NumMargin, test: &str, idx: &str) {
        self.re
            .assert_approx_eq(&other.re, margin, test, &(idx.to_owned() + ".re"));
        self.im
            .assert_approx_eq(&other.im, margin, test, &(idx.to_owned() + ".im"));
    }
}

impl<T: ApproxEq> ApproxEq for Array1<T> {
    fn approx_eq(&self, other: &Self, margin: NumMargin) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.approx_eq(b, margin))
    }

    fn assert_approx_eq(&self, other: &Self, margin: NumMargin, test: &str, idx: &str) {
        assert_eq!(
            self.len(),
            other.len(),
            "test {} length mismatch at {}",
            test,
            idx
        );
        azip!((index i, a in self, b in other) {
            a.assert_approx_eq(b, margin, test, format!("{}({})", idx, i).as_str());
        });
    }
}

pub fn comp_f64(exemplar: &f64, calc: &f64, precision: NumMargin, test: &str, idx: &str) {
    calc.assert_approx_eq(exemplar, precision, test, idx);
}

pub fn comp_c64(
    exemplar: &Complex64,
    calc: &Complex64,
    precision: NumMargin,
    test: &str,
    idx: &str,
) {
    calc.assert_approx_eq(exemplar, precision, test, idx);
}

pub fn comp_array_f64(
    exemplar: &Array1<f64>,
    calc: &Array1<f64>,
    precision: NumMargin,
    test: &str,
) {
    calc.assert_approx_eq(exemplar, precision, test, "");
}
