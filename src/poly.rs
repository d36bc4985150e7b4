//! Polynomial helpers. Coefficients are ordered from the highest power down,
//! so `[1, 3, 3]` is `s² + 3s + 3`.

use crate::error::{Result, RfError};
use log::trace;
use num_complex::{c64, Complex64};
use std::f64::consts::PI;

const MAX_ITER: usize = 500;
/// Relative step below which a root stops moving
const STEP_TOL: f64 = 1e-12;
/// Unfrozen sweeps run once every root has settled
const POLISH_SWEEPS: usize = 3;

/// Monic polynomial with the given roots
pub fn poly_from_roots(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![c64(1.0, 0.0)];
    for &r in roots {
        coeffs.push(c64(0.0, 0.0));
        for i in (1..coeffs.len()).rev() {
            let prev = coeffs[i - 1];
            coeffs[i] -= r * prev;
        }
    }
    coeffs
}

/// Real parts of the coefficients of a polynomial whose complex roots come in
/// conjugate pairs
pub fn real_poly_from_roots(roots: &[Complex64]) -> Vec<f64> {
    poly_from_roots(roots).iter().map(|c| c.re).collect()
}

fn polyval_with_derivative(coeffs: &[Complex64], x: Complex64) -> (Complex64, Complex64) {
    let mut p = c64(0.0, 0.0);
    let mut dp = c64(0.0, 0.0);
    for &c in coeffs {
        dp = dp * x + p;
        p = p * x + c;
    }
    (p, dp)
}

/// All roots of a real polynomial by the Aberth–Ehrlich simultaneous iteration
pub fn roots(coeffs: &[f64]) -> Result<Vec<Complex64>> {
    let first = coeffs
        .iter()
        .position(|c| *c != 0.0)
        .ok_or_else(|| RfError::input("coeffs", "zero polynomial has no roots"))?;
    let lead = coeffs[first];
    let monic: Vec<Complex64> = coeffs[first..].iter().map(|c| c64(c / lead, 0.0)).collect();
    let n = monic.len() - 1;
    if n == 0 {
        return Ok(vec![]);
    }
    if monic.iter().any(|c| !c.re.is_finite()) {
        return Err(RfError::input("coeffs", "coefficients must be finite"));
    }

    // start on a circle whose radius matches the geometric mean of the root magnitudes
    let radius = monic[n].norm().powf(1.0 / n as f64).max(f64::MIN_POSITIVE.sqrt());
    let mut z: Vec<Complex64> = (0..n)
        .map(|k| Complex64::from_polar(radius, 2.0 * PI * k as f64 / n as f64 + 0.4))
        .collect();

    // Horner rounding bound on |p(z)|, scaled by the coefficient magnitudes
    let abs_coeffs: Vec<f64> = monic.iter().map(|c| c.norm()).collect();
    let noise = |r: f64| {
        4.0 * n as f64 * f64::EPSILON * abs_coeffs.iter().fold(0.0_f64, |acc, &c| acc * r + c)
    };

    let mut settled = vec![false; n];
    for iter in 0..MAX_ITER {
        for k in 0..n {
            if settled[k] {
                continue;
            }
            let (p, _) = polyval_with_derivative(&monic, z[k]);
            if p.norm() <= noise(z[k].norm()) {
                settled[k] = true;
                continue;
            }
            if let Some(step) = aberth_step(&monic, &z, k) {
                z[k] -= step;
                settled[k] = step.norm() <= STEP_TOL * z[k].norm().max(1.0);
            }
        }
        if settled.iter().all(|s| *s) {
            for _ in 0..POLISH_SWEEPS {
                for k in 0..n {
                    if let Some(step) = aberth_step(&monic, &z, k) {
                        z[k] -= step;
                    }
                }
            }
            trace!("aberth converged after {} iterations for degree {}", iter + 1, n);
            return Ok(z);
        }
    }
    Err(RfError::NoRealSolution(format!(
        "root finder did not converge for degree {} polynomial",
        n
    )))
}

/// Aberth correction for root `k`, `None` on an exact root or a non-finite step
fn aberth_step(monic: &[Complex64], z: &[Complex64], k: usize) -> Option<Complex64> {
    let (p, dp) = polyval_with_derivative(monic, z[k]);
    if p.norm() == 0.0 {
        return None;
    }
    let ratio = p / dp;
    let repulsion: Complex64 = (0..z.len())
        .filter(|&j| j != k)
        .map(|j| (z[k] - z[j]).inv())
        .sum();
    let step = ratio / (c64(1.0, 0.0) - ratio * repulsion);
    if step.re.is_finite() && step.im.is_finite() {
        Some(step)
    } else {
        None
    }
}

#[cfg(test)]
mod poly_tests {
    use super::*;
    use crate::util::{comp_f64, NumMargin};

    fn sorted(mut r: Vec<Complex64>) -> Vec<Complex64> {
        r.sort_by(|a, b| {
            a.re.partial_cmp(&b.re)
                .unwrap()
                .then(a.im.partial_cmp(&b.im).unwrap())
        });
        r
    }

    #[test]
    fn test_poly_from_roots() {
        let c = real_poly_from_roots(&[c64(-1.0, 1.0), c64(-1.0, -1.0)]);
        assert_eq!(c, vec![1.0, 2.0, 2.0]);
        let c = real_poly_from_roots(&[]);
        assert_eq!(c, vec![1.0]);
        let c = real_poly_from_roots(&[c64(1.0, 0.0), c64(2.0, 0.0), c64(3.0, 0.0)]);
        assert_eq!(c, vec![1.0, -6.0, 11.0, -6.0]);
    }

    #[test]
    fn test_roots_real() {
        let r = sorted(roots(&[2.0, -12.0, 22.0, -12.0]).unwrap());
        for (i, expected) in [1.0, 2.0, 3.0].iter().enumerate() {
            comp_f64(expected, &r[i].re, NumMargin::absolute(1e-9), "real roots", "re");
            comp_f64(&0.0, &r[i].im, NumMargin::absolute(1e-9), "real roots", "im");
        }
    }

    #[test]
    fn test_roots_complex() {
        // s² + 3s + 3, second order Bessel
        let r = sorted(roots(&[1.0, 3.0, 3.0]).unwrap());
        let sq = 3.0_f64.sqrt() / 2.0;
        comp_f64(&-1.5, &r[0].re, NumMargin::absolute(1e-12), "bessel2", "re0");
        comp_f64(&-sq, &r[0].im, NumMargin::absolute(1e-12), "bessel2", "im0");
        comp_f64(&-1.5, &r[1].re, NumMargin::absolute(1e-12), "bessel2", "re1");
        comp_f64(&sq, &r[1].im, NumMargin::absolute(1e-12), "bessel2", "im1");
    }

    #[test]
    fn test_roots_wide_coefficient_range() {
        // reverse Bessel polynomial of degree 20, constant term near 3e23
        let n = 20;
        let mut a = vec![0.0; n + 1];
        a[n] = 1.0;
        for k in (0..n).rev() {
            a[k] = a[k + 1] * ((2 * n - k) * (k + 1)) as f64 / (2 * (n - k)) as f64;
        }
        let coeffs: Vec<f64> = a.iter().rev().copied().collect();
        let r = roots(&coeffs).unwrap();
        assert_eq!(r.len(), n);
        assert!(r.iter().all(|z| z.re < 0.0));
        // sum of reciprocal roots is -a1/a0 = -1
        let recip: f64 = r.iter().map(|z| z.inv().re).sum();
        comp_f64(&-1.0, &recip, NumMargin::absolute(1e-7), "bessel20", "reciprocal sum");
    }

    #[test]
    fn test_roots_degenerate() {
        assert!(roots(&[0.0, 0.0]).is_err());
        assert!(roots(&[5.0]).unwrap().is_empty());
        let r = roots(&[0.0, 2.0, -4.0]).unwrap();
        assert_eq!(r.len(), 1);
        comp_f64(&2.0, &r[0].re, NumMargin::absolute(1e-12), "leading zero", "");
    }
}
