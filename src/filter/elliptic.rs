//! Jacobi elliptic functions and complete elliptic integrals needed by the
//! elliptic (Cauer) prototype. The parameter `m` is `k²` throughout.

use crate::error::{Result, RfError};
use num_complex::{c64, Complex64};
use std::f64::consts::{FRAC_PI_2, PI};

const MACHEP: f64 = 1.11022302462515654042e-16;
const MAX_LANDEN: usize = 10;
/// Number of theta series terms used in the degree equation
const MMAX: i32 = 7;

fn agm(mut a: f64, mut b: f64) -> f64 {
    for _ in 0..64 {
        if (a - b).abs() <= MACHEP * a {
            break;
        }
        let an = 0.5 * (a + b);
        b = (a * b).sqrt();
        a = an;
    }
    a
}

/// Complete elliptic integral of the first kind `K(m)`
pub fn ellipk(m: f64) -> Result<f64> {
    ellipkm1(1.0 - m)
}

/// `K(1 - p)`, accurate for `m` close to one
pub fn ellipkm1(p: f64) -> Result<f64> {
    if !(p > 0.0 && p <= 1.0) {
        return Err(RfError::input(
            "m",
            format!("elliptic parameter must lie in [0, 1), got 1 - {}", p),
        ));
    }
    Ok(FRAC_PI_2 / agm(1.0, p.sqrt()))
}

/// Values of the Jacobi elliptic functions at one argument
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jacobi {
    pub sn: f64,
    pub cn: f64,
    pub dn: f64,
    /// Amplitude φ
    pub ph: f64,
}

/// Jacobi elliptic functions `sn, cn, dn` of real `u` and parameter `0 ≤ m ≤ 1`
pub fn ellipj(u: f64, m: f64) -> Result<Jacobi> {
    if !(0.0..=1.0).contains(&m) || !u.is_finite() {
        return Err(RfError::input(
            "m",
            format!("ellipj needs 0 <= m <= 1 and finite u, got m = {}, u = {}", m, u),
        ));
    }

    if m < 1e-9 {
        let t = u.sin();
        let b = u.cos();
        let ai = 0.25 * m * (u - t * b);
        return Ok(Jacobi {
            sn: t - ai * b,
            cn: b + ai * t,
            dn: 1.0 - 0.5 * m * t * t,
            ph: u - ai,
        });
    }

    if m >= 0.9999999999 {
        let mut ai = 0.25 * (1.0 - m);
        let b = u.cosh();
        let t = u.tanh();
        let phi = 1.0 / b;
        let twon = b * u.sinh();
        let sn = t + ai * (twon - u) / (b * b);
        let ph = 2.0 * u.exp().atan() - FRAC_PI_2 + ai * (twon - u) / b;
        ai *= t * phi;
        return Ok(Jacobi {
            sn,
            cn: phi - ai * (twon - u),
            dn: phi + ai * (twon + u),
            ph,
        });
    }

    // descending Landen / AGM scale
    let mut a = [0.0; 9];
    let mut c = [0.0; 9];
    a[0] = 1.0;
    let mut b = (1.0 - m).sqrt();
    c[0] = m.sqrt();
    let mut twon = 1.0;
    let mut i = 0;
    while (c[i] / a[i]).abs() > MACHEP && i < 8 {
        let ai = a[i];
        i += 1;
        c[i] = 0.5 * (ai - b);
        let t = (ai * b).sqrt();
        a[i] = 0.5 * (ai + b);
        b = t;
        twon *= 2.0;
    }

    let mut phi = twon * a[i] * u;
    let mut prev = phi;
    while i > 0 {
        let t = c[i] * phi.sin() / a[i];
        prev = phi;
        phi = (t.asin() + phi) / 2.0;
        i -= 1;
    }
    let cn = phi.cos();
    Ok(Jacobi {
        sn: phi.sin(),
        cn,
        dn: cn / (phi - prev).cos(),
        ph: phi,
    })
}

/// Solves the degree equation: the parameter `m` for which an order `n`
/// elliptic filter has discrimination parameter `m1`
pub fn ellipdeg(n: usize, m1: f64) -> Result<f64> {
    let k1 = ellipk(m1)?;
    let k1p = ellipkm1(m1)?;
    let q1 = (-PI * k1p / k1).exp();
    let q = q1.powf(1.0 / n as f64);

    let num: f64 = (0..=MMAX).map(|m| q.powi(m * (m + 1))).sum();
    let den: f64 = 1.0 + 2.0 * (1..=MMAX + 1).map(|m| q.powi(m * m)).sum::<f64>();
    Ok(16.0 * q * (num / den).powi(4))
}

fn complement(kx: Complex64) -> Complex64 {
    ((c64(1.0, 0.0) - kx) * (c64(1.0, 0.0) + kx)).sqrt()
}

/// Inverse Jacobi `sn` for complex `w`, by Landen transformations
pub fn arc_jac_sn(w: Complex64, m: f64) -> Result<Complex64> {
    let k = m.sqrt();
    if !(0.0..=1.0).contains(&k) {
        return Err(RfError::input("m", format!("must lie in [0, 1], got {}", m)));
    }
    if k == 1.0 {
        return Ok(w.atanh());
    }

    let mut ks = vec![k];
    while let Some(&last) = ks.last() {
        if last == 0.0 {
            break;
        }
        if ks.len() > MAX_LANDEN {
            return Err(RfError::NoRealSolution(format!(
                "Landen sequence for m = {} did not reach zero",
                m
            )));
        }
        let kp = complement(c64(last, 0.0)).re;
        ks.push((1.0 - kp) / (1.0 + kp));
    }

    let capk = ks[1..].iter().map(|kn| 1.0 + kn).product::<f64>() * FRAC_PI_2;
    let mut wn = w;
    for pair in ks.windows(2) {
        let (kn, knext) = (pair[0], pair[1]);
        wn = 2.0 * wn / ((1.0 + knext) * (c64(1.0, 0.0) + complement(kn * wn)));
    }
    let u = 2.0 / PI * wn.asin();
    Ok(capk * u)
}

/// Real inverse of the Jacobi `sc` function with complementary parameter
pub fn arc_jac_sc1(w: f64, m: f64) -> Result<f64> {
    let z = arc_jac_sn(c64(0.0, w), m)?;
    Ok(z.im)
}

#[cfg(test)]
mod elliptic_tests {
    use super::*;
    use crate::util::{comp_f64, NumMargin};

    #[test]
    fn test_ellipk() {
        comp_f64(&FRAC_PI_2, &ellipk(0.0).unwrap(), NumMargin::default(), "K(0)", "");
        comp_f64(
            &1.8540746773013719,
            &ellipk(0.5).unwrap(),
            NumMargin::absolute(1e-13),
            "K(0.5)",
            "",
        );
        comp_f64(
            &2.5780921133481733,
            &ellipk(0.9).unwrap(),
            NumMargin::absolute(1e-13),
            "K(0.9)",
            "",
        );
        comp_f64(
            &ellipk(0.1).unwrap(),
            &ellipkm1(0.9).unwrap(),
            NumMargin::absolute(1e-14),
            "K'(0.1)",
            "",
        );
        assert!(ellipk(1.0).is_err());
        assert!(ellipk(-0.5).is_err());
    }

    #[test]
    fn test_ellipj_identities() {
        for &m in &[0.0, 1e-12, 0.3, 0.7, 0.99, 0.99999999999] {
            for &u in &[0.0, 0.2, 0.9, 1.7] {
                let j = ellipj(u, m).unwrap();
                comp_f64(
                    &1.0,
                    &(j.sn * j.sn + j.cn * j.cn),
                    NumMargin::absolute(1e-9),
                    "sn² + cn²",
                    &format!("m={} u={}", m, u),
                );
                comp_f64(
                    &1.0,
                    &(j.dn * j.dn + m * j.sn * j.sn),
                    NumMargin::absolute(1e-9),
                    "dn² + m sn²",
                    &format!("m={} u={}", m, u),
                );
            }
        }
    }

    #[test]
    fn test_ellipj_quarter_period() {
        let m = 0.5;
        let k = ellipk(m).unwrap();
        let j = ellipj(k, m).unwrap();
        comp_f64(&1.0, &j.sn, NumMargin::absolute(1e-12), "sn(K)", "");
        comp_f64(&0.0, &j.cn, NumMargin::absolute(1e-7), "cn(K)", "");
        comp_f64(&0.5_f64.sqrt(), &j.dn, NumMargin::absolute(1e-10), "dn(K)", "");

        // m = 0 reduces to the circular functions
        let j = ellipj(0.6, 0.0).unwrap();
        comp_f64(&0.6_f64.sin(), &j.sn, NumMargin::default(), "sin", "");
        comp_f64(&0.6_f64.cos(), &j.cn, NumMargin::default(), "cos", "");

        // m = 1 reduces to the hyperbolic functions
        let j = ellipj(0.6, 1.0).unwrap();
        comp_f64(&0.6_f64.tanh(), &j.sn, NumMargin::default(), "tanh", "");
        comp_f64(&(1.0 / 0.6_f64.cosh()), &j.cn, NumMargin::default(), "sech", "");

        assert!(ellipj(0.1, 1.5).is_err());
    }

    #[test]
    fn test_arc_jac_sn_inverts_ellipj() {
        let m = 0.4;
        for &u in &[0.1, 0.5, 1.0] {
            let sn = ellipj(u, m).unwrap().sn;
            let z = arc_jac_sn(c64(sn, 0.0), m).unwrap();
            comp_f64(&u, &z.re, NumMargin::absolute(1e-10), "arc sn", &u.to_string());
            comp_f64(&0.0, &z.im, NumMargin::absolute(1e-10), "arc sn im", &u.to_string());
        }
    }

    #[test]
    fn test_arc_jac_sc1() {
        // sc(u, 1 - m) = w  =>  u = arc_jac_sc1(w, m)
        let m = 0.3;
        let u = 0.8;
        let j = ellipj(u, 1.0 - m).unwrap();
        let w = j.sn / j.cn;
        comp_f64(&u, &arc_jac_sc1(w, m).unwrap(), NumMargin::absolute(1e-10), "arc sc", "");
    }

    #[test]
    fn test_ellipdeg() {
        // order one maps the parameter to itself
        let m1 = 0.01;
        comp_f64(&m1, &ellipdeg(1, m1).unwrap(), NumMargin::relative(1e-10), "n=1", "");
        let m = ellipdeg(4, 1e-4).unwrap();
        assert!(m > 1e-4 && m < 1.0);
    }
}
