//! Analog lowpass prototypes normalized to a cutoff of 1 rad/s.

use super::elliptic::{arc_jac_sc1, ellipdeg, ellipj, ellipk};
use super::transfer::TransferFunction;
use super::ResponseFamily;
use crate::consts::MAX_FILTER_ORDER;
use crate::error::{Result, RfError};
use crate::poly::roots;
use num_complex::{c64, Complex64};
use std::f64::consts::PI;

/// Threshold below which an elliptic zero or pole part counts as zero
const ELLIP_EPSILON: f64 = 2e-16;

/// Checks the ripple and attenuation values a family needs
pub(crate) fn check_ripple(family: ResponseFamily, ripple_db: f64, stopband_db: f64) -> Result<()> {
    if family.uses_ripple() && !(ripple_db.is_finite() && ripple_db > 0.0) {
        return Err(RfError::input(
            "ripple_db",
            format!("{} needs a positive passband ripple, got {}", family, ripple_db),
        ));
    }
    if family.uses_stopband() && !(stopband_db.is_finite() && stopband_db > 0.0) {
        return Err(RfError::input(
            "stopband_db",
            format!("{} needs a positive stopband attenuation, got {}", family, stopband_db),
        ));
    }
    if family == ResponseFamily::Elliptic && stopband_db <= ripple_db {
        return Err(RfError::spec(format!(
            "elliptic stopband attenuation ({} dB) must exceed the passband ripple ({} dB)",
            stopband_db, ripple_db
        )));
    }
    Ok(())
}

/// Normalized lowpass prototype of the given family and order.
///
/// `ripple_db` is used by Chebyshev I and elliptic, `stopband_db` by
/// Chebyshev II and elliptic; the other families ignore them.
pub fn select_prototype(
    order: usize,
    family: ResponseFamily,
    ripple_db: f64,
    stopband_db: f64,
) -> Result<TransferFunction> {
    if order == 0 || order > MAX_FILTER_ORDER {
        return Err(RfError::spec(format!(
            "order must be between 1 and {}, got {}",
            MAX_FILTER_ORDER, order
        )));
    }
    check_ripple(family, ripple_db, stopband_db)?;

    let (zeros, poles, gain) = match family {
        ResponseFamily::Butterworth => butterworth(order),
        ResponseFamily::ChebyshevI => chebyshev1(order, ripple_db),
        ResponseFamily::ChebyshevII => chebyshev2(order, stopband_db),
        ResponseFamily::Elliptic => elliptic(order, ripple_db, stopband_db)?,
        ResponseFamily::Bessel => bessel(order)?,
    };
    Ok(TransferFunction::prototype(zeros, poles, gain, family))
}

type Zpk = (Vec<Complex64>, Vec<Complex64>, f64);

/// Symmetric index set `-n+1, -n+3, ..., n-1`
fn odd_steps(n: usize) -> impl Iterator<Item = f64> {
    (0..n).map(move |i| (2 * i) as f64 - n as f64 + 1.0)
}

fn neg_product(vals: &[Complex64]) -> Complex64 {
    vals.iter().fold(c64(1.0, 0.0), |acc, v| acc * -v)
}

fn butterworth(n: usize) -> Zpk {
    let poles = odd_steps(n)
        .map(|m| -(c64(0.0, PI * m / (2.0 * n as f64))).exp())
        .collect();
    (vec![], poles, 1.0)
}

fn chebyshev1(n: usize, ripple_db: f64) -> Zpk {
    let eps = (10f64.powf(0.1 * ripple_db) - 1.0).sqrt();
    let mu = (1.0 / eps).asinh() / n as f64;
    let poles: Vec<Complex64> = odd_steps(n)
        .map(|m| -(c64(mu, PI * m / (2.0 * n as f64))).sinh())
        .collect();
    let mut gain = neg_product(&poles).re;
    if n % 2 == 0 {
        gain /= (1.0 + eps * eps).sqrt();
    }
    (vec![], poles, gain)
}

fn chebyshev2(n: usize, stopband_db: f64) -> Zpk {
    let de = 1.0 / (10f64.powf(0.1 * stopband_db) - 1.0).sqrt();
    let mu = (1.0 / de).asinh() / n as f64;

    // odd orders have no finite zero for the middle index
    let zeros: Vec<Complex64> = odd_steps(n)
        .filter(|m| *m != 0.0)
        .map(|m| c64(0.0, 1.0 / (m * PI / (2.0 * n as f64)).sin()))
        .collect();
    let poles: Vec<Complex64> = odd_steps(n)
        .map(|m| {
            let p = -(c64(0.0, PI * m / (2.0 * n as f64))).exp();
            c64(mu.sinh() * p.re, mu.cosh() * p.im).inv()
        })
        .collect();
    let gain = (neg_product(&poles) / neg_product(&zeros)).re;
    (zeros, poles, gain)
}

fn elliptic(n: usize, ripple_db: f64, stopband_db: f64) -> Result<Zpk> {
    let eps_sq = 10f64.powf(0.1 * ripple_db) - 1.0;
    if n == 1 {
        let p = -(1.0 / eps_sq).sqrt();
        return Ok((vec![], vec![c64(p, 0.0)], -p));
    }

    let eps = eps_sq.sqrt();
    let ck1_sq = eps_sq / (10f64.powf(0.1 * stopband_db) - 1.0);
    if ck1_sq <= 0.0 || ck1_sq >= 1.0 {
        return Err(RfError::spec(format!(
            "ripple {} dB and attenuation {} dB give no elliptic selectivity",
            ripple_db, stopband_db
        )));
    }
    let k_ck1 = ellipk(ck1_sq)?;
    let m = ellipdeg(n, ck1_sq)?;
    let capk = ellipk(m)?;

    let jac = (1 - n % 2..n)
        .step_by(2)
        .map(|j| ellipj(j as f64 * capk / n as f64, m))
        .collect::<Result<Vec<_>>>()?;

    let mut zeros: Vec<Complex64> = jac
        .iter()
        .filter(|v| v.sn.abs() > ELLIP_EPSILON)
        .map(|v| c64(0.0, 1.0 / (m.sqrt() * v.sn)))
        .collect();
    let conj: Vec<Complex64> = zeros.iter().map(|z| z.conj()).collect();
    zeros.extend(conj);

    let r = arc_jac_sc1(1.0 / eps, ck1_sq)?;
    let v0 = capk * r / (n as f64 * k_ck1);
    let sv = ellipj(v0, 1.0 - m)?;

    let mut poles: Vec<Complex64> = jac
        .iter()
        .map(|v| {
            let num = c64(v.cn * v.dn * sv.sn * sv.cn, v.sn * sv.dn);
            -num / (1.0 - (v.dn * sv.sn).powi(2))
        })
        .collect();
    let norm = poles.iter().map(|p| p.norm_sqr()).sum::<f64>().sqrt();
    let conj: Vec<Complex64> = poles
        .iter()
        .filter(|p| n % 2 == 0 || p.im.abs() > ELLIP_EPSILON * norm)
        .map(|p| p.conj())
        .collect();
    poles.extend(conj);

    let mut gain = (neg_product(&poles) / neg_product(&zeros)).re;
    if n % 2 == 0 {
        gain /= (1.0 + eps_sq).sqrt();
    }
    Ok((zeros, poles, gain))
}

/// Delay-normalized Bessel-Thomson prototype: the poles are the roots of the
/// reverse Bessel polynomial `θn`, so the group delay at DC is one second.
fn bessel(n: usize) -> Result<Zpk> {
    // a[k] is the coefficient of s^k, built down from a[n] = 1
    let mut a = vec![0.0; n + 1];
    a[n] = 1.0;
    for k in (0..n).rev() {
        a[k] = a[k + 1] * ((2 * n - k) * (k + 1)) as f64 / (2 * (n - k)) as f64;
    }
    let coeffs: Vec<f64> = a.iter().rev().copied().collect();
    let poles = roots(&coeffs)?;
    Ok((vec![], poles, a[0]))
}

#[cfg(test)]
mod prototype_tests {
    use super::*;
    use crate::util::{comp_f64, NumMargin};

    fn mag_db(tf: &TransferFunction, w: f64) -> f64 {
        20.0 * tf.eval_normalized(c64(0.0, w)).norm().log10()
    }

    #[test]
    fn test_butterworth() {
        let tf = select_prototype(3, ResponseFamily::Butterworth, 0.0, 0.0).unwrap();
        assert_eq!(tf.poles().len(), 3);
        assert!(tf.zeros().is_empty());
        for p in tf.poles() {
            comp_f64(&1.0, &p.norm(), NumMargin::default(), "butter", "radius");
            assert!(p.re < 0.0);
        }
        comp_f64(&-3.0103, &mag_db(&tf, 1.0), NumMargin::absolute(1e-3), "butter", "-3 dB");
        comp_f64(&0.0, &mag_db(&tf, 0.0), NumMargin::absolute(1e-12), "butter", "dc");
    }

    #[test]
    fn test_chebyshev1() {
        let tf = select_prototype(4, ResponseFamily::ChebyshevI, 1.0, 0.0).unwrap();
        // even order starts at the bottom of the ripple
        comp_f64(&-1.0, &mag_db(&tf, 0.0), NumMargin::absolute(1e-9), "cheby1", "dc");
        comp_f64(&-1.0, &mag_db(&tf, 1.0), NumMargin::absolute(1e-9), "cheby1", "edge");
        assert!(mag_db(&tf, 0.5) > -1.0 - 1e-9);

        let tf = select_prototype(3, ResponseFamily::ChebyshevI, 0.5, 0.0).unwrap();
        comp_f64(&0.0, &mag_db(&tf, 0.0), NumMargin::absolute(1e-9), "cheby1 odd", "dc");
        comp_f64(&-0.5, &mag_db(&tf, 1.0), NumMargin::absolute(1e-9), "cheby1 odd", "edge");
    }

    #[test]
    fn test_chebyshev2() {
        let tf = select_prototype(5, ResponseFamily::ChebyshevII, 0.0, 40.0).unwrap();
        assert_eq!(tf.zeros().len(), 4);
        assert_eq!(tf.poles().len(), 5);
        comp_f64(&0.0, &mag_db(&tf, 0.0), NumMargin::absolute(1e-9), "cheby2", "dc");
        // cutoff is the stopband edge
        comp_f64(&-40.0, &mag_db(&tf, 1.0), NumMargin::absolute(1e-6), "cheby2", "edge");
        assert!(mag_db(&tf, 3.0) <= -40.0 + 1e-6);

        let tf = select_prototype(4, ResponseFamily::ChebyshevII, 0.0, 30.0).unwrap();
        assert_eq!(tf.zeros().len(), 4);
    }

    #[test]
    fn test_elliptic() {
        let tf = select_prototype(4, ResponseFamily::Elliptic, 1.0, 40.0).unwrap();
        assert_eq!(tf.zeros().len(), 4);
        assert_eq!(tf.poles().len(), 4);
        assert!(tf.poles().iter().all(|p| p.re < 0.0));
        comp_f64(&-1.0, &mag_db(&tf, 0.0), NumMargin::absolute(1e-6), "ellip", "dc");
        comp_f64(&-1.0, &mag_db(&tf, 1.0), NumMargin::absolute(1e-6), "ellip", "edge");
        // well into the stopband
        assert!(mag_db(&tf, 3.0) <= -40.0 + 1e-6);

        let tf = select_prototype(3, ResponseFamily::Elliptic, 0.5, 30.0).unwrap();
        assert_eq!(tf.zeros().len(), 2);
        assert_eq!(tf.poles().len(), 3);
        comp_f64(&0.0, &mag_db(&tf, 0.0), NumMargin::absolute(1e-6), "ellip odd", "dc");
        comp_f64(&-0.5, &mag_db(&tf, 1.0), NumMargin::absolute(1e-6), "ellip odd", "edge");

        let tf = select_prototype(1, ResponseFamily::Elliptic, 3.0, 30.0).unwrap();
        assert_eq!(tf.poles().len(), 1);
        comp_f64(&-3.0, &mag_db(&tf, 1.0), NumMargin::absolute(1e-9), "ellip n=1", "edge");
    }

    #[test]
    fn test_bessel() {
        let tf = select_prototype(2, ResponseFamily::Bessel, 0.0, 0.0).unwrap();
        comp_f64(&3.0, &tf.gain(), NumMargin::default(), "bessel2", "gain");
        for p in tf.poles() {
            comp_f64(&-1.5, &p.re, NumMargin::absolute(1e-12), "bessel2", "re");
        }
        comp_f64(&0.0, &mag_db(&tf, 0.0), NumMargin::absolute(1e-12), "bessel2", "dc");

        let tf = select_prototype(5, ResponseFamily::Bessel, 0.0, 0.0).unwrap();
        assert_eq!(tf.poles().len(), 5);
        comp_f64(&945.0, &tf.gain(), NumMargin::default(), "bessel5", "gain");
        comp_f64(&0.0, &mag_db(&tf, 0.0), NumMargin::absolute(1e-9), "bessel5", "dc");
        assert!(tf.poles().iter().all(|p| p.re < 0.0));
    }

    #[test]
    fn test_every_family_up_to_max_order() {
        let (ripple, atten) = (1.0, 40.0);
        for order in 1..=MAX_FILTER_ORDER {
            let even = order % 2 == 0;
            for family in [
                ResponseFamily::Butterworth,
                ResponseFamily::ChebyshevI,
                ResponseFamily::ChebyshevII,
                ResponseFamily::Elliptic,
                ResponseFamily::Bessel,
            ] {
                let name = format!("{} n={}", family, order);
                let tf = select_prototype(order, family, ripple, atten).unwrap();
                assert_eq!(tf.poles().len(), order, "{}", name);
                assert!(tf.poles().iter().all(|p| p.re < 0.0), "{} has an unstable pole", name);

                let (dc, edge, tol) = match family {
                    ResponseFamily::Butterworth => (0.0, Some(-3.010299956639812), 1e-9),
                    ResponseFamily::ChebyshevI if even => (-ripple, Some(-ripple), 1e-6),
                    ResponseFamily::ChebyshevI => (0.0, Some(-ripple), 1e-6),
                    ResponseFamily::ChebyshevII => (0.0, Some(-atten), 1e-6),
                    ResponseFamily::Elliptic if even => (-ripple, Some(-ripple), 1e-3),
                    ResponseFamily::Elliptic => (0.0, Some(-ripple), 1e-3),
                    ResponseFamily::Bessel => (0.0, None, 1e-5),
                };
                comp_f64(&dc, &mag_db(&tf, 0.0), NumMargin::absolute(tol), &name, "dc");
                if let Some(edge) = edge {
                    comp_f64(&edge, &mag_db(&tf, 1.0), NumMargin::absolute(tol), &name, "edge");
                }
                if family == ResponseFamily::Bessel {
                    // group delay at DC is the sum of -Re(1/p)
                    let tau: f64 = tf.poles().iter().map(|p| -p.inv().re).sum();
                    comp_f64(&1.0, &tau, NumMargin::absolute(1e-6), &name, "delay");
                }
            }
        }
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            select_prototype(0, ResponseFamily::Butterworth, 0.0, 0.0),
            Err(RfError::InvalidSpec(_))
        ));
        assert!(matches!(
            select_prototype(21, ResponseFamily::Butterworth, 0.0, 0.0),
            Err(RfError::InvalidSpec(_))
        ));
        assert!(matches!(
            select_prototype(3, ResponseFamily::ChebyshevI, -1.0, 0.0),
            Err(RfError::InvalidInput { .. })
        ));
        assert!(matches!(
            select_prototype(3, ResponseFamily::ChebyshevII, 1.0, 0.0),
            Err(RfError::InvalidInput { .. })
        ));
        assert!(matches!(
            select_prototype(3, ResponseFamily::Elliptic, 10.0, 5.0),
            Err(RfError::InvalidSpec(_))
        ));
        // families that do not use ripple ignore it
        assert!(select_prototype(3, ResponseFamily::Bessel, -1.0, -1.0).is_ok());
    }
}
