//! Local polynomial evaluation used by the trend filter.
use crate::stats;
use nalgebra::{DMatrix, DVector};

/// Least-squares polynomial of degree `degree` fitted to the samples listed
/// in `window`, evaluated at `times[at]`.
///
/// Abscissae are centred on the evaluation time and scaled by the window
/// half-span, so the fitted constant term is the trend value. The degree is
/// lowered when the window has too few points.
pub(crate) fn local_poly_value(
    times: &[f64],
    flux: &[f64],
    window: &[usize],
    at: usize,
    degree: usize,
) -> f64 {
    if window.is_empty() {
        return flux[at];
    }
    let degree = degree.min(window.len() - 1);
    let values = || window.iter().map(|&j| flux[j]);
    if degree == 0 {
        return values().sum::<f64>() / window.len() as f64;
    }

    let t0 = times[at];
    let half_span = window
        .iter()
        .map(|&j| (times[j] - t0).abs())
        .fold(0.0f64, f64::max)
        .max(f64::EPSILON);

    let ncoef = degree + 1;
    let mut normal = DMatrix::<f64>::zeros(ncoef, ncoef);
    let mut rhs = DVector::<f64>::zeros(ncoef);
    let mut powers = vec![0.0f64; 2 * degree + 1];
    for &j in window {
        let x = (times[j] - t0) / half_span;
        let mut p = 1.0;
        for slot in powers.iter_mut() {
            *slot = p;
            p *= x;
        }
        for r in 0..ncoef {
            rhs[r] += powers[r] * flux[j];
            for c in 0..ncoef {
                normal[(r, c)] += powers[r + c];
            }
        }
    }

    match normal.lu().solve(&rhs) {
        Some(coef) if coef[0].is_finite() => coef[0],
        _ => stats::mean_and_stddev(&values().collect::<Vec<_>>()).0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reproduces_a_quadratic_exactly() {
        let times: Vec<f64> = (0..11).map(|i| i as f64 * 0.1).collect();
        let flux: Vec<f64> = times.iter().map(|t| 1.0 + 0.2 * t - 0.3 * t * t).collect();
        let window: Vec<usize> = (0..11).collect();
        for at in [0, 5, 10] {
            let v = local_poly_value(&times, &flux, &window, at, 2);
            assert_relative_eq!(v, flux[at], epsilon = 1e-10);
        }
    }

    #[test]
    fn bridges_a_gap_in_the_window() {
        let times: Vec<f64> = (0..21).map(|i| i as f64).collect();
        let mut flux = vec![1.0; 21];
        for f in &mut flux[8..13] {
            *f = 0.99;
        }
        let window: Vec<usize> = (0..8).chain(13..21).collect();
        let v = local_poly_value(&times, &flux, &window, 10, 2);
        assert_relative_eq!(v, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn lowers_degree_for_short_windows() {
        let times = [0.0, 1.0];
        let flux = [1.0, 2.0];
        let v = local_poly_value(&times, &flux, &[0, 1], 1, 2);
        assert_relative_eq!(v, 2.0, epsilon = 1e-12);
        let single = local_poly_value(&times, &flux, &[1], 1, 2);
        assert_relative_eq!(single, 2.0);
    }
}
