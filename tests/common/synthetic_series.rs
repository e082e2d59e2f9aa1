use rand::rngs::StdRng;
use rand::SeedableRng;
use transit_search::synthetic::standard_normal;
use transit_search::{LightCurve, Sample};

/// Evenly spaced timestamps over `[start, end]`, endpoints included.
pub fn even_times(start: f64, end: f64, n: usize) -> Vec<f64> {
    assert!(n >= 2, "need at least two samples");
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Unit flux with a box dip of `depth` wherever `|t - epoch| mod period`
/// is within half a `duration`.
pub fn box_transit(
    times: &[f64],
    period: f64,
    epoch: f64,
    duration: f64,
    depth: f64,
) -> LightCurve {
    times
        .iter()
        .map(|&t| {
            let offset = (t - epoch + 0.5 * period).rem_euclid(period) - 0.5 * period;
            let flux = if offset.abs() < 0.5 * duration {
                1.0 - depth
            } else {
                1.0
            };
            Sample::new(t, flux)
        })
        .collect()
}

/// Add seeded Gaussian noise of standard deviation `sigma` to every flux.
pub fn with_noise(lc: &LightCurve, sigma: f64, seed: u64) -> LightCurve {
    let mut rng = StdRng::seed_from_u64(seed);
    lc.iter()
        .map(|s| Sample::new(s.time, s.flux + sigma * standard_normal(&mut rng)))
        .collect()
}

/// Multiply the flux by `1 + amplitude * sin(2πt / period)`.
pub fn with_variability(lc: &LightCurve, amplitude: f64, period: f64) -> LightCurve {
    lc.iter()
        .map(|s| {
            let factor = 1.0 + amplitude * (2.0 * std::f64::consts::PI * s.time / period).sin();
            Sample {
                flux: s.flux * factor,
                ..*s
            }
        })
        .collect()
}

/// Distance between two epochs modulo `period`.
pub fn epoch_distance(a: f64, b: f64, period: f64) -> f64 {
    let d = (a - b).rem_euclid(period);
    d.min(period - d)
}
