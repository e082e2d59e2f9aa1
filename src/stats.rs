//! Small robust-statistics helpers shared by the cleaning, detrending and
//! search stages.

/// Scale factor turning a median absolute deviation into a Gaussian-equivalent
/// standard deviation.
pub const MAD_TO_STD: f64 = 1.482_602_218_505_602;

/// Median of a slice; `None` when empty. The input is not reordered.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let m = sorted.len();
    Some(if m % 2 == 1 {
        sorted[m / 2]
    } else {
        0.5 * (sorted[m / 2 - 1] + sorted[m / 2])
    })
}

/// Population mean and standard deviation. `(0, 0)` for an empty slice.
pub fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    let count = values.len();
    if count == 0 {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / count as f64;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;
    (mean, variance.sqrt())
}

/// Median absolute deviation around `center`, scaled to a standard deviation.
pub fn mad_std(values: &[f64], center: f64) -> f64 {
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median(&deviations).unwrap_or(0.0) * MAD_TO_STD
}

/// Evenly spaced values over `[start, stop]`, endpoints included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn median_handles_odd_and_even_lengths() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn mad_std_matches_gaussian_scale() {
        let values = [1.0, 2.0, 3.0, 4.0, 100.0];
        // deviations from 3: [2, 1, 0, 1, 97] -> median 1
        assert_relative_eq!(mad_std(&values, 3.0), MAD_TO_STD, epsilon = 1e-12);
    }

    #[test]
    fn linspace_includes_endpoints() {
        let v = linspace(0.05, 0.3, 10);
        assert_eq!(v.len(), 10);
        assert_relative_eq!(v[0], 0.05);
        assert_relative_eq!(v[9], 0.3);
        assert_relative_eq!(v[1] - v[0], 0.25 / 9.0, epsilon = 1e-12);
    }
}
