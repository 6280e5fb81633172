//! Statistical helpers shared by the detectors

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation, 0.0 for an empty slice
pub fn std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}

/// Maximum value, 0.0 for an empty slice
pub fn max_value(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Percentile with linear interpolation between closest ranks.
///
/// `pct` is in 0..=100. Returns 0.0 for an empty slice.
pub fn percentile(data: &[f64], pct: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Indices of strict local maxima (greater than both neighbours).
///
/// The first and last samples are never maxima.
pub fn local_maxima(data: &[f64]) -> Vec<usize> {
    if data.len() < 3 {
        return Vec::new();
    }

    data.windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0] && w[1] > w[2])
        .map(|(i, _)| i + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&data) - 5.0).abs() < 1e-12);
        assert!((std_dev(&data) - 2.0).abs() < 1e-12);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((percentile(&data, 50.0) - 3.0).abs() < 1e-12);
        assert!((percentile(&data, 95.0) - 4.8).abs() < 1e-12);
        assert!((percentile(&data, 100.0) - 5.0).abs() < 1e-12);
        assert_eq!(percentile(&[], 95.0), 0.0);
    }

    #[test]
    fn test_local_maxima_strict() {
        let data = vec![0.0, 1.0, 0.0, 2.0, 2.0, 0.0, 3.0, 1.0];
        // Plateau at indices 3..=4 is not a strict maximum
        assert_eq!(local_maxima(&data), vec![1, 6]);
        assert!(local_maxima(&[1.0, 2.0]).is_empty());
    }

    #[test]
    fn test_max_value() {
        assert_eq!(max_value(&[0.5, 3.0, -1.0]), 3.0);
        assert_eq!(max_value(&[]), 0.0);
    }
}
