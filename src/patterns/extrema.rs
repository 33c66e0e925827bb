use crate::indicators::linear_slope;

const NEIGHBOURS: usize = 2;

/// Indices whose value strictly exceeds the two values on either side
pub fn find_peaks(values: &[f64]) -> Vec<usize> {
    find_extrema(values, |v, n| v > n)
}

/// Indices whose value is strictly below the two values on either side
pub fn find_troughs(values: &[f64]) -> Vec<usize> {
    find_extrema(values, |v, n| v < n)
}

fn find_extrema(values: &[f64], dominates: impl Fn(f64, f64) -> bool) -> Vec<usize> {
    if values.len() < NEIGHBOURS * 2 + 1 {
        return Vec::new();
    }

    (NEIGHBOURS..values.len() - NEIGHBOURS)
        .filter(|&i| {
            (1..=NEIGHBOURS).all(|k| dominates(values[i], values[i - k]) && dominates(values[i], values[i + k]))
        })
        .collect()
}

/// Regression slope through the last `take` extrema, per extremum, relative to `scale`
///
/// x is the extremum's ordinal, so the slope reads as fractional price change from one
/// peak (or trough) to the next.
pub fn relative_slope(indices: &[usize], values: &[f64], take: usize, scale: f64) -> f64 {
    if scale == 0.0 {
        return 0.0;
    }

    let recent = &indices[indices.len().saturating_sub(take)..];
    let points: Vec<(f64, f64)> = recent
        .iter()
        .enumerate()
        .map(|(ordinal, &idx)| (ordinal as f64, values[idx]))
        .collect();

    linear_slope(&points) / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peaks_and_troughs() {
        let values = [1.0, 2.0, 5.0, 2.0, 1.0, 0.5, 1.0, 3.0, 3.0, 1.0, 0.0];
        assert_eq!(find_peaks(&values), vec![2]);
        // Plateau at 3.0 is not a peak; 0.5 is a trough
        assert_eq!(find_troughs(&values), vec![5]);
    }

    #[test]
    fn test_short_input() {
        assert!(find_peaks(&[1.0, 3.0, 1.0]).is_empty());
    }

    #[test]
    fn test_relative_slope() {
        let values = [100.0, 0.0, 102.0, 0.0, 104.0, 0.0, 106.0];
        let peaks = [0, 2, 4, 6];
        // Last three: 102, 104, 106 -> 2 per peak, scaled by 100
        assert!((relative_slope(&peaks, &values, 3, 100.0) - 0.02).abs() < 1e-12);
        assert_eq!(relative_slope(&peaks, &values, 3, 0.0), 0.0);
    }
}
