//! Descriptive statistics over plain f64 slices.
//!
//! Callers strip missing values first; nothing here sees a NaN.

/// Sorted copy of the values.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile `q` (0.0 - 1.0) of already-sorted values.
///
/// Linear interpolation between the closest ranks: the rank is
/// `q * (n - 1)` and the result is interpolated between its floor and ceil.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Quantile `q` of unsorted values.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    quantile_sorted(&sorted(values), q)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with `ddof` delta degrees of freedom.
///
/// `None` when there are not more than `ddof` values.
pub fn std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    if values.len() <= ddof {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - ddof) as f64).sqrt())
}

/// Population standard deviation (divides by n).
pub fn population_std(values: &[f64]) -> Option<f64> {
    std_dev(values, 0)
}

/// Sample standard deviation (divides by n - 1).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    std_dev(values, 1)
}

/// Pearson correlation over rows where both values are present.
///
/// `None` with fewer than two complete pairs or when either side is constant.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Equal-width bin edges and counts.
///
/// A constant column gets a single bin of width 1 centered on the value.
pub fn histogram(values: &[f64], bins: usize) -> (Vec<f64>, Vec<usize>) {
    let bins = bins.max(1);
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return (Vec::new(), Vec::new());
    };

    if min == max {
        return (vec![min - 0.5, max + 0.5], vec![values.len()]);
    }

    let width = (max - min) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    (edges, counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== quantile tests ====================

    #[test]
    fn test_quantile_linear_interpolation() {
        // rank 0.25 * 9 = 2.25 -> 3 + 0.25 * (4 - 3)
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
        assert!((quantile(&values, 0.25).unwrap() - 3.25).abs() < 1e-12);
        assert!((quantile(&values, 0.75).unwrap() - 7.75).abs() < 1e-12);
        assert_eq!(quantile(&values, 0.5).unwrap(), 5.5);
    }

    #[test]
    fn test_quantile_unsorted_input() {
        let values = [40.0, 10.0, 30.0, 20.0];
        assert_eq!(quantile(&values, 0.0).unwrap(), 10.0);
        assert_eq!(quantile(&values, 1.0).unwrap(), 40.0);
        assert_eq!(quantile(&values, 0.5).unwrap(), 25.0);
    }

    #[test]
    fn test_quantile_single_and_empty() {
        assert_eq!(quantile(&[7.0], 0.25), Some(7.0));
        assert_eq!(quantile(&[], 0.25), None);
    }

    // ==================== std tests ====================

    #[test]
    fn test_population_vs_sample_std() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((population_std(&values).unwrap() - 2.0f64.sqrt()).abs() < 1e-12);
        assert!((sample_std(&values).unwrap() - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_std_degenerate() {
        assert_eq!(population_std(&[5.0]), Some(0.0));
        assert_eq!(sample_std(&[5.0]), None);
        assert_eq!(population_std(&[]), None);
    }

    // ==================== pearson tests ====================

    #[test]
    fn test_pearson_perfect() {
        let xs = [Some(1.0), Some(2.0), Some(3.0)];
        let ys = [Some(2.0), Some(4.0), Some(6.0)];
        assert!((pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);

        let neg = [Some(3.0), Some(2.0), Some(1.0)];
        assert!((pearson(&xs, &neg).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_pairwise_complete() {
        let xs = [Some(1.0), None, Some(2.0), Some(3.0)];
        let ys = [Some(1.0), Some(100.0), Some(2.0), Some(3.0)];
        assert!((pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_undefined() {
        let xs = [Some(1.0), Some(1.0), Some(1.0)];
        let ys = [Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(pearson(&xs, &ys), None);
        assert_eq!(pearson(&[Some(1.0)], &[Some(2.0)]), None);
    }

    // ==================== histogram tests ====================

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0];
        let (edges, counts) = histogram(&values, 5);
        assert_eq!(edges.len(), 6);
        assert_eq!(counts.iter().sum::<usize>(), values.len());
        // max lands in the last bin
        assert_eq!(counts[4], 1);
        assert_eq!(edges[0], 0.0);
        assert_eq!(edges[5], 10.0);
    }

    #[test]
    fn test_histogram_constant_and_empty() {
        let (edges, counts) = histogram(&[3.0, 3.0], 10);
        assert_eq!(edges, vec![2.5, 3.5]);
        assert_eq!(counts, vec![2]);

        let (edges, counts) = histogram(&[], 10);
        assert!(edges.is_empty() && counts.is_empty());
    }
}
