use std::cmp::Ordering;

/// Indices that sort `values` ascending; ties keep their input order.
pub fn argsort(values: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    idx
}

pub fn take(values: &[f64], order: &[usize]) -> Vec<f64> {
    order.iter().map(|&i| values[i]).collect()
}

/// Area under `y(x)` by the trapezoidal rule after sorting the pairs by `x`.
pub fn auc_trapezoid(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    let order = argsort(&x[..n]);
    let mut area = 0.0;
    for w in order.windows(2) {
        let (i0, i1) = (w[0], w[1]);
        area += (x[i1] - x[i0]) * (y[i1] + y[i0]) * 0.5;
    }
    area
}

/// Median with the mean of the two middle values for even counts.
/// `NaN` entries are ignored; an empty input yields `NaN`.
pub fn median(values: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        (sorted[mid - 1] + sorted[mid]) * 0.5
    } else {
        sorted[mid]
    }
}

/// Sorted distinct values, `NaN` dropped.
pub fn sorted_unique(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}

/// Element-wise `max(v, floor)`; `NaN` stays `NaN`.
pub fn floor_at(values: &[f64], floor: f64) -> Vec<f64> {
    values
        .iter()
        .map(|&v| if v.is_nan() { v } else { v.max(floor) })
        .collect()
}

pub fn log10_offset(value: f64, eps: f64) -> f64 {
    (value + eps).log10()
}

/// Quantile of an ascending slice with linear interpolation between ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Box-plot summary: quartiles plus whiskers reaching the most extreme
/// data points within 1.5 IQR of the box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_lo: f64,
    pub whisker_hi: f64,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let lo_limit = q1 - 1.5 * iqr;
        let hi_limit = q3 + 1.5 * iqr;
        let whisker_lo = sorted
            .iter()
            .copied()
            .find(|&v| v >= lo_limit)
            .unwrap_or(q1)
            .min(q1);
        let whisker_hi = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= hi_limit)
            .unwrap_or(q3)
            .max(q3);
        Some(Self {
            q1,
            median,
            q3,
            whisker_lo,
            whisker_hi,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn argsort_is_stable() {
        let order = argsort(&[0.5, 0.0, 0.5, 0.0]);
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn auc_of_step_curve() {
        let x = [0.0, 0.5, 0.5, 1.0];
        let y = [0.0, 0.0, 1.0, 1.0];
        assert_relative_eq!(auc_trapezoid(&x, &y), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(median(&[]).is_nan());
        assert_eq!(median(&[f64::NAN, 7.0]), 7.0);
    }

    #[test]
    fn sorted_unique_drops_duplicates_and_nan() {
        assert_eq!(
            sorted_unique(&[2.0, f64::NAN, 0.5, 2.0, 1.0]),
            vec![0.5, 1.0, 2.0]
        );
    }

    #[test]
    fn floor_keeps_nan() {
        let out = floor_at(&[0.0, 0.5, f64::NAN], 0.1);
        assert_eq!(out[0], 0.1);
        assert_eq!(out[1], 0.5);
        assert!(out[2].is_nan());
    }

    #[test]
    fn log10_offset_is_finite_at_zero() {
        let v = log10_offset(0.0, 1e-300);
        assert!(v.is_finite());
        assert_relative_eq!(v, -300.0, epsilon = 1e-9);
        assert_relative_eq!(log10_offset(100.0, 1e-300), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile_sorted(&sorted, 0.25), 1.75);
        assert_relative_eq!(quantile_sorted(&sorted, 0.5), 2.5);
        assert_relative_eq!(quantile_sorted(&sorted, 0.75), 3.25);
    }

    #[test]
    fn box_whiskers_stop_at_data_within_fence() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stats = BoxStats::from_values(&values).unwrap();
        assert_relative_eq!(stats.q1, 2.25);
        assert_relative_eq!(stats.median, 3.5);
        assert_relative_eq!(stats.q3, 4.75);
        assert_eq!(stats.whisker_lo, 1.0);
        assert_eq!(stats.whisker_hi, 5.0);
        assert!(BoxStats::from_values(&[]).is_none());
    }
}
