// src/stats/descriptive.rs
//! Column summaries and pairwise correlation.

use serde::Serialize;

/// Summary of one numeric column, missing values already removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (`n - 1` denominator); 0.0 for one value.
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub range: f64,
    /// Coefficient of variation in percent; 0.0 when the mean is zero.
    pub cv_percent: f64,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

/// Summarizes `values`. Returns `None` for an empty column.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn describe(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = values.len();
    let nf = n as f64;
    let mean = values.iter().sum::<f64>() / nf;
    let var = if n > 1 {
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (nf - 1.0)
    } else {
        0.0
    };
    let std = var.sqrt();
    let min = sorted[0];
    let max = sorted[n - 1];

    Some(Summary {
        count: n,
        mean,
        std,
        min,
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max,
        range: max - min,
        cv_percent: if mean == 0.0 { 0.0 } else { std / mean * 100.0 },
        skewness: skewness(values, mean),
        kurtosis: kurtosis(values, mean),
    })
}

/// Linear-interpolation quantile of an ascending slice.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

fn central_moments(values: &[f64], mean: f64) -> (f64, f64, f64) {
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - mean;
        m2 += d * d;
        m3 += d * d * d;
        m4 += d * d * d * d;
    }
    (m2 / n, m3 / n, m4 / n)
}

/// Adjusted Fisher-Pearson skewness. Needs three values and non-zero spread.
#[allow(clippy::cast_precision_loss)]
fn skewness(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let (m2, m3, _) = central_moments(values, mean);
    if m2 <= 0.0 {
        return None;
    }
    let nf = n as f64;
    let g1 = m3 / m2.powf(1.5);
    Some((nf * (nf - 1.0)).sqrt() / (nf - 2.0) * g1)
}

/// Bias-corrected excess kurtosis. Needs four values and non-zero spread.
#[allow(clippy::cast_precision_loss)]
fn kurtosis(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let (m2, _, m4) = central_moments(values, mean);
    if m2 <= 0.0 {
        return None;
    }
    let nf = n as f64;
    let g2 = m4 / (m2 * m2) - 3.0;
    Some(((nf + 1.0) * g2 + 6.0) * (nf - 1.0) / ((nf - 2.0) * (nf - 3.0)))
}

/// Pearson correlation over the rows where both values are present.
/// `None` with fewer than two such rows or when either side is constant.
#[must_use]
#[allow(clippy::cast_precision_loss)]
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
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx).powi(2);
        syy += (y - my).powi(2);
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_describe_four_values() {
        let s = describe(&[4.0, 1.0, 3.0, 2.0]).expect("non-empty");

        assert_eq!(s.count, 4);
        assert!(close(s.mean, 2.5));
        assert!(close(s.std, (5.0_f64 / 3.0).sqrt()));
        assert!(close(s.q1, 1.75));
        assert!(close(s.median, 2.5));
        assert!(close(s.q3, 3.25));
        assert!(close(s.range, 3.0));
        assert!(close(s.skewness.unwrap_or(f64::NAN), 0.0));
        assert!(close(s.kurtosis.unwrap_or(f64::NAN), -1.2));
    }

    #[test]
    fn test_describe_edge_cases() {
        assert_eq!(describe(&[]), None);

        let single = describe(&[7.0]).expect("non-empty");
        assert_eq!(single.std, 0.0);
        assert_eq!(single.median, 7.0);
        assert_eq!(single.skewness, None);

        let centred = describe(&[-1.0, 1.0]).expect("non-empty");
        assert_eq!(centred.cv_percent, 0.0, "zero mean guards the ratio");

        let flat = describe(&[2.0, 2.0, 2.0, 2.0]).expect("non-empty");
        assert_eq!(flat.kurtosis, None);
    }

    #[test]
    fn test_pearson() {
        let x = [Some(1.0), Some(2.0), Some(3.0), None, Some(4.0)];
        let up = [Some(2.0), Some(4.0), Some(6.0), Some(0.0), Some(8.0)];
        let down = [Some(4.0), Some(3.0), None, Some(9.0), Some(1.0)];
        let flat = [Some(1.0); 5];

        assert!(close(pearson(&x, &up).unwrap_or(f64::NAN), 1.0));
        assert!(pearson(&x, &down).is_some_and(|r| r < -0.9));
        assert_eq!(pearson(&x, &flat), None);
        assert_eq!(pearson(&[Some(1.0)], &[Some(2.0)]), None);
    }
}
