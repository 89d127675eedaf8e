// src/stats/ols.rs
//! Ordinary least squares with an intercept.

use serde::Serialize;

use super::distribution::{f_upper, t_two_sided};
use crate::error::{CollabError, Result};

/// Relative pivot size below which `X'X` is treated as singular.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// One fitted coefficient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Term {
    pub name: String,
    pub coefficient: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OlsFit {
    /// Intercept first, then predictors in input order.
    pub terms: Vec<Term>,
    pub observations: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_p_value: f64,
    pub residual_df: usize,
}

impl OlsFit {
    #[must_use]
    pub fn term(&self, name: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.name == name)
    }
}

/// Fits `y ~ 1 + predictors`.
///
/// # Errors
/// Returns [`CollabError::StatisticalFit`] when there are no more rows than
/// parameters, a predictor has zero variance, or `X'X` is singular.
#[allow(clippy::cast_precision_loss)]
pub fn fit(y: &[f64], predictors: &[(&str, Vec<f64>)]) -> Result<OlsFit> {
    let n = y.len();
    let p = predictors.len() + 1;

    if n <= p {
        return Err(CollabError::fit(
            format!("{n} observations for {p} parameters"),
            "collect more complete rows; the fit needs more observations than parameters",
        ));
    }
    if let Some((name, col)) = predictors.iter().find(|(_, col)| col.len() != n) {
        return Err(CollabError::fit(
            format!("predictor `{name}` has {} values, expected {n}", col.len()),
            "every predictor column must align with the outcome",
        ));
    }
    if let Some((name, _)) = predictors.iter().find(|(_, col)| has_zero_variance(col)) {
        return Err(CollabError::fit(
            format!("predictor `{name}` has zero variance"),
            "a constant predictor is collinear with the intercept; \
             check that upstream metrics were computed and vary across rows",
        ));
    }

    let row = |i: usize| -> Vec<f64> {
        std::iter::once(1.0)
            .chain(predictors.iter().map(|(_, col)| col[i]))
            .collect()
    };

    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];
    for (i, &yi) in y.iter().enumerate() {
        let x = row(i);
        for a in 0..p {
            xty[a] += x[a] * yi;
            for b in 0..p {
                xtx[a][b] += x[a] * x[b];
            }
        }
    }

    let inv = invert(xtx).ok_or_else(|| {
        CollabError::fit(
            "design matrix is rank-deficient",
            "two or more predictors are linearly dependent; drop or combine them",
        )
    })?;
    let beta: Vec<f64> = inv
        .iter()
        .map(|r| r.iter().zip(&xty).map(|(a, b)| a * b).sum())
        .collect();

    let mean_y = y.iter().sum::<f64>() / n as f64;
    let mut ssr = 0.0;
    let mut sst = 0.0;
    for (i, &yi) in y.iter().enumerate() {
        let fitted: f64 = row(i).iter().zip(&beta).map(|(x, b)| x * b).sum();
        ssr += (yi - fitted).powi(2);
        sst += (yi - mean_y).powi(2);
    }

    let residual_df = n - p;
    let df = residual_df as f64;
    let sigma2 = ssr / df;

    let names = std::iter::once("intercept").chain(predictors.iter().map(|(name, _)| *name));
    let terms = names
        .zip(&beta)
        .enumerate()
        .map(|(j, (name, &coefficient))| {
            let std_error = (sigma2 * inv[j][j]).max(0.0).sqrt();
            let t_value = ratio(coefficient, std_error);
            Term {
                name: name.to_string(),
                coefficient,
                std_error,
                t_value,
                p_value: t_two_sided(t_value, df),
            }
        })
        .collect();

    let r_squared = if sst > 0.0 { 1.0 - ssr / sst } else { 0.0 };
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / df;
    let model_df = (p - 1) as f64;
    let f_statistic = ratio((sst - ssr) / model_df, sigma2);

    Ok(OlsFit {
        terms,
        observations: n,
        r_squared,
        adj_r_squared,
        f_statistic,
        f_p_value: f_upper(f_statistic, model_df, df),
        residual_df,
    })
}

fn has_zero_variance(col: &[f64]) -> bool {
    match col.first() {
        None => true,
        Some(&first) => {
            let tolerance = 1e-12 * first.abs().max(1.0);
            col.iter().all(|&v| (v - first).abs() <= tolerance)
        }
    }
}

/// Division that maps `x / 0` to zero or signed infinity.
fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else if num == 0.0 {
        0.0
    } else {
        num.signum() * f64::INFINITY
    }
}

/// Gauss-Jordan inversion with partial pivoting.
fn invert(mut m: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let n = m.len();
    let scale = m
        .iter()
        .enumerate()
        .map(|(i, r)| r[i].abs())
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let mut inv: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))?;
        if m[pivot_row][col].abs() < PIVOT_TOLERANCE * scale {
            return None;
        }
        m.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = m[col][col];
        for j in 0..n {
            m[col][j] /= pivot;
            inv[col][j] /= pivot;
        }

        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = m[r][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                m[r][j] -= factor * m[col][j];
                inv[r][j] -= factor * inv[col][j];
            }
        }
    }
    Some(inv)
}
