// src/reporting/shared.rs
pub(crate) fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

pub(crate) fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

/// P-values below 1e-4 print as `<0.0001`.
pub(crate) fn fmt_p(p: f64) -> String {
    if p.is_nan() {
        "-".to_string()
    } else if p < 1e-4 {
        "<0.0001".to_string()
    } else {
        format!("{p:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(pluralize("song", 1), "song");
        assert_eq!(pluralize("song", 2), "songs");
        assert_eq!(fmt_opt(None, 2), "-");
        assert_eq!(fmt_opt(Some(0.123_456), 3), "0.123");
        assert_eq!(fmt_p(0.000_01), "<0.0001");
        assert_eq!(fmt_p(0.0421), "0.0421");
    }
}
