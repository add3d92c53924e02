/// Shown wherever a value is absent.
pub const PLACEHOLDER: &str = "-";

const YI_YUAN: f64 = 1.0e8;

/// Formats a yuan amount in 亿元 (hundred-million yuan) with two decimals.
pub fn format_yi(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v / YI_YUAN),
        None => PLACEHOLDER.to_string(),
    }
}

/// Formats a percentage with two decimals and a trailing sign.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Collapses a formatted lower/upper pair into one display value.
pub fn collapse_range(lower: &str, upper: &str) -> String {
    if lower == upper {
        lower.to_string()
    } else if lower == PLACEHOLDER {
        upper.to_string()
    } else if upper == PLACEHOLDER {
        lower.to_string()
    } else {
        format!("{lower} ~ {upper}")
    }
}
