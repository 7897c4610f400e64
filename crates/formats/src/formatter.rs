//! Host formatting seam for tooltip values.

use serde_json::Value;

/// Formats raw cell values with a column's own format string.
///
/// The real formatting service lives in the host; the engine depends only
/// on this seam. A missing value always formats as the empty string, never
/// as a null placeholder.
pub trait ValueFormatter {
    fn format(&self, value: Option<&Value>, format: Option<&str>) -> String;
}

/// Plain display formatting: strings pass through and numbers honor a
/// `0.00`-style precision pattern.
#[derive(Debug, Default, Copy, Clone)]
pub struct DisplayFormatter;

impl ValueFormatter for DisplayFormatter {
    fn format(&self, value: Option<&Value>, format: Option<&str>) -> String {
        let Some(value) = value else {
            return String::new();
        };
        match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => match (n.as_f64(), decimals(format)) {
                (Some(v), Some(precision)) => format!("{v:.precision$}"),
                _ => n.to_string(),
            },
            other => other.to_string(),
        }
    }
}

/// Number of fraction digits requested by a `0.00`-style pattern.
fn decimals(format: Option<&str>) -> Option<usize> {
    let format = format?;
    let dot = format.find('.')?;
    let fraction = &format[dot + 1..];
    if fraction.is_empty() || !fraction.chars().all(|c| c == '0' || c == '#') {
        return None;
    }
    Some(fraction.len())
}
