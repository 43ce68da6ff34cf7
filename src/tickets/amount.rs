//! Parsing of es-CO formatted money cells (`1.234.567,89`).

use tracing::warn;

/// Parse an es-CO amount: `.` groups thousands, `,` marks decimals.
///
/// Returns `None` for missing, blank or unparseable text. Unparseable text is
/// logged so a format change on the portal shows up in the logs instead of
/// silently zeroing amounts.
pub fn parse_amount(raw: Option<&str>) -> Option<f64> {
    let raw = raw?;
    let trimmed = raw.trim().trim_start_matches('$').trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized: String = trimmed
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            warn!(raw, "unparseable amount");
            None
        }
    }
}
