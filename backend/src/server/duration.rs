//! Duration strings such as `30s`, `1m30s` or `250ms`.

use std::time::Duration;

/// Rejected duration string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid duration {value:?}: {reason}")]
pub struct DurationError {
    value: String,
    reason: &'static str,
}

impl DurationError {
    fn new(value: &str, reason: &'static str) -> Self {
        Self {
            value: value.to_owned(),
            reason,
        }
    }
}

/// Parse a sequence of integer and unit segments (`ms`, `s`, `m`, `h`).
///
/// A bare `0` is accepted as zero.
pub fn parse_duration(raw: &str) -> Result<Duration, DurationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DurationError::new(raw, "empty"));
    }
    if value == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = Duration::ZERO;
    let mut rest = value;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| DurationError::new(raw, "missing unit"))?;
        if digits == 0 {
            return Err(DurationError::new(raw, "expected a number"));
        }
        let amount: u64 = rest[..digits]
            .parse()
            .map_err(|_| DurationError::new(raw, "number out of range"))?;
        rest = &rest[digits..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let segment = match &rest[..unit_len] {
            "ms" => Duration::from_millis(amount),
            "s" => Duration::from_secs(amount),
            "m" => Duration::from_secs(amount.saturating_mul(60)),
            "h" => Duration::from_secs(amount.saturating_mul(3600)),
            _ => return Err(DurationError::new(raw, "unknown unit")),
        };
        total = total.saturating_add(segment);
        rest = &rest[unit_len..];
    }
    Ok(total)
}
