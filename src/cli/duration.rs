//! Parsing `--interval` values.

use std::time::Duration;

/// Parse a duration such as `500ms`, `5s`, `1m30s` or `2h`.
///
/// A bare number is taken as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(format!("invalid duration: {}", s));
        }
        let num: u64 = rest[..digits]
            .parse()
            .map_err(|_| format!("invalid duration: {}", s))?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let secs_per_unit = match &rest[..unit_len] {
            "ms" => None,
            "s" => Some(1),
            "m" => Some(60),
            "h" => Some(60 * 60),
            "" => return Err(format!("missing unit in duration: {}", s)),
            other => return Err(format!("unknown duration unit \"{}\" in {}", other, s)),
        };
        let part = match secs_per_unit {
            None => Some(Duration::from_millis(num)),
            Some(factor) => num.checked_mul(factor).map(Duration::from_secs),
        };
        total = part
            .and_then(|part| total.checked_add(part))
            .ok_or_else(|| format!("duration out of range: {}", s))?;
        rest = &rest[unit_len..];
    }

    Ok(total)
}
