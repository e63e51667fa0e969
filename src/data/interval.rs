use anyhow::{bail, Context, Result};

/// Suffix to seconds multiplier
const UNITS: &[(&str, u64)] = &[("h", 3_600), ("m", 60), ("s", 1)];

/// Parse a check interval like "300", "90s", "5m" or "1h" into seconds.
pub fn parse_interval(s: &str) -> Result<u32> {
    let s = s.trim();
    if s.is_empty() {
        bail!("Empty interval");
    }

    let (value, multiplier) = UNITS
        .iter()
        .find_map(|(suffix, multiplier)| s.strip_suffix(suffix).map(|v| (v, *multiplier)))
        .unwrap_or((s, 1));

    let value: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("Unknown interval format: {}", s))?;

    let secs = value
        .checked_mul(multiplier)
        .and_then(|secs| u32::try_from(secs).ok())
        .with_context(|| format!("Interval too large: {}", s))?;

    if secs == 0 {
        bail!("Interval must be positive: {}", s);
    }
    Ok(secs)
}

/// Format an interval for display, e.g. "every 5 min".
pub fn format_interval(secs: u32) -> String {
    if secs % 3_600 == 0 {
        format!("every {} h", secs / 3_600)
    } else if secs % 60 == 0 {
        format!("every {} min", secs / 60)
    } else {
        format!("every {} s", secs)
    }
}
