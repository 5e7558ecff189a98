//! Parsers for admin command arguments.

use std::time::Duration;

/// Parse an on/off switch.
pub fn parse_switch(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Some(true),
        "off" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a strictly positive integer.
pub fn parse_positive(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// Parse duration string (e.g., "90", "30s", "5m", "1h", "1d").
///
/// A bare number is seconds. Zero is rejected.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    if let Ok(secs) = input.parse::<u64>() {
        return (secs > 0).then(|| Duration::from_secs(secs));
    }

    let split = input.len() - input.chars().last()?.len_utf8();
    let (digits, unit) = input.split_at(split);
    let amount: u64 = digits.parse().ok()?;

    let seconds = match unit {
        "s" => amount,
        "m" => amount.checked_mul(60)?,
        "h" => amount.checked_mul(3600)?,
        "d" => amount.checked_mul(86400)?,
        _ => return None,
    };

    (seconds > 0).then(|| Duration::from_secs(seconds))
}
