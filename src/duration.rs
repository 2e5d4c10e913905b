//! TICKscript duration literals (`10s`, `5m`, `1w`).

use std::time::Duration;

use crate::error::{PipelineError, Result};

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: u128 = 24 * NANOS_PER_HOUR;
const NANOS_PER_WEEK: u128 = 7 * NANOS_PER_DAY;

/// Units from largest to smallest, as written in literals.
const UNITS: [(u128, &str); 7] = [
  (NANOS_PER_WEEK, "w"),
  (NANOS_PER_DAY, "d"),
  (NANOS_PER_HOUR, "h"),
  (NANOS_PER_MINUTE, "m"),
  (NANOS_PER_SECOND, "s"),
  (NANOS_PER_MILLI, "ms"),
  (NANOS_PER_MICRO, "u"),
];

/// Formats `d` using the largest unit that divides it exactly.
pub fn format_duration(d: Duration) -> String {
  let nanos = d.as_nanos();
  if nanos == 0 {
    return "0s".to_string();
  }
  for (size, unit) in UNITS {
    if nanos % size == 0 {
      return format!("{}{}", nanos / size, unit);
    }
  }
  format!("{}ns", nanos)
}

/// Parses a single `<integer><unit>` literal.
pub fn parse_duration(text: &str) -> Result<Duration> {
  let invalid = || PipelineError::InvalidDuration(text.to_string());
  let s = text.trim();
  let split = s.find(|c: char| !c.is_ascii_digit()).ok_or_else(invalid)?;
  let (digits, unit) = s.split_at(split);
  if digits.is_empty() {
    return Err(invalid());
  }
  let value: u64 = digits.parse().map_err(|_| invalid())?;
  let scale: u64 = match unit {
    "ns" => 1,
    "u" | "us" | "µ" | "µs" => 1_000,
    "ms" => 1_000_000,
    "s" => 1_000_000_000,
    "m" => 60 * 1_000_000_000,
    "h" => 60 * 60 * 1_000_000_000,
    "d" => 24 * 60 * 60 * 1_000_000_000,
    "w" => 7 * 24 * 60 * 60 * 1_000_000_000,
    _ => return Err(invalid()),
  };
  let nanos = value.checked_mul(scale).ok_or_else(invalid)?;
  Ok(Duration::from_nanos(nanos))
}
