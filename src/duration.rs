//! # duration
//!
//! Parsers for the compact strings accepted on the command line:
//!
//! * durations such as `"1h30m15s"`, `"3h40m"`, `"10s"` or `""`
//! * a time of day such as `"09:30"`
//!
//! Both match the **whole** input.  Anything left over after the grammar is
//! exhausted is an error, never silently ignored.

use chrono::NaiveTime;

use crate::error::FormatError;

/// Segment units in the only order they may appear.
const UNITS: [(char, u64); 3] = [('h', 3600), ('m', 60), ('s', 1)];

/// Parse `[<N>h][<N>m][<N>s]` into a number of seconds.
///
/// Each segment is optional but the order is fixed.  The empty string means
/// "no segments" and yields `0`.
pub fn parse_duration(input: &str) -> Result<u64, FormatError> {
    let err = || FormatError::duration(input);

    let mut rest = input;
    let mut total: u64 = 0;
    let mut next_unit = 0;

    while !rest.is_empty() {
        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 {
            return Err(err());
        }
        let (digits, tail) = rest.split_at(digits_len);

        let unit = tail.chars().next().ok_or_else(err)?;
        let offset = UNITS[next_unit..]
            .iter()
            .position(|(u, _)| *u == unit)
            .ok_or_else(err)?;
        let (_, multiplier) = UNITS[next_unit + offset];
        next_unit += offset + 1;

        let value: u64 = digits.parse().map_err(|_| err())?;
        total = value
            .checked_mul(multiplier)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(err)?;

        rest = &tail[unit.len_utf8()..];
    }

    Ok(total)
}

/// Parse a 24h `HH:MM` time of day.
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, FormatError> {
    let well_formed = input.len() == 5
        && input.as_bytes()[2] == b':'
        && input.bytes().enumerate().all(|(i, b)| i == 2 || b.is_ascii_digit());
    if !well_formed {
        return Err(FormatError::time_of_day(input));
    }

    NaiveTime::parse_from_str(input, "%H:%M").map_err(|_| FormatError::time_of_day(input))
}
