use anyhow::{anyhow, bail, Context, Result};
use chrono::Duration;
use log::debug;
use serde::de::{Deserialize, Deserializer, Error};
use std::str::FromStr;

// Calendar-free unit sizes in minutes, matched by their uppercase suffix
const UNITS: [(char, i64); 3] = [('Y', 525_600), ('M', 43_200), ('D', 1_440)];

/// Parse a span such as `2D12h`, `1Y6M`, or `44m30s`
///
/// Years, months, and days come first as `<n>Y`, `<n>M`, and `<n>D`, in that order. Anything after them is parsed
/// by `humantime`.
pub fn parse(input: &str) -> Result<Duration> {
    let input = input.trim();
    if input.is_empty() {
        bail!("Span is empty");
    }

    let mut rest = input;
    let mut minutes: i64 = 0;
    for (suffix, unit_minutes) in UNITS {
        let Some((count, tail)) = rest.split_once(suffix) else {
            continue;
        };
        let count: i64 = count
            .trim()
            .parse()
            .with_context(|| format!("Invalid {suffix} count \"{count}\" in span \"{input}\""))?;
        minutes = count
            .checked_mul(unit_minutes)
            .and_then(|unit_total| minutes.checked_add(unit_total))
            .ok_or_else(|| anyhow!("Span \"{input}\" is too large"))?;
        rest = tail;
    }

    let mut span = Duration::try_minutes(minutes)
        .ok_or_else(|| anyhow!("Span \"{input}\" is too large"))?;
    let rest = rest.trim();
    if !rest.is_empty() {
        let tail = humantime::parse_duration(rest)
            .with_context(|| format!("Invalid span \"{input}\""))?;
        span = Duration::from_std(tail)
            .ok()
            .and_then(|tail| span.checked_add(&tail))
            .ok_or_else(|| anyhow!("Span \"{input}\" is too large"))?;
    }

    debug!("Parsed span \"{input}\" as {span}");
    Ok(span)
}

/// A parsed span that can be read from strings and deserialized
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Span(pub Duration);

impl FromStr for Span {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        parse(input).map(Self)
    }
}

impl<'de> Deserialize<'de> for Span {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|err: anyhow::Error| Error::custom(err))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_clock_units() -> Result<()> {
        assert_eq!(parse("0s")?, Duration::zero());
        assert_eq!(parse("29s")?, Duration::seconds(29));
        assert_eq!(parse("44m30s")?, Duration::seconds(44 * 60 + 30));
        assert_eq!(parse("1h 30m")?, Duration::minutes(90));
        Ok(())
    }

    #[test]
    fn test_calendar_units() -> Result<()> {
        assert_eq!(parse("2D")?, Duration::days(2));
        assert_eq!(parse("1Y6M")?, Duration::days(365 + 180));
        assert_eq!(parse("5Y8M29D")?, Duration::days(5 * 365 + 8 * 30 + 29));
        Ok(())
    }

    #[test]
    fn test_mixed_units() -> Result<()> {
        assert_eq!(parse("2D12h")?, Duration::hours(60));
        assert_eq!(
            parse("364D23h59m30s")?,
            Duration::days(365) - Duration::seconds(30)
        );
        assert_eq!(parse("  1D 1h ")?, Duration::hours(25));
        Ok(())
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse("").unwrap_err().to_string(), "Span is empty");
        assert_eq!(parse("   ").unwrap_err().to_string(), "Span is empty");
    }

    #[test]
    fn test_invalid_count() {
        assert_eq!(
            parse("xD").unwrap_err().to_string(),
            "Invalid D count \"x\" in span \"xD\""
        );
    }

    #[test]
    fn test_out_of_order() {
        assert_eq!(
            parse("2D1Y").unwrap_err().to_string(),
            "Invalid Y count \"2D1\" in span \"2D1Y\""
        );
    }

    #[test]
    fn test_invalid_tail() {
        assert_eq!(
            parse("3D4x").unwrap_err().to_string(),
            "Invalid span \"3D4x\""
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            parse("99999999999999999Y").unwrap_err().to_string(),
            "Span \"99999999999999999Y\" is too large"
        );
    }

    #[test]
    fn test_from_str() {
        assert_matches!("45m".parse::<Span>(), Ok(Span(span)) => {
            assert_eq!(span, Duration::minutes(45));
        });
        assert!("forever".parse::<Span>().is_err());
    }
}
