use crate::clock::Clock;
use crate::format::{self, Tense};
use crate::span::Span;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset};
use log::debug;
use serde::{
    de::{Deserializer, Error},
    Deserialize,
};
use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::Path;

/// A single moment to describe
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Entry {
    /// A timestamp, described relative to now
    At(DateTime<FixedOffset>),
    /// A span, described with a suffix only when a tense is given
    Span { span: Span, tense: Option<Tense> },
}

impl Entry {
    /// Describe the entry relative to the clock's current time
    pub fn describe(&self, clock: &impl Clock) -> String {
        match self {
            Self::At(date) => format::relative_date(date, clock),
            Self::Span {
                span: Span(span),
                tense: None,
            } => format::duration(span),
            Self::Span {
                span: Span(span),
                tense: Some(tense),
            } => format::with_tense(span, *tense),
        }
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct RawEntry {
            at: Option<DateTime<FixedOffset>>,
            span: Option<Span>,
            tense: Option<Tense>,
        }

        match RawEntry::deserialize(deserializer)? {
            RawEntry {
                at: Some(_),
                span: Some(_),
                ..
            } => Err(Error::custom("`at` and `span` cannot both be set")),
            RawEntry {
                at: Some(_),
                tense: Some(_),
                ..
            } => Err(Error::custom("`tense` can only be set with `span`")),
            RawEntry { at: Some(at), .. } => Ok(Self::At(at)),
            RawEntry {
                span: Some(span),
                tense,
                ..
            } => Ok(Self::Span { span, tense }),
            RawEntry {
                at: None,
                span: None,
                ..
            } => Err(Error::custom("either `at` or `span` must be set")),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTimefile {
    #[serde(default)]
    entries: BTreeMap<String, Entry>,
}

#[derive(Debug)]
pub struct Timefile {
    pub entries: BTreeMap<String, Entry>,
}

impl Timefile {
    fn from_raw(raw: RawTimefile) -> Result<Self> {
        for name in raw.entries.keys() {
            validate_name(name)?;
        }

        Ok(Self {
            entries: raw.entries,
        })
    }

    /// Parse a timefile from TOML text
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let raw: RawTimefile =
            toml::from_str(toml_str).context("Failed to deserialize TOML timefile")?;
        Self::from_raw(raw)
    }

    /// Load a timefile by its path
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = read_to_string(path)
            .with_context(|| format!("Failed to read timefile {}", path.display()))?;
        let raw: RawTimefile = toml::from_str(&toml_str)
            .with_context(|| format!("Failed to deserialize TOML timefile {}", path.display()))?;
        let timefile = Self::from_raw(raw)?;
        debug!(
            "Loaded {} entries from timefile {}",
            timefile.entries.len(),
            path.display()
        );
        Ok(timefile)
    }

    /// Describe every entry, ordered by name
    pub fn describe(&self, clock: &impl Clock) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.describe(clock)))
            .collect()
    }
}

/// Validate an entry name
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name
            .chars()
            .any(|char| !char.is_ascii_alphanumeric() && char != '-' && char != '_')
    {
        bail!("Invalid entry name \"{name}\"")
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::clock::FixedClock;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    fn parse_entry(toml: &str) -> Result<Entry> {
        let mut timefile = Timefile::from_toml(&format!("[entries.entry]\n{toml}"))?;
        Ok(timefile.entries.remove("entry").unwrap())
    }

    /// Parse an entry that is expected to fail and return the innermost error message
    fn entry_error(toml: &str) -> String {
        parse_entry(toml).unwrap_err().root_cause().to_string()
    }

    #[test]
    fn test_empty() -> Result<()> {
        assert!(Timefile::from_toml("")?.entries.is_empty());
        Ok(())
    }

    #[test]
    fn test_at() -> Result<()> {
        assert_matches!(parse_entry("at = '2024-05-01T09:00:00+02:00'")?, Entry::At(date) => {
            assert_eq!(date, Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap());
        });
        Ok(())
    }

    #[test]
    fn test_span() -> Result<()> {
        assert_eq!(
            parse_entry("span = '2D12h'")?,
            Entry::Span {
                span: Span(Duration::hours(60)),
                tense: None,
            }
        );
        assert_eq!(
            parse_entry("span = '45m'\ntense = 'future'")?,
            Entry::Span {
                span: Span(Duration::minutes(45)),
                tense: Some(Tense::Future),
            }
        );
        Ok(())
    }

    #[test]
    fn test_both_set() {
        assert!(entry_error("at = '2024-05-01T09:00:00Z'\nspan = '1h'")
            .contains("`at` and `span` cannot both be set"));
    }

    #[test]
    fn test_neither_set() {
        assert!(entry_error("tense = 'past'").contains("either `at` or `span` must be set"));
    }

    #[test]
    fn test_tense_with_at() {
        assert!(entry_error("at = '2024-05-01T09:00:00Z'\ntense = 'past'")
            .contains("`tense` can only be set with `span`"));
    }

    #[test]
    fn test_invalid_span() {
        assert!(entry_error("span = 'soon'").contains("Invalid span \"soon\""));
    }

    #[test]
    fn test_invalid_tense() {
        assert!(parse_entry("span = '1h'\ntense = 'present'").is_err());
    }

    #[test]
    fn test_unknown_field() {
        assert!(parse_entry("span = '1h'\nsuffix = 'ago'").is_err());
        assert!(Timefile::from_toml("[other]").is_err());
    }

    #[test]
    fn test_invalid_name() {
        assert_eq!(
            Timefile::from_toml("[entries.'a b']\nspan = '1h'")
                .unwrap_err()
                .to_string(),
            "Invalid entry name \"a b\""
        );
        assert!(Timefile::from_toml("[entries.'']\nspan = '1h'").is_err());
        assert!(Timefile::from_toml("[entries.release_v2-rc]\nspan = '1h'").is_ok());
    }

    #[test]
    fn test_describe() -> Result<()> {
        let timefile = Timefile::from_toml(
            "[entries.uptime]
span = '3D4h'

[entries.release]
at = '2024-05-01T11:15:00Z'

[entries.deadline]
span = '2D'
tense = 'future'

[entries.launch]
at = '2024-05-03T12:00:00Z'",
        )?;

        assert_eq!(
            timefile.describe(&clock()),
            vec![
                ("deadline".to_owned(), "2 days from now".to_owned()),
                ("launch".to_owned(), "2 days from now".to_owned()),
                ("release".to_owned(), "about 1 hour ago".to_owned()),
                ("uptime".to_owned(), "3 days".to_owned()),
            ]
        );
        Ok(())
    }
}
