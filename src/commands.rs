use crate::cli::{BatchArgs, SpanArgs, TimeArgs};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use log::debug;
use timeago::clock::{Clock, FixedClock, SystemClock};
use timeago::format::{self, Tense};
use timeago::span;
use timeago::timefile::Timefile;

/// Parse an RFC 3339 timestamp provided on the command line
fn parse_timestamp(timestamp: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(timestamp.trim())
        .with_context(|| format!("Invalid RFC 3339 timestamp \"{timestamp}\""))
}

/// The clock that commands measure against, pinned when `--now` is provided
pub enum CliClock {
    System(SystemClock),
    Fixed(FixedClock),
}

impl CliClock {
    pub fn new(now: Option<&str>) -> Result<Self> {
        match now {
            None => Ok(Self::System(SystemClock)),
            Some(now) => {
                let now = parse_timestamp(now).context("Failed to parse --now")?;
                debug!("Pinning the current time to {now}");
                Ok(Self::Fixed(FixedClock(now.with_timezone(&Utc))))
            }
        }
    }
}

impl Clock for CliClock {
    fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System(clock) => clock.now(),
            Self::Fixed(clock) => clock.now(),
        }
    }
}

/// Implementation for the `span` CLI command
pub fn span(args: SpanArgs) -> Result<Vec<String>> {
    let SpanArgs {
        past,
        future,
        spans,
    } = args;

    let tense = match (past, future) {
        (true, _) => Some(Tense::Past),
        (_, true) => Some(Tense::Future),
        _ => None,
    };

    spans
        .iter()
        .map(|input| {
            let span = span::parse(input)?;
            Ok(match tense {
                Some(tense) => format::with_tense(&span, tense),
                None => format::duration(&span),
            })
        })
        .collect()
}

/// Implementation for the `time` CLI command
pub fn time(clock: &impl Clock, args: TimeArgs) -> Result<Vec<String>> {
    let TimeArgs { timestamps } = args;
    timestamps
        .iter()
        .map(|timestamp| Ok(format::relative_date(&parse_timestamp(timestamp)?, clock)))
        .collect()
}

/// Implementation for the `batch` CLI command
pub fn batch(clock: &impl Clock, args: BatchArgs) -> Result<Vec<String>> {
    let BatchArgs { timefile } = args;
    let timefile = Timefile::load(&timefile)?;
    Ok(timefile
        .describe(clock)
        .into_iter()
        .map(|(name, phrase)| format!("{name}: {phrase}"))
        .collect())
}
