use crate::clock::Clock;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;

// Number of minutes in various time periods
const MINUTES_HOUR: i64 = 60;
const MINUTES_DAY: i64 = MINUTES_HOUR * 24;
const MINUTES_MONTH: i64 = MINUTES_DAY * 30;
const MINUTES_YEAR: i64 = MINUTES_DAY * 365;
const MINUTES_QUARTER: i64 = MINUTES_YEAR / 4;

const NANOS_SECOND: i128 = 1_000_000_000;
const NANOS_MINUTE: i128 = NANOS_SECOND * 60;

/// Exclusive upper bound of a bucket
#[derive(Clone, Copy, Debug)]
enum Limit {
    Seconds(i64),
    Minutes(i64),
}

impl Limit {
    fn contains(self, elapsed: &Elapsed) -> bool {
        match self {
            Self::Seconds(limit) => elapsed.seconds < limit,
            Self::Minutes(limit) => elapsed.minutes < limit,
        }
    }
}

/// The text a bucket produces
#[derive(Clone, Copy, Debug)]
enum Phrase {
    Fixed(&'static str),
    /// `minutes` divided into whole `unit`s, optionally prefixed with "about"
    Count {
        about: bool,
        per_unit: i64,
        unit: &'static str,
    },
}

impl Phrase {
    fn render(self, minutes: i64) -> String {
        match self {
            Self::Fixed(text) => String::from(text),
            Self::Count {
                about,
                per_unit,
                unit,
            } => {
                let count = pluralize(div_round(minutes, per_unit), unit);
                if about {
                    format!("about {count}")
                } else {
                    count
                }
            }
        }
    }
}

// Evaluated in order, the first bucket whose limit contains the span wins
const BUCKETS: &[(Limit, Phrase)] = &[
    (Limit::Seconds(30), Phrase::Fixed("less than a minute")),
    (Limit::Minutes(2), Phrase::Fixed("1 minute")),
    (
        Limit::Minutes(45),
        Phrase::Count {
            about: false,
            per_unit: 1,
            unit: "minute",
        },
    ),
    (Limit::Minutes(90), Phrase::Fixed("about 1 hour")),
    (
        Limit::Minutes(MINUTES_DAY),
        Phrase::Count {
            about: true,
            per_unit: MINUTES_HOUR,
            unit: "hour",
        },
    ),
    (Limit::Minutes(MINUTES_HOUR * 42), Phrase::Fixed("1 day")),
    (
        Limit::Minutes(MINUTES_MONTH),
        Phrase::Count {
            about: false,
            per_unit: MINUTES_DAY,
            unit: "day",
        },
    ),
    (
        Limit::Minutes(MINUTES_MONTH * 2),
        Phrase::Count {
            about: true,
            per_unit: MINUTES_MONTH,
            unit: "month",
        },
    ),
    (
        Limit::Minutes(MINUTES_YEAR),
        Phrase::Count {
            about: false,
            per_unit: MINUTES_MONTH,
            unit: "month",
        },
    ),
];

/// A span reduced to whole seconds and whole minutes, each rounded half away from zero
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Elapsed {
    seconds: i64,
    minutes: i64,
}

impl From<&Duration> for Elapsed {
    fn from(span: &Duration) -> Self {
        let span = span.abs();
        let nanos =
            i128::from(span.num_seconds()) * NANOS_SECOND + i128::from(span.subsec_nanos());
        // `Duration` is bounded by i64::MAX milliseconds, so both quotients fit in an i64
        Self {
            seconds: ((nanos + NANOS_SECOND / 2) / NANOS_SECOND) as i64,
            minutes: ((nanos + NANOS_MINUTE / 2) / NANOS_MINUTE) as i64,
        }
    }
}

/// Divide a non-negative number, rounding half away from zero
fn div_round(value: i64, divisor: i64) -> i64 {
    (value + divisor / 2) / divisor
}

fn pluralize(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Describe a span of at least one year
fn years(minutes: i64) -> String {
    // Every fourth year is a day longer than the 365 days that `MINUTES_YEAR` assumes
    let leap_offset = (minutes / MINUTES_YEAR / 4) * MINUTES_DAY;
    year_phrase(minutes - leap_offset)
}

/// Describe leap-corrected minutes by how far they are into their year
fn year_phrase(minutes: i64) -> String {
    let years = minutes / MINUTES_YEAR;
    match minutes % MINUTES_YEAR {
        remainder if remainder < MINUTES_QUARTER => {
            format!("about {}", pluralize(years, "year"))
        }
        remainder if remainder < MINUTES_QUARTER * 3 => {
            format!("over {}", pluralize(years, "year"))
        }
        _ => format!("almost {}", pluralize(years + 1, "year")),
    }
}

/// Format a duration as a human-readable string
///
/// Only the magnitude of the duration matters: a negative duration is described the same as its absolute value.
/// Months and years are fixed lengths of 30 and 365 days, with one extra day counted for every fourth year.
pub fn duration(duration: &Duration) -> String {
    let elapsed = Elapsed::from(duration);
    match BUCKETS.iter().find(|(limit, _)| limit.contains(&elapsed)) {
        Some((_, phrase)) => phrase.render(elapsed.minutes),
        None => years(elapsed.minutes),
    }
}

/// Whether a moment lies before or after now
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Tense {
    Past,
    Future,
}

impl Tense {
    /// Determine the tense of a delta computed as `now - moment`
    pub fn of(delta: &Duration) -> Self {
        if *delta < Duration::zero() {
            Self::Future
        } else {
            Self::Past
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Past => "ago",
            Self::Future => "from now",
        }
    }
}

/// Format the magnitude of a duration followed by the suffix for `tense`
pub fn with_tense(duration: &Duration, tense: Tense) -> String {
    format!("{} {}", self::duration(duration), tense.suffix())
}

/// Format a delta computed as `now - moment`
///
/// Positive and zero deltas are in the past, negative deltas are in the future.
pub fn relative(delta: &Duration) -> String {
    with_tense(delta, Tense::of(delta))
}

/// Format a date relative to the clock's current time
pub fn relative_date<Tz: TimeZone>(date: &DateTime<Tz>, clock: &impl Clock) -> String {
    relative(&clock.now().signed_duration_since(date.with_timezone(&Utc)))
}
