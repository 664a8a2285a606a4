//! Cadence expressions.
//!
//! A cadence is parsed once, at load time, from an expression of the form
//!
//! ```text
//! every [N] <unit> [at <time>]
//! ```
//!
//! where `unit` is one of `second`, `minute`, `hour`, `day`, `week` (singular
//! or plural) or a weekday name. The `at` clause pins the occurrence inside
//! the period: `HH:MM[:SS]` for days and weekdays, `:MM` or `MM:SS` for
//! hours, `:SS` for minutes. Times are local wall-clock times.

use crate::error::ScheduleError;
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike, Weekday};
use rootcause::prelude::Report;
use std::fmt;

/// The period a cadence repeats on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    /// Once a week, on the given day.
    Weekday(Weekday),
}

impl Unit {
    fn singular(self) -> &'static str {
        match self {
            Self::Seconds => "second",
            Self::Minutes => "minute",
            Self::Hours => "hour",
            Self::Days => "day",
            Self::Weeks => "week",
            Self::Weekday(Weekday::Mon) => "monday",
            Self::Weekday(Weekday::Tue) => "tuesday",
            Self::Weekday(Weekday::Wed) => "wednesday",
            Self::Weekday(Weekday::Thu) => "thursday",
            Self::Weekday(Weekday::Fri) => "friday",
            Self::Weekday(Weekday::Sat) => "saturday",
            Self::Weekday(Weekday::Sun) => "sunday",
        }
    }

    fn step(self) -> Duration {
        match self {
            Self::Seconds => Duration::seconds(1),
            Self::Minutes => Duration::minutes(1),
            Self::Hours => Duration::hours(1),
            Self::Days => Duration::days(1),
            Self::Weeks | Self::Weekday(_) => Duration::weeks(1),
        }
    }
}

/// Where inside its period a cadence occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtTime {
    /// Time of day, for day and weekday cadences.
    TimeOfDay(NaiveTime),
    /// Offset into the hour, for hour cadences.
    MinuteOfHour { minute: u32, second: u32 },
    /// Offset into the minute, for minute cadences.
    SecondOfMinute(u32),
}

impl AtTime {
    fn offset(self) -> Duration {
        match self {
            Self::TimeOfDay(time) => Duration::seconds(i64::from(time.num_seconds_from_midnight())),
            Self::MinuteOfHour { minute, second } => {
                Duration::minutes(i64::from(minute)) + Duration::seconds(i64::from(second))
            }
            Self::SecondOfMinute(second) => Duration::seconds(i64::from(second)),
        }
    }
}

/// A parsed cadence expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    interval: u32,
    unit: Unit,
    at: Option<AtTime>,
}

impl Cadence {
    /// Parses a cadence expression.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::InvalidCadence` if the expression does not
    /// follow the grammar in the module documentation.
    pub fn parse(expression: &str) -> Result<Self, Report<ScheduleError>> {
        let invalid = |reason: String| ScheduleError::InvalidCadence {
            expression: expression.to_string(),
            reason,
        };

        let lowered = expression.to_ascii_lowercase();
        let mut tokens = lowered.split_whitespace().peekable();

        match tokens.next() {
            Some("every") => {}
            Some(other) => return Err(invalid(format!("expected 'every', found '{other}'")).into()),
            None => return Err(invalid("expression is empty".to_string()).into()),
        }

        let interval = match tokens.peek().and_then(|token| token.parse::<u32>().ok()) {
            Some(interval) => {
                tokens.next();
                interval
            }
            None => 1,
        };
        if interval == 0 {
            return Err(invalid("interval must be positive".to_string()).into());
        }

        let unit_token = tokens
            .next()
            .ok_or_else(|| invalid("missing unit".to_string()))?;
        let unit =
            parse_unit(unit_token).ok_or_else(|| invalid(format!("unknown unit '{unit_token}'")))?;
        if span_of(unit, interval).is_none() {
            return Err(invalid(format!(
                "an interval of {interval} {}s is longer than {MAX_SPAN_DAYS} days",
                unit.singular()
            ))
            .into());
        }
        if matches!(unit, Unit::Weekday(_)) && interval != 1 {
            return Err(invalid(format!(
                "'{}' cadences repeat weekly and take no interval",
                unit.singular()
            ))
            .into());
        }

        let at = match tokens.next() {
            None => None,
            Some("at") => {
                let time = tokens
                    .next()
                    .ok_or_else(|| invalid("missing time after 'at'".to_string()))?;
                Some(parse_at(unit, time).map_err(invalid)?)
            }
            Some(other) => return Err(invalid(format!("unexpected '{other}'")).into()),
        };

        if let Some(extra) = tokens.next() {
            return Err(invalid(format!("unexpected '{extra}'")).into());
        }

        Ok(Self { interval, unit, at })
    }

    /// Returns how many units pass between occurrences.
    #[must_use]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Returns the repeating unit.
    #[must_use]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Returns the pinned time within the period, if any.
    #[must_use]
    pub fn at(&self) -> Option<AtTime> {
        self.at
    }

    /// Time between occurrences.
    #[must_use]
    pub fn span(&self) -> Duration {
        span_of(self.unit, self.interval).unwrap_or_else(max_span)
    }

    /// Calculates the first occurrence strictly after `now`.
    ///
    /// Saturates at the latest representable time instead of overflowing.
    #[must_use]
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let span = self.span();
        let extra = span - self.unit.step();

        match (self.unit, self.at) {
            (Unit::Weekday(day), at) => {
                let days_ahead = (day.num_days_from_monday() + 7
                    - now.weekday().num_days_from_monday())
                    % 7;
                let time = match at {
                    Some(AtTime::TimeOfDay(time)) => time,
                    _ => NaiveTime::default(),
                };
                let candidate = shift(
                    now.date().and_time(time),
                    Duration::days(i64::from(days_ahead)),
                );
                first_after(candidate, now, Duration::weeks(1))
            }
            (Unit::Days, Some(at)) => {
                let day_start = now.date().and_time(NaiveTime::default());
                shift(first_after(shift(day_start, at.offset()), now, Duration::days(1)), extra)
            }
            (Unit::Hours, Some(at)) => {
                let hour_start = shift(
                    now,
                    -(Duration::seconds(i64::from(now.minute() * 60 + now.second()))
                        + Duration::nanoseconds(i64::from(now.nanosecond()))),
                );
                shift(first_after(shift(hour_start, at.offset()), now, Duration::hours(1)), extra)
            }
            (Unit::Minutes, Some(at)) => {
                let minute_start = shift(
                    now,
                    -(Duration::seconds(i64::from(now.second()))
                        + Duration::nanoseconds(i64::from(now.nanosecond()))),
                );
                shift(
                    first_after(shift(minute_start, at.offset()), now, Duration::minutes(1)),
                    extra,
                )
            }
            // `at` is rejected by the parser for seconds and weeks.
            (_, _) => shift(now, span),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.interval == 1 {
            write!(f, "every {}", self.unit.singular())?;
        } else {
            write!(f, "every {} {}s", self.interval, self.unit.singular())?;
        }
        match self.at {
            None => Ok(()),
            Some(AtTime::TimeOfDay(time)) => write!(f, " at {}", time.format("%H:%M:%S")),
            Some(AtTime::MinuteOfHour { minute, second }) => {
                write!(f, " at {minute:02}:{second:02}")
            }
            Some(AtTime::SecondOfMinute(second)) => write!(f, " at :{second:02}"),
        }
    }
}

/// Longest accepted time between occurrences.
const MAX_SPAN_DAYS: i64 = 36_525;

fn max_span() -> Duration {
    Duration::days(MAX_SPAN_DAYS)
}

fn span_of(unit: Unit, interval: u32) -> Option<Duration> {
    let interval = i32::try_from(interval).ok()?;
    unit.step()
        .checked_mul(interval)
        .filter(|span| *span <= max_span())
}

/// Adds `by` to `at`, clamping to the representable range.
fn shift(at: NaiveDateTime, by: Duration) -> NaiveDateTime {
    at.checked_add_signed(by).unwrap_or(if by < Duration::zero() {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}

fn first_after(candidate: NaiveDateTime, now: NaiveDateTime, step: Duration) -> NaiveDateTime {
    if candidate <= now {
        shift(candidate, step)
    } else {
        candidate
    }
}

fn parse_unit(token: &str) -> Option<Unit> {
    let unit = match token.strip_suffix('s').unwrap_or(token) {
        "second" => Unit::Seconds,
        "minute" => Unit::Minutes,
        "hour" => Unit::Hours,
        "day" => Unit::Days,
        "week" => Unit::Weeks,
        "monday" => Unit::Weekday(Weekday::Mon),
        "tuesday" => Unit::Weekday(Weekday::Tue),
        "wednesday" => Unit::Weekday(Weekday::Wed),
        "thursday" => Unit::Weekday(Weekday::Thu),
        "friday" => Unit::Weekday(Weekday::Fri),
        "saturday" => Unit::Weekday(Weekday::Sat),
        "sunday" => Unit::Weekday(Weekday::Sun),
        _ => return None,
    };
    Some(unit)
}

fn parse_at(unit: Unit, token: &str) -> Result<AtTime, String> {
    match unit {
        Unit::Days | Unit::Weekday(_) => NaiveTime::parse_from_str(token, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(token, "%H:%M"))
            .map(AtTime::TimeOfDay)
            .map_err(|_| format!("expected HH:MM or HH:MM:SS, found '{token}'")),
        Unit::Hours => {
            let parsed = match token.strip_prefix(':') {
                Some(minute) => sixtieth(minute).map(|minute| (minute, 0)),
                None => token
                    .split_once(':')
                    .and_then(|(minute, second)| Some((sixtieth(minute)?, sixtieth(second)?))),
            };
            parsed
                .map(|(minute, second)| AtTime::MinuteOfHour { minute, second })
                .ok_or_else(|| format!("expected :MM or MM:SS, found '{token}'"))
        }
        Unit::Minutes => token
            .strip_prefix(':')
            .and_then(sixtieth)
            .map(AtTime::SecondOfMinute)
            .ok_or_else(|| format!("expected :SS, found '{token}'")),
        Unit::Seconds | Unit::Weeks => Err(format!(
            "'at' is not supported for {} cadences",
            unit.singular()
        )),
    }
}

/// Parses a two-digit minute or second field.
fn sixtieth(field: &str) -> Option<u32> {
    if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok().filter(|value| *value < 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Monday 2024-03-04 at the given time.
    fn monday(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .expect("valid date")
    }

    #[test]
    fn parses_interval_and_unit() {
        let cadence = Cadence::parse("every 10 seconds").expect("should parse");
        assert_eq!(cadence.interval(), 10);
        assert_eq!(cadence.unit(), Unit::Seconds);
        assert_eq!(cadence.at(), None);
    }

    #[test]
    fn interval_defaults_to_one() {
        let cadence = Cadence::parse("Every Hour").expect("should parse");
        assert_eq!(cadence.interval(), 1);
        assert_eq!(cadence.unit(), Unit::Hours);
    }

    #[test]
    fn parses_weekday_with_time() {
        let cadence = Cadence::parse("every wednesday at 13:15").expect("should parse");
        assert_eq!(cadence.unit(), Unit::Weekday(Weekday::Wed));
        assert_eq!(
            cadence.at(),
            Some(AtTime::TimeOfDay(NaiveTime::from_hms_opt(13, 15, 0).expect("valid")))
        );
    }

    #[test]
    fn parses_hour_offsets() {
        let short = Cadence::parse("every hour at :30").expect("should parse");
        assert_eq!(short.at(), Some(AtTime::MinuteOfHour { minute: 30, second: 0 }));

        let long = Cadence::parse("every 2 hours at 05:45").expect("should parse");
        assert_eq!(long.at(), Some(AtTime::MinuteOfHour { minute: 5, second: 45 }));
    }

    #[test]
    fn rejects_malformed_expressions() {
        for expression in [
            "",
            "often",
            "every",
            "every 0 seconds",
            "every fortnight",
            "every 2 mondays",
            "every 10 seconds at :30",
            "every week at 10:00",
            "every day at noon",
            "every minute at 30",
            "every hour at :75",
            "every day please",
            "every day at 10:00 sharp",
            "schedule.every(10).seconds",
        ] {
            let err = Cadence::parse(expression).unwrap_err();
            assert!(
                err.to_string().contains("invalid cadence"),
                "expected rejection of {expression:?}, got {err}"
            );
        }
    }

    #[test]
    fn rejects_intervals_beyond_a_century() {
        for expression in [
            "every 4000000000 seconds",
            "every 2000000000 weeks",
            "every 36526 days",
            "every 5218 weeks",
        ] {
            let err = Cadence::parse(expression).unwrap_err();
            assert!(
                err.to_string().contains("is longer than"),
                "expected rejection of {expression:?}, got {err}"
            );
        }

        let longest = Cadence::parse("every 36525 days").expect("should parse");
        assert_eq!(longest.span(), Duration::days(36_525));
    }

    #[test]
    fn next_after_saturates_at_the_end_of_time() {
        let cadence = Cadence::parse("every 5000 weeks").expect("should parse");
        assert_eq!(cadence.next_after(NaiveDateTime::MAX), NaiveDateTime::MAX);

        let cadence = Cadence::parse("every 2 days at 10:30").expect("should parse");
        assert_eq!(cadence.next_after(NaiveDateTime::MAX), NaiveDateTime::MAX);
    }

    #[test]
    fn plain_interval_counts_from_now() {
        let now = monday(9, 0, 0);
        let cadence = Cadence::parse("every 10 seconds").expect("should parse");
        assert_eq!(cadence.next_after(now), monday(9, 0, 10));

        let cadence = Cadence::parse("every 3 days").expect("should parse");
        assert_eq!(cadence.next_after(now), monday(9, 0, 0) + Duration::days(3));
    }

    #[test]
    fn daily_time_later_today() {
        let cadence = Cadence::parse("every day at 10:30").expect("should parse");
        assert_eq!(cadence.next_after(monday(9, 0, 0)), monday(10, 30, 0));
    }

    #[test]
    fn daily_time_already_passed_rolls_to_tomorrow() {
        let cadence = Cadence::parse("every day at 10:30").expect("should parse");
        assert_eq!(
            cadence.next_after(monday(10, 30, 0)),
            monday(10, 30, 0) + Duration::days(1)
        );
    }

    #[test]
    fn multi_day_time_adds_remaining_days() {
        let cadence = Cadence::parse("every 2 days at 08:00").expect("should parse");
        assert_eq!(
            cadence.next_after(monday(9, 0, 0)),
            monday(8, 0, 0) + Duration::days(2)
        );
    }

    #[test]
    fn hourly_offset() {
        let cadence = Cadence::parse("every hour at :15").expect("should parse");
        assert_eq!(cadence.next_after(monday(9, 10, 0)), monday(9, 15, 0));
        assert_eq!(cadence.next_after(monday(9, 20, 0)), monday(10, 15, 0));
    }

    #[test]
    fn minute_offset() {
        let cadence = Cadence::parse("every minute at :05").expect("should parse");
        assert_eq!(cadence.next_after(monday(9, 10, 3)), monday(9, 10, 5));
        assert_eq!(cadence.next_after(monday(9, 10, 5)), monday(9, 11, 5));
    }

    #[test]
    fn weekday_finds_next_matching_day() {
        let cadence = Cadence::parse("every friday at 18:00").expect("should parse");
        assert_eq!(
            cadence.next_after(monday(9, 0, 0)),
            monday(18, 0, 0) + Duration::days(4)
        );

        let same_day = Cadence::parse("every monday at 12:00").expect("should parse");
        assert_eq!(same_day.next_after(monday(9, 0, 0)), monday(12, 0, 0));
        assert_eq!(
            same_day.next_after(monday(12, 0, 0)),
            monday(12, 0, 0) + Duration::weeks(1)
        );
    }

    #[test]
    fn weekday_without_time_starts_at_midnight() {
        let cadence = Cadence::parse("every tuesday").expect("should parse");
        assert_eq!(
            cadence.next_after(monday(9, 0, 0)),
            monday(0, 0, 0) + Duration::days(1)
        );
    }

    #[test]
    fn display_is_reparseable() {
        for expression in [
            "every second",
            "every 10 seconds",
            "every 2 hours at 05:45",
            "every minute at :07",
            "every day at 10:30",
            "every sunday at 06:00:30",
        ] {
            let cadence = Cadence::parse(expression).expect("should parse");
            let reparsed = Cadence::parse(&cadence.to_string()).expect("should reparse");
            assert_eq!(cadence, reparsed, "{expression} displayed as {cadence}");
        }
    }
}
