//! Interval bucketing for gridded forecast layers
//!
//! Gridpoint layers report values over ISO-8601 intervals such as
//! `2024-03-01T06:00:00+00:00/PT6H`. This module spreads each value over the
//! hours it covers and groups the hours by calendar day, keeping each
//! timestamp's own UTC offset when deciding which day an hour belongs to.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, Timelike};
use tracing::debug;

use crate::Result;
use crate::error::WxError;
use crate::models::{HOURS_PER_DAY, IntervalValue, PERCENT_UNIT, PrecipitationSeries};

/// Spread interval values into per-day arrays of 24 hourly slots.
///
/// Hours never covered by an interval stay at zero. When two intervals cover
/// the same hour the later one wins.
pub fn bucketize(values: &[IntervalValue]) -> Result<PrecipitationSeries> {
    let unit_code = values
        .first()
        .map(|v| v.unit_code.clone())
        .filter(|unit| !unit.is_empty())
        .unwrap_or_else(|| PERCENT_UNIT.to_string());

    let mut days: BTreeMap<String, [i32; HOURS_PER_DAY]> = BTreeMap::new();

    for item in values {
        let (start, duration) = parse_interval(&item.valid_time)?;
        let end = start
            .checked_add_signed(duration)
            .ok_or_else(|| WxError::interval(&item.valid_time, "interval end out of range"))?;
        let value = item.value.unwrap_or(0.0) as i32;

        let mut current = start;
        while current < end {
            let key = current.format("%Y-%m-%d").to_string();
            let slots = days.entry(key).or_insert([0; HOURS_PER_DAY]);
            slots[current.hour() as usize] = value;

            current = current
                .checked_add_signed(Duration::hours(1))
                .ok_or_else(|| WxError::interval(&item.valid_time, "interval end out of range"))?;
        }
    }

    debug!(
        "Bucketized {} intervals into {} days",
        values.len(),
        days.len()
    );

    Ok(PrecipitationSeries {
        unit_code,
        values: days,
    })
}

/// Split `start/duration` into its start instant and duration
pub fn parse_interval(valid_time: &str) -> Result<(DateTime<FixedOffset>, Duration)> {
    let (start, duration) = valid_time
        .split_once('/')
        .ok_or_else(|| WxError::interval(valid_time, "expected 'start/duration'"))?;

    let start = DateTime::parse_from_rfc3339(start)
        .map_err(|e| WxError::interval(valid_time, format!("invalid start: {e}")))?;
    let duration = parse_duration(duration)
        .map_err(|message| WxError::interval(valid_time, message))?;

    Ok((start, duration))
}

/// Parse the week/day/hour/minute/second subset of ISO-8601 durations.
///
/// Year and month designators are rejected: their length depends on the
/// calendar and gridpoint layers never use them.
fn parse_duration(text: &str) -> std::result::Result<Duration, String> {
    let rest = text
        .strip_prefix('P')
        .ok_or_else(|| format!("duration '{text}' must start with 'P'"))?;

    let mut total = Duration::zero();
    let mut in_time = false;
    let mut digits = String::new();

    for c in rest.chars() {
        match c {
            'T' if !in_time && digits.is_empty() => in_time = true,
            '0'..='9' => digits.push(c),
            designator => {
                let amount: i64 = digits
                    .parse()
                    .map_err(|_| format!("missing amount before '{designator}'"))?;
                digits.clear();

                let step = match (in_time, designator) {
                    (false, 'W') => Duration::try_weeks(amount),
                    (false, 'D') => Duration::try_days(amount),
                    (true, 'H') => Duration::try_hours(amount),
                    (true, 'M') => Duration::try_minutes(amount),
                    (true, 'S') => Duration::try_seconds(amount),
                    _ => return Err(format!("unsupported designator '{designator}'")),
                }
                .ok_or_else(|| format!("duration '{text}' out of range"))?;

                total = total
                    .checked_add(&step)
                    .ok_or_else(|| format!("duration '{text}' out of range"))?;
            }
        }
    }

    if !digits.is_empty() {
        return Err(format!("trailing amount without designator in '{text}'"));
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn interval(valid_time: &str, value: f64) -> IntervalValue {
        IntervalValue {
            unit_code: PERCENT_UNIT.to_string(),
            valid_time: valid_time.to_string(),
            value: Some(value),
        }
    }

    fn set_hours(slots: &[i32; HOURS_PER_DAY]) -> Vec<usize> {
        slots
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(|(hour, _)| hour)
            .collect()
    }

    #[rstest]
    #[case("PT6H", 6)]
    #[case("PT1H", 1)]
    #[case("P1D", 24)]
    #[case("P1DT2H", 26)]
    #[case("PT90M", 2)]
    #[case("P1W", 168)]
    fn test_duration_covers_expected_hours(#[case] duration: &str, #[case] hours: usize) {
        let series = bucketize(&[interval(
            &format!("2024-03-01T00:00:00+00:00/{duration}"),
            40.0,
        )])
        .unwrap();

        let written: usize = series.values.values().map(|d| set_hours(d).len()).sum();
        assert_eq!(written, hours);
    }

    #[test]
    fn test_interval_starts_at_its_hour() {
        let series = bucketize(&[interval("2024-03-01T06:00:00+00:00/PT6H", 30.0)]).unwrap();

        let day = series.values.get("2024-03-01").unwrap();
        assert_eq!(set_hours(day), vec![6, 7, 8, 9, 10, 11]);
        assert!(day[6..12].iter().all(|v| *v == 30));
        assert_eq!(series.values.len(), 1);
    }

    #[test]
    fn test_interval_rolls_over_to_next_day() {
        let series = bucketize(&[interval("2024-03-01T22:00:00+00:00/PT4H", 70.0)]).unwrap();

        assert_eq!(set_hours(&series.values["2024-03-01"]), vec![22, 23]);
        assert_eq!(set_hours(&series.values["2024-03-02"]), vec![0, 1]);
    }

    #[test]
    fn test_day_key_uses_timestamp_offset() {
        // 23:00 at -06:00 is already the next day in UTC
        let series = bucketize(&[interval("2024-03-01T23:00:00-06:00/PT2H", 10.0)]).unwrap();

        assert_eq!(set_hours(&series.values["2024-03-01"]), vec![23]);
        assert_eq!(set_hours(&series.values["2024-03-02"]), vec![0]);
    }

    #[rstest]
    #[case("2024-03-01T06:00:00+00:00/PT0H")]
    #[case("2024-03-01T06:00:00+00:00/P")]
    #[case("2024-03-01T06:00:00+00:00/PT")]
    fn test_zero_length_writes_nothing(#[case] valid_time: &str) {
        let series = bucketize(&[interval(valid_time, 90.0)]).unwrap();
        assert!(series.values.is_empty());
    }

    #[test]
    fn test_later_interval_overwrites_earlier() {
        let series = bucketize(&[
            interval("2024-03-01T00:00:00+00:00/PT3H", 20.0),
            interval("2024-03-01T02:00:00+00:00/PT2H", 60.0),
        ])
        .unwrap();

        let day = &series.values["2024-03-01"];
        assert_eq!(&day[0..4], &[20, 20, 60, 60]);
    }

    #[test]
    fn test_bucketize_is_idempotent() {
        let input = vec![
            interval("2024-03-01T18:00:00-05:00/PT7H", 15.0),
            interval("2024-03-02T01:00:00-05:00/PT5H", 35.0),
        ];

        assert_eq!(bucketize(&input).unwrap(), bucketize(&input).unwrap());
    }

    #[test]
    fn test_null_value_writes_zero() {
        let mut item = interval("2024-03-01T00:00:00+00:00/PT2H", 0.0);
        item.value = None;

        let series = bucketize(&[item]).unwrap();
        assert_eq!(series.values["2024-03-01"], [0; HOURS_PER_DAY]);
    }

    #[test]
    fn test_unit_code_from_first_value_or_default() {
        let mut item = interval("2024-03-01T00:00:00+00:00/PT1H", 5.0);
        item.unit_code = "wmoUnit:mm".to_string();
        assert_eq!(bucketize(&[item]).unwrap().unit_code, "wmoUnit:mm");

        assert_eq!(bucketize(&[]).unwrap().unit_code, PERCENT_UNIT);
    }

    #[rstest]
    #[case("2024-03-01T00:00:00+00:00")]
    #[case("yesterday/PT1H")]
    #[case("2024-03-01T00:00:00+00:00/6H")]
    #[case("2024-03-01T00:00:00+00:00/P1M")]
    #[case("2024-03-01T00:00:00+00:00/PT6")]
    #[case("2024-03-01T00:00:00+00:00/PTH")]
    fn test_unparseable_interval_is_an_error(#[case] valid_time: &str) {
        let err = bucketize(&[interval(valid_time, 1.0)]).unwrap_err();
        assert!(matches!(err, WxError::IntervalParse { .. }), "{err}");
    }
}
