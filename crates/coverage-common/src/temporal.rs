//! Regular calendar-interval time axes.
//!
//! A [`TemporalReference`] anchors integer indexes of one array dimension to
//! absolute instants: index `i` maps to `t0 + dt * i`, where `dt` is an
//! ISO-8601 [`Period`]. Periods made of months or years have no fixed length,
//! so the reverse mapping is an estimate followed by a stepwise correction.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Duration, Months, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::error::{CoverageError, CoverageResult};

/// Parse an instant from RFC 3339, a naive date-time (UTC assumed) or a bare date.
pub fn parse_instant(s: &str) -> CoverageResult<DateTime<Utc>> {
    let s = s.trim();

    // Full datetime with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Without offset (assume UTC), optional fractional seconds
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    // Date only
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(CoverageError::InvalidInstant(s.to_string()))
}

/// Format an instant the way it is reported to clients.
pub fn format_instant(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// An ISO-8601 period (`PnYnMnWnDTnHnMnS`).
///
/// Seconds are held with millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub millis: i64,
}

impl Period {
    pub fn days(days: i64) -> Self {
        Self {
            days,
            ..Default::default()
        }
    }

    pub fn months(months: i64) -> Self {
        Self {
            months,
            ..Default::default()
        }
    }

    pub fn years(years: i64) -> Self {
        Self {
            years,
            ..Default::default()
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Period::default()
    }

    /// Parse the textual form. Designators are case-insensitive.
    pub fn parse(s: &str) -> CoverageResult<Period> {
        let invalid = || CoverageError::InvalidPeriod(s.to_string());

        let upper = s.trim().to_ascii_uppercase();
        let body = upper.strip_prefix('P').ok_or_else(invalid)?;
        if body.is_empty() {
            return Err(invalid());
        }

        let (date_part, time_part) = match body.split_once('T') {
            Some((d, t)) => {
                if t.is_empty() {
                    return Err(invalid());
                }
                (d, Some(t))
            }
            None => (body, None),
        };

        let mut period = Period::default();

        for (number, designator) in designated_numbers(date_part).ok_or_else(invalid)? {
            let value = parse_whole(number).ok_or_else(invalid)?;
            match designator {
                'Y' => period.years = value,
                'M' => period.months = value,
                'W' => period.weeks = value,
                'D' => period.days = value,
                _ => return Err(invalid()),
            }
        }

        if let Some(time_part) = time_part {
            for (number, designator) in designated_numbers(time_part).ok_or_else(invalid)? {
                match designator {
                    'H' => period.hours = parse_whole(number).ok_or_else(invalid)?,
                    'M' => period.minutes = parse_whole(number).ok_or_else(invalid)?,
                    'S' => period.millis = parse_seconds_as_millis(number).ok_or_else(invalid)?,
                    _ => return Err(invalid()),
                }
            }
        }

        Ok(period)
    }

    /// Multiply every field by `n`, or `None` if any product overflows.
    pub fn checked_mul(&self, n: i64) -> Option<Period> {
        Some(Period {
            years: self.years.checked_mul(n)?,
            months: self.months.checked_mul(n)?,
            weeks: self.weeks.checked_mul(n)?,
            days: self.days.checked_mul(n)?,
            hours: self.hours.checked_mul(n)?,
            minutes: self.minutes.checked_mul(n)?,
            millis: self.millis.checked_mul(n)?,
        })
    }

    /// Add this period to an instant using calendar arithmetic.
    ///
    /// Years, then months (day-of-month clamped), then weeks and days, then
    /// the time fields. Returns `None` outside the representable range.
    pub fn add_to(&self, dt: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let dt = add_months(dt, self.years.checked_mul(12)?)?;
        let dt = add_months(dt, self.months)?;

        let days = self.weeks.checked_mul(7)?.checked_add(self.days)?;
        let dt = if days >= 0 {
            dt.checked_add_days(Days::new(days.unsigned_abs()))?
        } else {
            dt.checked_sub_days(Days::new(days.unsigned_abs()))?
        };

        let millis = self
            .hours
            .checked_mul(3_600_000)?
            .checked_add(self.minutes.checked_mul(60_000)?)?
            .checked_add(self.millis)?;
        dt.checked_add_signed(Duration::try_milliseconds(millis)?)
    }
}

fn add_months(dt: DateTime<Utc>, months: i64) -> Option<DateTime<Utc>> {
    let magnitude = u32::try_from(months.unsigned_abs()).ok()?;
    if months >= 0 {
        dt.checked_add_months(Months::new(magnitude))
    } else {
        dt.checked_sub_months(Months::new(magnitude))
    }
}

/// Split `3Y2M` into `[("3", 'Y'), ("2", 'M')]`.
fn designated_numbers(s: &str) -> Option<Vec<(&str, char)>> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if c.is_ascii_alphabetic() {
            if i == start {
                return None;
            }
            out.push((&s[start..i], c));
            start = i + c.len_utf8();
        }
    }
    if start != s.len() {
        return None;
    }
    Some(out)
}

fn parse_whole(number: &str) -> Option<i64> {
    if !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

fn parse_seconds_as_millis(number: &str) -> Option<i64> {
    let number = number.replace(',', ".");
    let (whole, fraction) = match number.split_once('.') {
        Some((w, f)) => (w, f),
        None => (number.as_str(), ""),
    };
    let seconds = parse_whole(whole)?;
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut frac_millis = 0i64;
    for (i, b) in fraction.bytes().take(3).enumerate() {
        frac_millis += i64::from(b - b'0') * 10i64.pow(2 - i as u32);
    }
    seconds.checked_mul(1000)?.checked_add(frac_millis)
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }
        f.write_str("P")?;
        for (value, designator) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if value != 0 {
                write!(f, "{}{}", value, designator)?;
            }
        }
        if self.hours != 0 || self.minutes != 0 || self.millis != 0 {
            f.write_str("T")?;
            if self.hours != 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes != 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.millis != 0 {
                if self.millis % 1000 == 0 {
                    write!(f, "{}S", self.millis / 1000)?;
                } else {
                    write!(f, "{}.{:03}S", self.millis / 1000, self.millis % 1000)?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Period {
    type Err = CoverageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::parse(s)
    }
}

impl TryFrom<String> for Period {
    type Error = CoverageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Period::parse(&s)
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}

/// Regular time axis of an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalReference {
    /// Name of the temporal dimension.
    pub tdim: String,
    /// Instant at index 0.
    pub t0: DateTime<Utc>,
    /// Distance between two consecutive indexes.
    pub dt: Period,
}

impl TemporalReference {
    pub fn new(tdim: impl Into<String>, t0: DateTime<Utc>, dt: Period) -> Self {
        Self {
            tdim: tdim.into(),
            t0,
            dt,
        }
    }

    /// Build from the textual instant and period forms.
    pub fn parse(tdim: &str, t0: &str, dt: &str) -> CoverageResult<Self> {
        Ok(Self::new(tdim, parse_instant(t0)?, Period::parse(dt)?))
    }

    /// `t0 + dt * index` in calendar arithmetic.
    pub fn instant_at_index(&self, index: i64) -> CoverageResult<DateTime<Utc>> {
        self.dt
            .checked_mul(index)
            .and_then(|offset| offset.add_to(self.t0))
            .ok_or(CoverageError::TemporalOverflow { index })
    }

    /// Largest index whose instant is not after `t`.
    pub fn index_at_instant(&self, t: &DateTime<Utc>) -> CoverageResult<i64> {
        let step = self
            .dt
            .add_to(self.t0)
            .ok_or(CoverageError::TemporalOverflow { index: 1 })?
            .signed_duration_since(self.t0)
            .num_milliseconds();
        if step == 0 {
            return Err(CoverageError::ZeroPeriod);
        }

        let dif = t.signed_duration_since(self.t0).num_milliseconds();
        let mut i = (dif as f64 / step as f64).round() as i64;

        let mut temp = self.instant_at_index(i)?;
        if temp > *t {
            while temp > *t {
                i -= 1;
                temp = self.instant_at_index(i)?;
            }
        } else if temp < *t {
            while temp < *t {
                i += 1;
                temp = self.instant_at_index(i)?;
            }
        }
        if self.instant_at_index(i)? > *t {
            i -= 1;
        }
        Ok(i)
    }

    /// Check an index against the true bounds of the temporal dimension.
    pub fn validate_index(&self, index: i64, dimension: &Dimension) -> CoverageResult<()> {
        let (min, max) = (dimension.true_min(), dimension.true_max());
        if index < min || index > max {
            return Err(CoverageError::TimeOutOfRange { index, min, max });
        }
        Ok(())
    }
}
