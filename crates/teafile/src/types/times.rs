//! Time section contents and tick conversion.
//!
//! A timestamp field stores a tick count `t`. The instant it denotes is
//! `reference_date(epoch) + t / ticks_per_day` days, where the reference date
//! is `epoch` days after 0001-01-01 (proleptic Gregorian). The default epoch
//! 719162 is therefore 1970-01-01 and the default 86 400 000 ticks per day is
//! millisecond resolution.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::error::{Result, TeaError};

/// Default epoch: days from 0001-01-01 to 1970-01-01.
pub const DEFAULT_EPOCH: i64 = 719_162;

/// Default resolution: milliseconds.
pub const DEFAULT_TICKS_PER_DAY: i64 = 86_400_000;

const NANOS_PER_DAY: i128 = 86_400 * 1_000_000_000;

/// Time section: epoch, tick resolution and the item offsets holding ticks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Times {
    /// Day count of the reference date, counted from 0001-01-01.
    pub epoch: i64,
    /// Number of ticks in one day.
    pub ticks_per_day: i64,
    /// Byte offsets within the item record of fields that hold tick counts.
    /// The first entry is the event time of the item.
    pub offsets: Vec<u32>,
}

impl Default for Times {
    fn default() -> Self {
        Self {
            epoch: DEFAULT_EPOCH,
            ticks_per_day: DEFAULT_TICKS_PER_DAY,
            offsets: Vec::new(),
        }
    }
}

impl Times {
    /// Create a time section with the given epoch and resolution.
    #[must_use]
    pub fn new(epoch: i64, ticks_per_day: i64) -> Self {
        Self {
            epoch,
            ticks_per_day,
            offsets: Vec::new(),
        }
    }

    /// Midnight UTC of the reference date.
    pub fn reference_date(&self) -> Result<DateTime<Utc>> {
        let days = self
            .epoch
            .checked_add(1)
            .and_then(|days| i32::try_from(days).ok())
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(|| TeaError::format(format!("epoch {} is out of range", self.epoch)))?;
        Ok(days.and_time(NaiveTime::MIN).and_utc())
    }

    /// Convert a tick count into a calendar instant.
    pub fn to_instant(&self, ticks: i64) -> Result<DateTime<Utc>> {
        let ticks_per_day = self.checked_ticks_per_day()?;
        let days = ticks.div_euclid(ticks_per_day);
        let remainder = ticks.rem_euclid(ticks_per_day);
        let nanos = i128::from(remainder) * NANOS_PER_DAY / i128::from(ticks_per_day);

        let out_of_range = || TeaError::format(format!("tick count {ticks} is out of range"));
        let reference = self.reference_date()?;
        let whole_days = TimeDelta::try_days(days).ok_or_else(out_of_range)?;
        let fraction = TimeDelta::nanoseconds(i64::try_from(nanos).map_err(|_| out_of_range())?);

        reference
            .checked_add_signed(whole_days)
            .and_then(|instant| instant.checked_add_signed(fraction))
            .ok_or_else(out_of_range)
    }

    /// Convert a calendar instant into a tick count.
    ///
    /// Sub-tick precision is truncated towards the earlier tick.
    pub fn to_ticks(&self, instant: DateTime<Utc>) -> Result<i64> {
        let ticks_per_day = self.checked_ticks_per_day()?;
        let delta = instant.signed_duration_since(self.reference_date()?);

        let days = delta.num_days();
        let remainder = delta - TimeDelta::days(days);
        let remainder_nanos = remainder
            .num_nanoseconds()
            .ok_or_else(|| TeaError::format("sub-day remainder overflows nanoseconds"))?;

        let does_not_fit =
            || TeaError::format(format!("instant {instant} does not fit in a tick count"));
        let total_nanos = i128::from(days) * NANOS_PER_DAY + i128::from(remainder_nanos);
        let ticks = total_nanos
            .checked_mul(i128::from(ticks_per_day))
            .ok_or_else(does_not_fit)?
            .div_euclid(NANOS_PER_DAY);
        i64::try_from(ticks).map_err(|_| does_not_fit())
    }

    fn checked_ticks_per_day(&self) -> Result<i64> {
        if self.ticks_per_day <= 0 {
            return Err(TeaError::format(format!(
                "ticks per day must be positive, got {}",
                self.ticks_per_day
            )));
        }
        Ok(self.ticks_per_day)
    }
}
