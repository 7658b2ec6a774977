use crate::calendar::{civil_from_days, days_from_civil};
use crate::{CivilDateTime, InvalidDateTime, UtcOffset};

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Seconds since 1970-01-01T00:00:00Z for a datetime expressed at `offset`.
/// Validation runs before any arithmetic; nothing is clamped.
pub fn to_unix_timestamp(
    datetime: CivilDateTime,
    offset: UtcOffset,
) -> Result<i64, InvalidDateTime> {
    datetime.validate()?;

    let days = days_from_civil(datetime.year, datetime.month, datetime.day)
        .ok_or(InvalidDateTime::Overflow)?;
    let time_of_day = i64::from(datetime.hour) * 3_600 + i64::from(datetime.minute) * 60;

    days.checked_mul(SECONDS_PER_DAY)
        .and_then(|seconds| seconds.checked_add(time_of_day))
        .and_then(|seconds| seconds.checked_sub(i64::from(offset.as_seconds())))
        .ok_or(InvalidDateTime::Overflow)
}

/// Millisecond variant of [`to_unix_timestamp`].
pub fn to_unix_timestamp_millis(
    datetime: CivilDateTime,
    offset: UtcOffset,
) -> Result<i64, InvalidDateTime> {
    to_unix_timestamp(datetime, offset)?
        .checked_mul(1_000)
        .ok_or(InvalidDateTime::Overflow)
}

/// The datetime at `offset` for a Unix timestamp. Seconds within the minute
/// are truncated toward negative infinity; the model carries no seconds.
pub fn from_unix_timestamp(
    timestamp: i64,
    offset: UtcOffset,
) -> Result<CivilDateTime, InvalidDateTime> {
    let local = timestamp
        .checked_add(i64::from(offset.as_seconds()))
        .ok_or(InvalidDateTime::Overflow)?;
    let days = local.div_euclid(SECONDS_PER_DAY);
    let seconds_of_day = local.rem_euclid(SECONDS_PER_DAY);

    let (year, month, day) = civil_from_days(days);
    Ok(CivilDateTime {
        year,
        month,
        day,
        hour: (seconds_of_day / 3_600) as u32,
        minute: (seconds_of_day % 3_600 / 60) as u32,
    })
}
