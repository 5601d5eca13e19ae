use chrono::{DateTime, Offset, TimeZone};
use chrono_tz::Tz;
use time::{OffsetDateTime, UtcOffset};
use tracing::warn;

/// Offset of `timezone` at the instant `at`, daylight saving included.
pub fn local_offset(timezone: Tz, at: OffsetDateTime) -> Option<UtcOffset> {
  let instant = DateTime::from_timestamp(at.unix_timestamp(), 0)?;
  let seconds = timezone
    .offset_from_utc_datetime(&instant.naive_utc())
    .fix()
    .local_minus_utc();

  UtcOffset::from_whole_seconds(seconds).ok()
}

pub fn to_local(timezone: Tz, at: OffsetDateTime) -> OffsetDateTime {
  match local_offset(timezone, at) {
    Some(offset) => at.to_offset(offset),
    None => {
      warn!("Unable to resolve offset of {} at {}, using UTC", timezone, at);
      at.to_offset(UtcOffset::UTC)
    }
  }
}
