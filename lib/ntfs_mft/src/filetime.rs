use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::TimestampError;

const TICKS_PER_SECOND : u64 = 10_000_000;
const NANOS_PER_TICK : u64 = 100;

/// Windows FILETIME as stored on disk: 100ns increments since 1601/01/01 00:00:00 UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFiletime(pub u64);

impl RawFiletime {
    pub fn from_le_bytes(bytes : [u8; 8]) -> Self {
        RawFiletime(u64::from_le_bytes(bytes))
    }

    pub fn ticks(&self) -> u64 {
        self.0
    }

    pub fn parse(&self) -> Result<NaiveDateTime, TimestampError> {
        let unparseable = TimestampError::Unparseable { ticks: self.0 };

        // FILETIME is signed on the Windows side, anything with the top bit set isn't a real date
        if self.0 > i64::MAX as u64 {
            return Err(unparseable);
        }

        let epoch = NaiveDate::from_ymd_opt(1601, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or(unparseable)?;

        // Split so the nanosecond part can't overflow
        let seconds = Duration::seconds((self.0 / TICKS_PER_SECOND) as i64);
        let nanos = Duration::nanoseconds(((self.0 % TICKS_PER_SECOND) * NANOS_PER_TICK) as i64);

        epoch.checked_add_signed(seconds)
            .and_then(|dt| dt.checked_add_signed(nanos))
            .ok_or(unparseable)
    }
}
