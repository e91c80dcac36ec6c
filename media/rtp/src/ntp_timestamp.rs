use std::time::SystemTime;
use time::{Date, Month, OffsetDateTime};

const NTP_EPOCH: OffsetDateTime = const {
    let date = match Date::from_calendar_date(1900, Month::January, 1) {
        Ok(date) => date,
        Err(_e) => panic!("invalid date"),
    };

    OffsetDateTime::new_utc(date, time::Time::MIDNIGHT)
};

/// 64 bit NTP timestamp, 32.32 fixed point seconds since 01.01.1900
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NtpTimestamp(pub u64);

impl NtpTimestamp {
    pub const ZERO: Self = Self(0);

    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    pub fn from_system_time(system_time: SystemTime) -> Self {
        let since_epoch = OffsetDateTime::from(system_time) - NTP_EPOCH;

        let seconds = since_epoch.whole_seconds() as u64;
        let subseconds =
            (since_epoch.subsec_nanoseconds() as f64 / 1_000_000_000.) * u32::MAX as f64;

        Self((seconds << 32) | subseconds as u64)
    }

    pub fn seconds(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Returns the middle 32 bits, as used by the LSR field of reception reports
    pub fn to_fixed_u32(self) -> u32 {
        ((self.0 >> 16) & u64::from(u32::MAX)) as u32
    }
}
