//! Clocks and Unix timestamps for token issuance and expiry
//!
//! Token timestamps (`iat`, `exp`) are Unix seconds and therefore independent
//! of any time zone. Every reading of "now" goes through a [`Clock`], so tests
//! can pin time with a [`TestClock`] instead of sleeping.
//!
//! A clock reports whole seconds through [`Clock::now()`] and the precise
//! instant through [`Clock::timestamp()`]. Expiry checks use the precise
//! instant: a token whose `exp` is the current second has expired as soon as
//! any fraction of that second has passed.

#![warn(
    missing_docs,
    unused_import_braces,
    unused_imports,
    unused_qualifications
)]
#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_must_use
)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::{
    fmt,
    time::{Duration, SystemTime},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unix time
///
/// The number of seconds elapsed since 1970/01/01 at 00:00:00 UTC.
///
/// The value is signed: a hand-built token may carry any integer in its
/// `exp` claim, and instants before the epoch are representable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct UnixTime(pub i64);

impl UnixTime {
    /// The Unix epoch
    pub const EPOCH: UnixTime = UnixTime(0);

    /// Offsets this time by `secs` seconds, saturating at the bounds of `i64`
    #[inline]
    #[must_use]
    pub const fn add_secs(self, secs: i64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Offsets this time by `minutes` minutes, saturating at the bounds of `i64`
    #[inline]
    #[must_use]
    pub const fn add_minutes(self, minutes: i64) -> Self {
        self.add_secs(minutes.saturating_mul(60))
    }

    /// The number of seconds since the epoch
    #[inline]
    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0
    }
}

impl From<SystemTime> for UnixTime {
    #[inline]
    fn from(t: SystemTime) -> Self {
        Timestamp::from(t).secs()
    }
}

impl From<i64> for UnixTime {
    #[inline]
    fn from(secs: i64) -> Self {
        Self(secs)
    }
}

impl fmt::Display for UnixTime {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl Serialize for UnixTime {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de> Deserialize<'de> for UnixTime {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = i64::deserialize(deserializer)?;
        Ok(Self(s))
    }
}

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// An instant with sub-second precision
///
/// Whole seconds are floored, so an instant before the epoch carries a
/// negative `secs` and a non-negative fraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Timestamp {
    secs: UnixTime,
    nanos: u32,
}

impl Timestamp {
    /// An instant `nanos` nanoseconds past `secs`
    ///
    /// Nanoseconds beyond a whole second carry into `secs`.
    #[must_use]
    pub const fn new(secs: UnixTime, nanos: u32) -> Self {
        Self {
            secs: secs.add_secs((nanos / NANOS_PER_SEC) as i64),
            nanos: nanos % NANOS_PER_SEC,
        }
    }

    /// The whole seconds of this instant
    #[inline]
    #[must_use]
    pub const fn secs(self) -> UnixTime {
        self.secs
    }

    /// The fraction of a second past [`secs()`][Self::secs()]
    #[inline]
    #[must_use]
    pub const fn subsec_nanos(self) -> u32 {
        self.nanos
    }

    /// Whether this instant lies strictly after the start of `time`
    #[inline]
    #[must_use]
    pub const fn is_after(self, time: UnixTime) -> bool {
        self.secs.0 > time.0 || (self.secs.0 == time.0 && self.nanos > 0)
    }

    /// Moves this instant forward by `d`, saturating at the bounds of `i64`
    #[must_use]
    pub fn add_duration(self, d: Duration) -> Self {
        let secs = i64::try_from(d.as_secs()).unwrap_or(i64::MAX);
        let nanos = self.nanos + d.subsec_nanos();
        Self::new(self.secs.add_secs(secs), nanos)
    }
}

impl From<UnixTime> for Timestamp {
    #[inline]
    fn from(secs: UnixTime) -> Self {
        Self { secs, nanos: 0 }
    }
}

impl From<SystemTime> for Timestamp {
    fn from(t: SystemTime) -> Self {
        match t.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(after) => Self {
                secs: UnixTime(i64::try_from(after.as_secs()).unwrap_or(i64::MAX)),
                nanos: after.subsec_nanos(),
            },
            Err(before) => {
                let before = before.duration();
                let whole = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
                match before.subsec_nanos() {
                    0 => Self {
                        secs: UnixTime(-whole),
                        nanos: 0,
                    },
                    frac => Self {
                        secs: UnixTime((-whole).saturating_sub(1)),
                        nanos: NANOS_PER_SEC - frac,
                    },
                }
            }
        }
    }
}

/// Represents a clock, which can tell the current time
pub trait Clock {
    /// Gets the current time according to this clock, in whole seconds
    fn now(&self) -> UnixTime;

    /// Gets the current time according to this clock, with sub-second
    /// precision
    ///
    /// Clocks that only know whole seconds report no fraction.
    fn timestamp(&self) -> Timestamp {
        Timestamp::from(self.now())
    }
}

impl<C: Clock + ?Sized> Clock for &'_ C {
    #[inline]
    fn now(&self) -> UnixTime {
        C::now(&**self)
    }

    #[inline]
    fn timestamp(&self) -> Timestamp {
        C::timestamp(&**self)
    }
}

/// The system clock as provided by `std::time::SystemTime`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct System;

impl Clock for System {
    #[inline]
    fn now(&self) -> UnixTime {
        self.timestamp().secs()
    }

    #[inline]
    fn timestamp(&self) -> Timestamp {
        Timestamp::from(SystemTime::now())
    }
}

/// A test clock which maintains the current time as internal state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TestClock(Timestamp);

impl Clock for TestClock {
    #[inline]
    fn now(&self) -> UnixTime {
        self.0.secs()
    }

    #[inline]
    fn timestamp(&self) -> Timestamp {
        self.0
    }
}

impl TestClock {
    /// Creates a new test clock at the start of the specified second
    #[inline]
    pub const fn new(time: UnixTime) -> Self {
        Self(Timestamp { secs: time, nanos: 0 })
    }

    /// Updates the clock's current time to the start of `val`
    pub fn set(&mut self, val: UnixTime) {
        self.0 = Timestamp::from(val);
    }

    /// Moves the clock forward by `inc` whole seconds
    pub fn inc(&mut self, inc: i64) {
        self.0.secs = self.0.secs.add_secs(inc);
    }

    /// Moves the clock backward by `dec` whole seconds
    pub fn dec(&mut self, dec: i64) {
        self.0.secs = self.0.secs.add_secs(dec.saturating_neg());
    }

    /// Moves the clock forward by `d`, which may be a fraction of a second
    pub fn advance(&mut self, d: Duration) {
        self.0 = self.0.add_duration(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_are_sixty_seconds() {
        assert_eq!(UnixTime(1_000).add_minutes(60), UnixTime(4_600));
        assert_eq!(UnixTime(1_000).add_minutes(0), UnixTime(1_000));
        assert_eq!(UnixTime(1_000).add_minutes(-1), UnixTime(940));
    }

    #[test]
    fn offsets_saturate() {
        assert_eq!(UnixTime(i64::MAX).add_secs(1), UnixTime(i64::MAX));
        assert_eq!(UnixTime(0).add_minutes(i64::MIN), UnixTime(i64::MIN));
    }

    #[test]
    fn system_time_before_epoch_is_negative() {
        let t = SystemTime::UNIX_EPOCH - Duration::from_secs(90);
        assert_eq!(UnixTime::from(t), UnixTime(-90));
    }

    #[test]
    fn fractions_before_epoch_floor_the_seconds() {
        let t = SystemTime::UNIX_EPOCH - Duration::from_millis(1_500);
        let ts = Timestamp::from(t);
        assert_eq!(ts.secs(), UnixTime(-2));
        assert_eq!(ts.subsec_nanos(), 500_000_000);
    }

    #[test]
    fn timestamps_carry_whole_seconds() {
        let ts = Timestamp::new(UnixTime(10), 2_500_000_000);
        assert_eq!(ts.secs(), UnixTime(12));
        assert_eq!(ts.subsec_nanos(), 500_000_000);

        let ts = ts.add_duration(Duration::from_millis(700));
        assert_eq!(ts.secs(), UnixTime(13));
        assert_eq!(ts.subsec_nanos(), 200_000_000);
    }

    #[test]
    fn any_fraction_is_after_its_second() {
        let exp = UnixTime(100);
        assert!(!Timestamp::from(exp).is_after(exp));
        assert!(Timestamp::new(exp, 1).is_after(exp));
        assert!(Timestamp::from(UnixTime(101)).is_after(exp));
        assert!(!Timestamp::new(UnixTime(99), 999_999_999).is_after(exp));
    }

    #[test]
    fn system_clock_agrees_with_itself() {
        let ts = System.timestamp();
        assert!(System.now() >= ts.secs());
        assert!(ts.subsec_nanos() < NANOS_PER_SEC);
    }

    #[test]
    fn system_clock_is_past_2020() {
        assert!(System.now() > UnixTime(1_577_836_800));
    }

    #[test]
    fn test_clock_moves_only_when_told() {
        let mut clock = TestClock::new(UnixTime(100));
        assert_eq!(clock.now(), UnixTime(100));

        clock.inc(5);
        assert_eq!(clock.now(), UnixTime(105));

        clock.dec(10);
        assert_eq!(clock.now(), UnixTime(95));

        clock.set(UnixTime::EPOCH);
        assert_eq!((&clock).now(), UnixTime(0));

        clock.advance(Duration::from_nanos(1));
        assert_eq!(clock.now(), UnixTime(0));
        assert_eq!((&clock).timestamp().subsec_nanos(), 1);

        clock.inc(1);
        assert_eq!(clock.timestamp(), Timestamp::new(UnixTime(1), 1));
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&UnixTime(1_700_000_000)).unwrap();
        assert_eq!(json, "1700000000");

        let back: UnixTime = serde_json::from_str("-5").unwrap();
        assert_eq!(back, UnixTime(-5));
    }
}
