use std::fmt;

#[cfg(feature = "time")]
use time::{format_description::well_known::Rfc3339, macros::datetime, Duration, OffsetDateTime};
#[cfg(all(feature = "time", feature = "tracing"))]
use tracing::{instrument, Level};

#[cfg(feature = "time")]
use crate::error::Error;

/// The calendar time returned by [`Timetag::time`] for
/// [`Timetag::IMMEDIATELY`]: midnight on January 1 of year 1.
///
/// This is deliberately _not_ the timetag epoch (1900-01-01). A raw timetag
/// of `0` is a legitimate time, so the "unset" value has to be some other
/// instant; use [`is_unset`] to test for it.
#[cfg(feature = "time")]
#[cfg_attr(docsrs, doc(cfg(feature = "time")))]
pub const UNSET_TIME: OffsetDateTime = datetime!(0001-01-01 0:00 UTC);

/// Check whether a calendar time is the [`UNSET_TIME`] returned for an
/// [immediate][Timetag::IMMEDIATELY] timetag.
#[cfg(feature = "time")]
#[cfg_attr(docsrs, doc(cfg(feature = "time")))]
#[inline]
pub fn is_unset(time: OffsetDateTime) -> bool {
    time == UNSET_TIME
}

/// An OSC time tag: a 64-bit fixed-point timestamp, in the format used by
/// [NTP][rfc5905].
///
/// The high 32 bits count whole [seconds][Timetag::seconds] since
/// 1900-01-01 00:00:00 UTC, and the low 32 bits count
/// [fractions][Timetag::fractions] of a second, each worth `1e9 / 2^32`
/// nanoseconds (about 233 picoseconds).
///
/// The value `1` (63 zero bits followed by a one) is reserved: it means
/// [“immediately”][Timetag::IMMEDIATELY], and has no calendar meaning.
///
/// On the wire, a timetag is 8 big-endian bytes: seconds, then fraction.
///
/// [rfc5905]: https://datatracker.ietf.org/doc/html/rfc5905#section-6
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Debug)]
#[cfg_attr(feature = "binrw", derive(binrw::BinRead, binrw::BinWrite))]
#[cfg_attr(feature = "binrw", brw(big))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct Timetag(pub u64);

impl Timetag {
    /// The reserved timetag asking for a bundle to be executed as soon as it
    /// is received.
    #[doc(alias = "Immediately")]
    pub const IMMEDIATELY: Timetag = Timetag(1);

    /// Seconds between the timetag epoch (1900-01-01) and the Unix epoch
    /// (1970-01-01), as given by [RFC 868][rfc868].
    ///
    /// [rfc868]: https://datatracker.ietf.org/doc/html/rfc868
    pub const UNIX_EPOCH_OFFSET_SEC: u64 = 2_208_988_800;

    /// Nanoseconds per unit of the [fraction][Timetag::fractions] field.
    // 1e9 / 2^32 = 0.23283064365386962891
    pub const NS_PER_FRACTION: f64 = 1_000_000_000.0 / 4_294_967_296.0;

    /// Compose a [`Timetag`] from its seconds and fraction fields.
    #[inline]
    pub const fn new(seconds: u32, fraction: u32) -> Self {
        Self(((seconds as u64) << 32) | fraction as u64)
    }

    /// Wrap a raw 64-bit timetag value, as read from the wire.
    #[inline]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Access the bare [`u64`] timetag value.
    #[inline]
    pub const fn into_raw(self) -> u64 {
        self.0
    }

    /// The whole seconds elapsed since 1900-01-01 00:00:00 UTC (the high 32
    /// bits).
    #[inline]
    pub const fn seconds(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// The fractional part of the second (the low 32 bits), in units of
    /// [`NS_PER_FRACTION`][Timetag::NS_PER_FRACTION] nanoseconds.
    #[inline]
    pub const fn fractions(self) -> u32 {
        self.0 as u32
    }

    /// Check if this is the reserved [`IMMEDIATELY`][Timetag::IMMEDIATELY]
    /// timetag.
    #[inline]
    pub const fn is_immediate(self) -> bool {
        self.0 == Self::IMMEDIATELY.0
    }

    /// Convert a [`Timetag`] to a UTC calendar time.
    ///
    /// The fraction is converted to nanoseconds by a floating-point multiply,
    /// truncated toward zero.
    ///
    /// [`IMMEDIATELY`][Timetag::IMMEDIATELY] has no calendar time, and is
    /// returned as [`UNSET_TIME`] (year 1, not 1900). Detect it with
    /// [`is_unset`], or use [`to_time`][Timetag::to_time] to get an [`Option`]
    /// instead.
    #[cfg(feature = "time")]
    #[cfg_attr(docsrs, doc(cfg(feature = "time")))]
    pub fn time(self) -> OffsetDateTime {
        self.to_time().unwrap_or(UNSET_TIME)
    }

    /// Convert a [`Timetag`] to a UTC calendar time, or `None` if it is
    /// [`IMMEDIATELY`][Timetag::IMMEDIATELY].
    #[cfg(feature = "time")]
    #[cfg_attr(docsrs, doc(cfg(feature = "time")))]
    pub fn to_time(self) -> Option<OffsetDateTime> {
        if self.is_immediate() {
            return None;
        }

        let seconds = i64::from(self.seconds()) - Self::UNIX_EPOCH_OFFSET_SEC as i64;
        let nanoseconds = (f64::from(self.fractions()) * Self::NS_PER_FRACTION) as i32;

        Some(OffsetDateTime::UNIX_EPOCH + Duration::new(seconds, nanoseconds))
    }

    /// Convert a calendar time to a [`Timetag`].
    ///
    /// Sub-second precision is kept to the nanosecond: the fraction is rounded
    /// up, so that [`time`][Timetag::time] gives back the same instant.
    ///
    /// Fails with [`Error::OutOfRange`] for times before 1900-01-01 00:00:00
    /// UTC, or after 2036-02-07 06:28:15 UTC (the end of NTP era 0).
    #[cfg(feature = "time")]
    #[cfg_attr(docsrs, doc(cfg(feature = "time")))]
    #[cfg_attr(feature = "tracing", instrument(level = Level::TRACE, err(level = Level::WARN)))]
    pub fn from_time(time: OffsetDateTime) -> Result<Self, Error> {
        let seconds = time.unix_timestamp() + Self::UNIX_EPOCH_OFFSET_SEC as i64;
        let seconds = u32::try_from(seconds).map_err(|_| Error::OutOfRange(time))?;

        let fraction = (u64::from(time.nanosecond()) << 32).div_ceil(1_000_000_000);

        Ok(Self::new(seconds, fraction as u32))
    }

    /// Use [`OffsetDateTime::now_utc`] to produce a [`Timetag`] for the
    /// current system time.
    #[cfg(feature = "time")]
    #[cfg_attr(docsrs, doc(cfg(feature = "time")))]
    pub fn now() -> Result<Self, Error> {
        Self::from_time(OffsetDateTime::now_utc())
    }

    #[cfg(feature = "time")]
    fn fmt_time(self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.time().format(&Rfc3339).map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }

    #[cfg(not(feature = "time"))]
    fn fmt_time(self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}.{:08x}", self.seconds(), self.fractions())
    }
}

impl Default for Timetag {
    fn default() -> Self {
        Self::IMMEDIATELY
    }
}

impl fmt::Display for Timetag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_immediate() {
            f.write_str("immediately")
        } else {
            self.fmt_time(f)
        }
    }
}

impl From<u64> for Timetag {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Timetag> for u64 {
    fn from(value: Timetag) -> Self {
        value.into_raw()
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::Timetag;

    proptest! {
        #[test]
        fn fields(v in any::<u64>()) {
            let tt = Timetag(v);

            prop_assert_eq!(u64::from(tt.seconds()), v >> 32);
            prop_assert_eq!(u64::from(tt.fractions()), v & 0xFFFF_FFFF);
            prop_assert_eq!(Timetag::new(tt.seconds(), tt.fractions()), tt);
        }
    }

    #[test]
    fn immediately() {
        assert!(Timetag::IMMEDIATELY.is_immediate());
        assert!(Timetag::from_raw(1).is_immediate());
        assert!(!Timetag(0).is_immediate());
        assert!(!Timetag::new(1, 0).is_immediate());
        assert_eq!(Timetag::default(), Timetag::IMMEDIATELY);
    }

    #[test]
    fn ordering() {
        assert!(Timetag::new(1, 0) > Timetag::new(0, u32::MAX));
        assert!(Timetag::new(7, 2) < Timetag::new(7, 3));
    }

    #[cfg(feature = "time")]
    mod calendar {
        use proptest::prelude::*;
        use time::{macros::datetime, Duration, OffsetDateTime};

        use crate::{is_unset, Error, Timetag, UNSET_TIME};

        #[test]
        fn timetag_to_time() {
            // 0 * 0.233ns = 0ns
            assert_eq!(Timetag(0).time(), datetime!(1900-01-01 0:00 UTC));
            // 2 * 0.233ns ~= 0ns
            assert_eq!(Timetag(2).time(), datetime!(1900-01-01 0:00 UTC));
            // 5 * 0.233ns ~= 1ns (truncated, not rounded)
            assert_eq!(
                Timetag(5).time(),
                datetime!(1900-01-01 0:00:00.000000001 UTC)
            );
            assert_eq!(Timetag(1 << 32).time(), datetime!(1900-01-01 0:00:01 UTC));
        }

        #[test]
        fn immediately_is_unset() {
            let time = Timetag::IMMEDIATELY.time();

            assert_eq!(time, datetime!(0001-01-01 0:00 UTC));
            assert_eq!(time, UNSET_TIME);
            assert!(is_unset(time));
            assert!(!is_unset(Timetag(0).time()));
            assert_ne!(time, Timetag(0).time());
            assert_eq!(Timetag::IMMEDIATELY.to_time(), None);
        }

        #[test]
        fn unix_epoch() {
            let tt = Timetag::new(Timetag::UNIX_EPOCH_OFFSET_SEC as u32, 0);

            assert_eq!(tt.time(), OffsetDateTime::UNIX_EPOCH);
            assert_eq!(Timetag::from_time(OffsetDateTime::UNIX_EPOCH), Ok(tt));
        }

        #[test]
        fn half_second() {
            let tt = Timetag::new(Timetag::UNIX_EPOCH_OFFSET_SEC as u32, 0x8000_0000);

            assert_eq!(tt.time(), datetime!(1970-01-01 0:00:00.5 UTC));
        }

        #[test]
        fn from_time_with_offset() {
            let utc = datetime!(2000-01-01 0:00 UTC);
            let paris = datetime!(2000-01-01 1:00 +1);

            assert_eq!(Timetag::from_time(utc), Timetag::from_time(paris));
            assert_eq!(Timetag::from_time(utc).map(Timetag::seconds), Ok(3_155_673_600));
        }

        #[test]
        fn era_bounds() {
            let first = datetime!(1900-01-01 0:00 UTC);
            let last = datetime!(2036-02-07 6:28:15 UTC);

            assert_eq!(Timetag::from_time(first), Ok(Timetag(0)));
            assert_eq!(
                Timetag::from_time(last).map(Timetag::seconds),
                Ok(u32::MAX)
            );

            let before = datetime!(1899-12-31 23:59:59.999999999 UTC);
            let after = datetime!(2036-02-07 6:28:16 UTC);

            assert_eq!(Timetag::from_time(before), Err(Error::OutOfRange(before)));
            assert_eq!(Timetag::from_time(after), Err(Error::OutOfRange(after)));
        }

        #[test]
        fn now() {
            let tt = Timetag::now().expect("clock set beyond 2036");

            assert!(!tt.is_immediate());
            assert!(tt.time() > datetime!(2020-01-01 0:00 UTC));
        }

        #[test]
        fn display() {
            assert_eq!(Timetag::IMMEDIATELY.to_string(), "immediately");
            assert_eq!(Timetag(1 << 32).to_string(), "1900-01-01T00:00:01Z");
        }

        proptest! {
            #[test]
            fn time_round_trip(seconds in any::<u32>(), ns in 0..1_000_000_000i32) {
                let unix = i64::from(seconds) - Timetag::UNIX_EPOCH_OFFSET_SEC as i64;
                let time = OffsetDateTime::UNIX_EPOCH + Duration::new(unix, ns);

                let tt = Timetag::from_time(time).expect("time within timetag era");

                prop_assert_eq!(tt.seconds(), seconds);
                prop_assert!(!tt.is_immediate());
                prop_assert_eq!(tt.time(), time);
            }
        }
    }

    #[cfg(feature = "binrw")]
    #[test]
    fn wire_layout() {
        use std::io::Cursor;

        use binrw::{BinRead, BinWrite};

        let bytes: [u8; 8] = [0x83, 0xaa, 0x7e, 0x80, 0x80, 0, 0, 0];
        let tt = Timetag::read(&mut Cursor::new(&bytes)).expect("8 bytes");

        assert_eq!(tt, Timetag::new(0x83aa_7e80, 0x8000_0000));

        let mut written = Cursor::new(Vec::new());
        tt.write(&mut written).expect("write to Vec");
        assert_eq!(written.into_inner(), bytes);

        let immediately = Timetag::read(&mut Cursor::new(&[0u8, 0, 0, 0, 0, 0, 0, 1]));
        assert_eq!(immediately.ok(), Some(Timetag::IMMEDIATELY));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_raw() {
        let json = serde_json::to_string(&Timetag::new(1, 2)).expect("serialize");
        assert_eq!(json, "4294967298");

        let tt: Timetag = serde_json::from_str("1").expect("deserialize");
        assert!(tt.is_immediate());
    }
}
