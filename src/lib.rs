use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const MICROS_PER_SECOND: i64 = 1_000_000;
pub const NANOS_PER_MICRO: i64 = 1_000;

/// Largest seconds value that composes into an `i64` nanosecond count with a zero sub-second part.
pub const MAX_REPRESENTABLE_SECONDS: i64 = i64::MAX / NANOS_PER_SECOND;

/// Smallest seconds value that composes into an `i64` nanosecond count with a zero sub-second part.
pub const MIN_REPRESENTABLE_SECONDS: i64 = i64::MIN / NANOS_PER_SECOND;

// --- OS struct interop ---

#[cfg(feature = "libc")]
mod platform {
    use super::{Error, SecondsAndMicros, SecondsAndNanos};

    impl From<libc::timespec> for SecondsAndNanos {
        fn from(ts: libc::timespec) -> Self {
            Self {
                seconds: i64::from(ts.tv_sec),
                nanos: i64::from(ts.tv_nsec),
            }
        }
    }

    impl From<libc::timeval> for SecondsAndMicros {
        fn from(tv: libc::timeval) -> Self {
            Self {
                seconds: i64::from(tv.tv_sec),
                micros: i64::from(tv.tv_usec),
            }
        }
    }

    impl TryFrom<SecondsAndNanos> for libc::timespec {
        type Error = Error;

        /// Fails when a field does not fit the platform's `time_t` or `c_long`.
        #[allow(clippy::useless_conversion)]
        fn try_from(value: SecondsAndNanos) -> Result<Self, Self::Error> {
            // Some targets carry padding fields, so start from an all-zero struct.
            let mut ts = unsafe { std::mem::zeroed::<libc::timespec>() };
            ts.tv_sec = value
                .seconds
                .try_into()
                .map_err(|_| Error::FieldOutOfRange { field: "tv_sec" })?;
            ts.tv_nsec = value
                .nanos
                .try_into()
                .map_err(|_| Error::FieldOutOfRange { field: "tv_nsec" })?;
            Ok(ts)
        }
    }

    impl TryFrom<SecondsAndMicros> for libc::timeval {
        type Error = Error;

        /// Fails when a field does not fit the platform's `time_t` or `suseconds_t`.
        #[allow(clippy::useless_conversion)]
        fn try_from(value: SecondsAndMicros) -> Result<Self, Self::Error> {
            let mut tv = unsafe { std::mem::zeroed::<libc::timeval>() };
            tv.tv_sec = value
                .seconds
                .try_into()
                .map_err(|_| Error::FieldOutOfRange { field: "tv_sec" })?;
            tv.tv_usec = value
                .micros
                .try_into()
                .map_err(|_| Error::FieldOutOfRange { field: "tv_usec" })?;
            Ok(tv)
        }
    }
}

// --- Errors ---

/// Granularity of the sub-second field of a seconds pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsecUnit {
    Nanos,
    Micros,
}

impl SubsecUnit {
    /// Nanoseconds in one unit.
    pub const fn nanos_per_unit(self) -> i64 {
        match self {
            SubsecUnit::Nanos => 1,
            SubsecUnit::Micros => NANOS_PER_MICRO,
        }
    }

    /// Units in one second.
    pub const fn per_second(self) -> i64 {
        match self {
            SubsecUnit::Nanos => NANOS_PER_SECOND,
            SubsecUnit::Micros => MICROS_PER_SECOND,
        }
    }
}

impl fmt::Display for SubsecUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubsecUnit::Nanos => write!(f, "ns"),
            SubsecUnit::Micros => write!(f, "us"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("{seconds}s + {subsec}{unit} overflows a signed 64-bit nanosecond count")]
    ArithmeticOverflow {
        seconds: i64,
        subsec: i64,
        unit: SubsecUnit,
    },
    #[cfg(feature = "libc")]
    #[error("`{field}` does not fit in the platform time struct")]
    FieldOutOfRange { field: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Computes `seconds * 10^9 + subsec * unit` exactly, or `None` if the result leaves `i64`.
fn checked_compose(seconds: i64, subsec: i64, unit: SubsecUnit) -> Option<i64> {
    let total = i128::from(seconds) * i128::from(NANOS_PER_SECOND)
        + i128::from(subsec) * i128::from(unit.nanos_per_unit());
    i64::try_from(total).ok()
}

fn compose(seconds: i64, subsec: i64, unit: SubsecUnit) -> Result<i64> {
    checked_compose(seconds, subsec, unit).ok_or_else(|| {
        tracing::debug!(
            seconds,
            subsec,
            %unit,
            "rejecting composition that overflows i64 nanoseconds"
        );
        Error::ArithmeticOverflow {
            seconds,
            subsec,
            unit,
        }
    })
}

// --- Conversions ---

/// A time value that can be decomposed from and composed into an `i64` nanosecond count.
///
/// Implemented by both [`SecondsAndNanos`] and [`SecondsAndMicros`] so callers can be
/// generic over the `timespec` and `timeval` shapes.
pub trait NanosecondRepr: Copy {
    /// Granularity of the sub-second field.
    const UNIT: SubsecUnit;

    /// Splits a nanosecond count into seconds and a sub-second remainder carrying the same sign.
    fn from_nanos(nanos: i64) -> Self;

    /// Composes back into a nanosecond count, failing on `i64` overflow.
    fn to_nanos(&self) -> Result<i64>;

    /// Whether [`to_nanos`](NanosecondRepr::to_nanos) would succeed.
    fn is_representable_as_nanoseconds(&self) -> bool;
}

/// Seconds plus a nanosecond remainder, shaped like `struct timespec`.
///
/// Fields are public and unvalidated. Values produced by this crate keep `nanos` at the
/// same sign as the total and below one second in magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SecondsAndNanos {
    pub seconds: i64,
    pub nanos: i64,
}

impl SecondsAndNanos {
    pub const fn new(seconds: i64, nanos: i64) -> Self {
        Self { seconds, nanos }
    }

    /// Splits `nanos` with truncating division; every `i64` has an exact decomposition.
    pub const fn from_nanos(nanos: i64) -> Self {
        Self {
            seconds: nanos / NANOS_PER_SECOND,
            nanos: nanos % NANOS_PER_SECOND,
        }
    }

    /// Returns `seconds * 10^9 + nanos`.
    ///
    /// Fails with [`Error::ArithmeticOverflow`] instead of wrapping when the total does
    /// not fit in an `i64`.
    pub fn to_nanos(&self) -> Result<i64> {
        compose(self.seconds, self.nanos, SubsecUnit::Nanos)
    }

    pub fn is_representable_as_nanoseconds(&self) -> bool {
        checked_compose(self.seconds, self.nanos, SubsecUnit::Nanos).is_some()
    }

    /// Drops the sub-microsecond part of `nanos`.
    pub const fn to_seconds_and_micros(&self) -> SecondsAndMicros {
        SecondsAndMicros {
            seconds: self.seconds,
            micros: self.nanos / NANOS_PER_MICRO,
        }
    }

    /// Converts a wall-clock time into an offset from the Unix epoch.
    ///
    /// Times before the epoch give non-positive `seconds` and `nanos`. Offsets beyond
    /// the `i64` range of seconds saturate.
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self {
                seconds: i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
                nanos: i64::from(after.subsec_nanos()),
            },
            Err(err) => {
                let before = err.duration();
                Self {
                    seconds: i64::try_from(before.as_secs()).map_or(i64::MIN, |s| -s),
                    nanos: -i64::from(before.subsec_nanos()),
                }
            }
        }
    }

    /// Returns the current wall-clock time relative to the Unix epoch.
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }
}

impl NanosecondRepr for SecondsAndNanos {
    const UNIT: SubsecUnit = SubsecUnit::Nanos;

    fn from_nanos(nanos: i64) -> Self {
        SecondsAndNanos::from_nanos(nanos)
    }

    fn to_nanos(&self) -> Result<i64> {
        SecondsAndNanos::to_nanos(self)
    }

    fn is_representable_as_nanoseconds(&self) -> bool {
        SecondsAndNanos::is_representable_as_nanoseconds(self)
    }
}

impl From<i64> for SecondsAndNanos {
    fn from(nanos: i64) -> Self {
        Self::from_nanos(nanos)
    }
}

impl TryFrom<SecondsAndNanos> for i64 {
    type Error = Error;

    fn try_from(value: SecondsAndNanos) -> Result<Self> {
        value.to_nanos()
    }
}

impl From<SystemTime> for SecondsAndNanos {
    fn from(time: SystemTime) -> Self {
        Self::from_system_time(time)
    }
}

/// Seconds plus a microsecond remainder, shaped like `struct timeval`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SecondsAndMicros {
    pub seconds: i64,
    pub micros: i64,
}

impl SecondsAndMicros {
    pub const fn new(seconds: i64, micros: i64) -> Self {
        Self { seconds, micros }
    }

    /// Splits `nanos` at microsecond resolution. The sub-microsecond remainder is
    /// discarded, truncating toward zero.
    pub const fn from_nanos(nanos: i64) -> Self {
        Self {
            seconds: nanos / NANOS_PER_SECOND,
            micros: (nanos / NANOS_PER_MICRO) % MICROS_PER_SECOND,
        }
    }

    /// Returns `seconds * 10^9 + micros * 10^3`, failing on `i64` overflow.
    pub fn to_nanos(&self) -> Result<i64> {
        compose(self.seconds, self.micros, SubsecUnit::Micros)
    }

    pub fn is_representable_as_nanoseconds(&self) -> bool {
        checked_compose(self.seconds, self.micros, SubsecUnit::Micros).is_some()
    }

    /// Widens the sub-second field to nanoseconds.
    ///
    /// Only fails for a `micros` field far outside its nominal range.
    pub fn to_seconds_and_nanos(&self) -> Result<SecondsAndNanos> {
        match self.micros.checked_mul(NANOS_PER_MICRO) {
            Some(nanos) => Ok(SecondsAndNanos::new(self.seconds, nanos)),
            None => Err(Error::ArithmeticOverflow {
                seconds: self.seconds,
                subsec: self.micros,
                unit: SubsecUnit::Micros,
            }),
        }
    }
}

impl NanosecondRepr for SecondsAndMicros {
    const UNIT: SubsecUnit = SubsecUnit::Micros;

    fn from_nanos(nanos: i64) -> Self {
        SecondsAndMicros::from_nanos(nanos)
    }

    fn to_nanos(&self) -> Result<i64> {
        SecondsAndMicros::to_nanos(self)
    }

    fn is_representable_as_nanoseconds(&self) -> bool {
        SecondsAndMicros::is_representable_as_nanoseconds(self)
    }
}

impl From<i64> for SecondsAndMicros {
    fn from(nanos: i64) -> Self {
        Self::from_nanos(nanos)
    }
}

impl TryFrom<SecondsAndMicros> for i64 {
    type Error = Error;

    fn try_from(value: SecondsAndMicros) -> Result<Self> {
        value.to_nanos()
    }
}

impl From<SecondsAndNanos> for SecondsAndMicros {
    fn from(value: SecondsAndNanos) -> Self {
        value.to_seconds_and_micros()
    }
}

/// Returns the current wall-clock time as nanoseconds since the Unix epoch.
pub fn now_nanos() -> Result<i64> {
    SecondsAndNanos::now().to_nanos()
}
