use crate::PackageType;

/// An error converting between OSC packet types or time representations.
#[derive(thiserror::Error, Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The calendar time falls outside the 1900-2036 era a [`Timetag`][crate::Timetag]
    /// can express.
    #[cfg(feature = "time")]
    #[cfg_attr(docsrs, doc(cfg(feature = "time")))]
    #[error("{0} is outside the range of an OSC timetag")]
    OutOfRange(time::OffsetDateTime),
    #[error("expected an OSC {expected}, found a {found}")]
    UnexpectedType {
        expected: PackageType,
        found: PackageType,
    },
    #[error("unknown OSC package type {0:?}")]
    UnknownPackageType(String),
}
