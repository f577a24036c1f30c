use std::{fmt, str::FromStr};

#[cfg(feature = "tracing")]
use tracing::{instrument, Level};

use crate::{error::Error, Bundle, Message};

/// The two kinds of OSC packet.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PackageType {
    Message,
    Bundle,
}

impl PackageType {
    pub const fn as_str(self) -> &'static str {
        match self {
            PackageType::Message => "message",
            PackageType::Bundle => "bundle",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(Self::Message),
            "bundle" => Ok(Self::Bundle),
            _ => Err(Error::UnknownPackageType(s.to_owned())),
        }
    }
}

/// Common behavior of every OSC packet.
///
/// Code that handles packets generically can branch on the
/// [`package_type`][Package::package_type]; to get at the concrete packet,
/// match on a [`Packet`].
pub trait Package {
    #[doc(alias = "GetType")]
    fn package_type(&self) -> PackageType;
}

/// An OSC packet: either a [`Message`] or a [`Bundle`].
#[derive(PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum Packet {
    Message(Message),
    Bundle(Bundle),
}

impl Packet {
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Packet::Message(message) => Some(message),
            Packet::Bundle(_) => None,
        }
    }

    pub fn as_bundle(&self) -> Option<&Bundle> {
        match self {
            Packet::Message(_) => None,
            Packet::Bundle(bundle) => Some(bundle),
        }
    }
}

impl Package for Packet {
    fn package_type(&self) -> PackageType {
        match self {
            Packet::Message(message) => message.package_type(),
            Packet::Bundle(bundle) => bundle.package_type(),
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Packet::Message(message) => write!(f, "{message}"),
            Packet::Bundle(bundle) => write!(f, "{bundle}"),
        }
    }
}

impl From<Message> for Packet {
    fn from(value: Message) -> Self {
        Self::Message(value)
    }
}

impl From<Bundle> for Packet {
    fn from(value: Bundle) -> Self {
        Self::Bundle(value)
    }
}

impl TryFrom<Packet> for Message {
    type Error = Error;

    #[cfg_attr(feature = "tracing", instrument(level = Level::TRACE, err(level = Level::WARN), skip_all))]
    fn try_from(value: Packet) -> Result<Self, Self::Error> {
        match value {
            Packet::Message(message) => Ok(message),
            Packet::Bundle(_) => Err(Error::UnexpectedType {
                expected: PackageType::Message,
                found: PackageType::Bundle,
            }),
        }
    }
}

impl TryFrom<Packet> for Bundle {
    type Error = Error;

    #[cfg_attr(feature = "tracing", instrument(level = Level::TRACE, err(level = Level::WARN), skip_all))]
    fn try_from(value: Packet) -> Result<Self, Self::Error> {
        match value {
            Packet::Bundle(bundle) => Ok(bundle),
            Packet::Message(_) => Err(Error::UnexpectedType {
                expected: PackageType::Bundle,
                found: PackageType::Message,
            }),
        }
    }
}
