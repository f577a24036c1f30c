//! Data types for [Open Sound Control][osc] packets.
//!
//! An OSC [`Packet`] is either a [`Message`] (an address and a list of
//! [arguments][Argument]) or a [`Bundle`] (a [`Timetag`], a set of messages
//! to apply atomically at that time, and further nested bundles).
//!
//! This crate models the packets and the NTP-style [`Timetag`]; it does not
//! encode them or send them anywhere.
//!
//! [osc]: https://opensoundcontrol.stanford.edu/spec-1_0.html
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bundle;
mod error;
mod message;
mod pad;
mod packet;
mod timetag;

pub use bundle::Bundle;
pub use error::Error;
pub use message::{Argument, Message};
pub use pad::{pad_length, padded_length};
pub use packet::{Package, PackageType, Packet};
pub use timetag::Timetag;
#[cfg(feature = "time")]
#[cfg_attr(docsrs, doc(cfg(feature = "time")))]
pub use timetag::{is_unset, UNSET_TIME};
