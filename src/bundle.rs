use std::fmt;

use crate::{Message, Package, PackageType, Packet, Timetag};

/// An OSC bundle: a [`Timetag`], the messages to execute at that time, and
/// any nested bundles.
///
/// The two child lists have different semantics, and must not be merged:
///
/// - every entry in [`messages`][Bundle::messages] is applied atomically, as
///   a set, at the bundle's timetag;
/// - each entry in [`bundles`][Bundle::bundles] is an independent packet,
///   _not_ atomic with this bundle or with its siblings.
///
/// A bundle owns its children outright, and is assembled bottom-up, so a
/// bundle tree can never contain a cycle.
#[derive(PartialEq, Clone, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Bundle {
    /// When the messages in this bundle should be executed.
    pub timetag: Timetag,

    /// Messages to execute at [`timetag`][Bundle::timetag], atomically.
    pub messages: Vec<Message>,

    /// Nested bundles; each one is handled on its own, not atomically with
    /// this bundle.
    pub bundles: Vec<Bundle>,

    /// The bundle identifier written after `#` when encoding. When unset,
    /// [`DEFAULT_NAME`][Bundle::DEFAULT_NAME] is used.
    pub name: Option<String>,
}

impl Bundle {
    /// The standard bundle name, giving the `#bundle` identifier.
    pub const DEFAULT_NAME: &'static str = "bundle";

    pub const fn new(timetag: Timetag) -> Self {
        Self {
            timetag,
            messages: Vec::new(),
            bundles: Vec::new(),
            name: None,
        }
    }

    /// Create an empty bundle to be executed [immediately][Timetag::IMMEDIATELY].
    pub const fn immediately() -> Self {
        Self::new(Timetag::IMMEDIATELY)
    }

    /// Add a [`Message`] or [`Bundle`] to the matching list of children.
    pub fn push(&mut self, packet: impl Into<Packet>) {
        match packet.into() {
            Packet::Message(message) => self.messages.push(message),
            Packet::Bundle(bundle) => self.bundles.push(bundle),
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_bundle(mut self, bundle: Bundle) -> Self {
        self.bundles.push(bundle);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The bundle name, falling back to [`DEFAULT_NAME`][Bundle::DEFAULT_NAME].
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(Self::DEFAULT_NAME)
    }

    /// The identifier that starts an encoded bundle: `#` followed by the
    /// [name][Bundle::name].
    pub fn identifier(&self) -> String {
        format!("#{}", self.name())
    }

    /// The number of direct children (messages and bundles).
    pub fn len(&self) -> usize {
        self.messages.len() + self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.bundles.is_empty()
    }
}

impl Package for Bundle {
    fn package_type(&self) -> PackageType {
        PackageType::Bundle
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} ({} messages, {} bundles)",
            self.identifier(),
            self.timetag,
            self.messages.len(),
            self.bundles.len()
        )
    }
}
