use std::fmt;

use crate::{Package, PackageType, Timetag};

/// An OSC message: an address, and an ordered list of [arguments][Argument].
///
/// Nothing is validated on construction. The address is expected to be a
/// `/`-separated path (e.g., `/synth/1/freq`), but checking that is left to
/// whatever encodes or dispatches the message.
#[derive(PartialEq, Clone, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Message {
    /// The OSC address pattern this message is sent to.
    pub address: String,

    /// The message arguments, in the order they are sent.
    pub arguments: Vec<Argument>,
}

impl Message {
    pub fn new(address: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            address: address.into(),
            arguments,
        }
    }

    /// Create a [`Message`] with no arguments.
    pub fn with_address(address: impl Into<String>) -> Self {
        Self::new(address, Vec::new())
    }

    /// Append an argument.
    pub fn push(&mut self, argument: impl Into<Argument>) {
        self.arguments.push(argument.into());
    }

    /// Append an argument, builder-style.
    pub fn with(mut self, argument: impl Into<Argument>) -> Self {
        self.push(argument);
        self
    }

    /// The parts of the address between `/` separators. Empty parts are
    /// skipped.
    pub fn address_segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.address.split('/').filter(|s| !s.is_empty())
    }

    /// The OSC type tag string for the arguments, starting with `,`.
    pub fn type_tags(&self) -> String {
        let mut tags = String::with_capacity(self.arguments.len() + 1);
        tags.push(',');

        for argument in &self.arguments {
            argument.push_tags(&mut tags);
        }

        tags
    }
}

impl Package for Message {
    fn package_type(&self) -> PackageType {
        PackageType::Message
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.address)?;
        write_list(f, &self.arguments)
    }
}

/// A single OSC message argument.
///
/// Covers the OSC 1.0 required types (`i`, `f`, `s`, `b`) and the common
/// extended types.
#[derive(PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Argument {
    /// 32-bit integer (`i`).
    Int(i32),
    /// 32-bit float (`f`).
    Float(f32),
    /// String (`s`).
    String(String),
    /// Arbitrary bytes (`b`).
    Blob(Vec<u8>),
    /// 64-bit integer (`h`).
    Long(i64),
    /// 64-bit float (`d`).
    Double(f64),
    /// Time tag (`t`).
    Timetag(Timetag),
    /// Alternate string type, for systems that distinguish symbols (`S`).
    Symbol(String),
    /// ASCII character (`c`).
    Char(char),
    /// RGBA color, one byte per channel (`r`).
    Color([u8; 4]),
    /// MIDI message: port ID, status byte, data1, data2 (`m`).
    Midi([u8; 4]),
    /// `T` or `F`; carries no data on the wire.
    Bool(bool),
    /// `N`
    Nil,
    /// `I`, also known as "bang".
    Impulse,
    /// Nested arguments, delimited by `[` and `]` in the type tags.
    Array(Vec<Argument>),
}

impl Argument {
    /// The type tag character for this argument. Arrays report their opening
    /// `[`.
    pub const fn type_tag(&self) -> char {
        match self {
            Argument::Int(_) => 'i',
            Argument::Float(_) => 'f',
            Argument::String(_) => 's',
            Argument::Blob(_) => 'b',
            Argument::Long(_) => 'h',
            Argument::Double(_) => 'd',
            Argument::Timetag(_) => 't',
            Argument::Symbol(_) => 'S',
            Argument::Char(_) => 'c',
            Argument::Color(_) => 'r',
            Argument::Midi(_) => 'm',
            Argument::Bool(true) => 'T',
            Argument::Bool(false) => 'F',
            Argument::Nil => 'N',
            Argument::Impulse => 'I',
            Argument::Array(_) => '[',
        }
    }

    fn push_tags(&self, tags: &mut String) {
        tags.push(self.type_tag());

        if let Argument::Array(items) = self {
            for item in items {
                item.push_tags(tags);
            }
            tags.push(']');
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Int(v) => write!(f, "{v}"),
            Argument::Float(v) => write!(f, "{v}"),
            Argument::String(v) | Argument::Symbol(v) => f.write_str(v),
            Argument::Blob(bytes) => {
                f.write_str("<")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                f.write_str(">")
            }
            Argument::Long(v) => write!(f, "{v}"),
            Argument::Double(v) => write!(f, "{v}"),
            Argument::Timetag(tt) => write!(f, "{tt}"),
            Argument::Char(c) => write!(f, "{c}"),
            Argument::Color([r, g, b, a]) => write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}"),
            Argument::Midi([port, status, data1, data2]) => {
                write!(f, "midi:{port:02x} {status:02x} {data1:02x} {data2:02x}")
            }
            Argument::Bool(v) => write!(f, "{v}"),
            Argument::Nil => f.write_str("nil"),
            Argument::Impulse => f.write_str("impulse"),
            Argument::Array(items) => write_list(f, items),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Argument]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

macro_rules! impl_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Argument {
                fn from(value: $t) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_from! {
    i32 => Int,
    f32 => Float,
    String => String,
    &str => String,
    Vec<u8> => Blob,
    &[u8] => Blob,
    i64 => Long,
    f64 => Double,
    Timetag => Timetag,
    char => Char,
    bool => Bool,
    Vec<Argument> => Array,
}
