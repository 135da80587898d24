//! Definitions of command argument data.
//!
//! Structures in this module are shared by the [lex](crate::bms::lex) part, the
//! [parse](crate::bms::parse) part and the output [model](crate::bms::model).

pub mod channel;
pub mod mixin;

use crate::bms::lex::parsers::{base36_lenient, base36_pair};

/// A play style of the score, declared by `#PLAYER`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerMode {
    /// `#PLAYER 1`. A player uses 5 or 7 keys.
    #[default]
    Single,
    /// `#PLAYER 2`. Two players use each 5 or 7 keys.
    Couple,
    /// `#PLAYER 3`. A player uses 10 or 14 keys.
    Double,
    /// `#PLAYER 4`. Two players battle on the same chart.
    Battle,
}

impl TryFrom<i64> for PlayerMode {
    type Error = i64;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::Single,
            2 => Self::Couple,
            3 => Self::Double,
            4 => Self::Battle,
            other => return Err(other),
        })
    }
}

impl std::fmt::Display for PlayerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Self::Single => 1,
            Self::Couple => 2,
            Self::Double => 3,
            Self::Battle => 4,
        };
        write!(f, "{value}")
    }
}

/// A track, or measure, or bar, in the score. Most scores start from 1, but the 0 track is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track(pub u32);

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl Track {
    /// Returns the track number as an index into the measure list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// An object id. Its meaning is determined by the channel belonged to.
///
/// The textual representation is 2 digits of base 36, so the value spans `0..=1295`.
/// `00` is the null id, which means a rest.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjId(u16);

impl ObjId {
    /// The number of distinct ids.
    pub const SPACE: u16 = 36 * 36;

    /// Instances a special null id, which means the rest object.
    #[must_use]
    pub const fn null() -> Self {
        Self(0)
    }

    /// Returns whether the id is the null id.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Converts the object id into an `u16` value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Reads an id leniently: the leading base 36 digits (at most 2) are used and anything unreadable is `0`.
    ///
    /// This follows how the old players read ids with `strtol`, so `"1!"` becomes `1` and `"!1"` becomes `0`.
    #[must_use]
    pub fn from_lenient(digits: &str) -> Self {
        Self(base36_lenient(digits))
    }

    /// Reads a pair of bytes in an object sequence leniently, as [`ObjId::from_lenient`] does.
    #[must_use]
    pub fn from_ascii_pair(hi: u8, lo: u8) -> Self {
        Self(base36_pair(hi, lo))
    }

    /// Returns the two base 36 digits of the id, in upper case.
    #[must_use]
    pub fn digits(self) -> [char; 2] {
        let to_char = |d: u16| char::from_digit(u32::from(d), 36).map_or('0', |c| c.to_ascii_uppercase());
        [to_char(self.0 / 36), to_char(self.0 % 36)]
    }

    /// Interprets the two digits as hexadecimal, as the `03` channel does for its BPM values.
    ///
    /// Returns `None` if any digit is out of the hexadecimal range.
    #[must_use]
    pub const fn as_hex(self) -> Option<u8> {
        let (upper, lower) = (self.0 / 36, self.0 % 36);
        if upper < 16 && lower < 16 {
            Some((upper * 16 + lower) as u8)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for ObjId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [hi, lo] = self.digits();
        f.debug_tuple("ObjId").field(&format!("{hi}{lo}")).finish()
    }
}

impl std::fmt::Display for ObjId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [hi, lo] = self.digits();
        write!(f, "{hi}{lo}")
    }
}

impl TryFrom<u16> for ObjId {
    type Error = u16;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value < Self::SPACE {
            Ok(Self(value))
        } else {
            Err(value)
        }
    }
}

impl<'a> TryFrom<&'a str> for ObjId {
    type Error = &'a str;
    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        let [Some(ch1), Some(ch2), None] = [chars.next(), chars.next(), chars.next()] else {
            return Err(value);
        };
        let (Some(hi), Some(lo)) = (ch1.to_digit(36), ch2.to_digit(36)) else {
            return Err(value);
        };
        Ok(Self((hi * 36 + lo) as u16))
    }
}

impl From<ObjId> for u16 {
    fn from(value: ObjId) -> Self {
        value.0
    }
}

impl From<ObjId> for usize {
    fn from(value: ObjId) -> Self {
        value.0 as usize
    }
}
