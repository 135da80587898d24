//! Definitions of channel command argument data.
//!
//! A channel is the two base 36 digits `cc` in a grid line `#mmmcc:data`. The channel decides what the
//! objects on the line mean: an auto-played sound, a tempo change, the metre of the measure, or a note
//! on a lane. For the lane layout of each dialect, see [`mapper`].
//!
//! For the channel table, please see [BMS command memo#KEYMAP Table](https://hitkey.bms.ms/cmds.htm#KEYMAP-TABLE)

use thiserror::Error;

use crate::bms::lex::parsers::base36_lenient;

pub mod mapper;

/// A channel id, the two digits of base 36 in `#mmmcc:`. The value spans `0..=1295`.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelId(u16);

/// Error type for parsing [`ChannelId`] strictly from string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ChannelIdParseError {
    /// The channel id must be exactly 2 characters.
    #[error("channel id must be exactly 2 characters, got `{0}`")]
    ExpectedTwoChars(String),
    /// The channel id must be alpha numeric to parse as base 36.
    #[error("channel id must be an alpha numeric to parse as base 36, got `{0}`")]
    InvalidAsBase36(String),
}

impl ChannelId {
    /// The number of distinct channel ids.
    pub const SPACE: usize = 36 * 36;

    /// The auto-played background sound channel `01`.
    pub const BGM: Self = Self(1);
    /// The metre, or section length, channel `02`.
    pub const SECTION_LEN: Self = Self(2);
    /// The tempo change channel `03`, whose object ids are hexadecimal BPM values.
    pub const BPM_CHANGE_U8: Self = Self(3);
    /// The extended tempo change channel `08`, whose object ids refer `#BPMxx` definitions.
    pub const BPM_CHANGE: Self = Self(8);

    /// Reads a channel leniently: the leading base 36 digits (at most 2) are used and anything unreadable is `0`.
    #[must_use]
    pub fn from_lenient(digits: &str) -> Self {
        Self(base36_lenient(digits))
    }

    /// Converts the channel id into an `u16` value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Converts the channel id into an index for the channel tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns what this channel means.
    #[must_use]
    pub const fn kind(self) -> ChannelKind {
        ChannelKind::from_id(self)
    }

    /// Returns whether objects on this channel refer `#WAVxx` samples and so trigger sounds.
    ///
    /// The control channels `02`-`0E`, the range `70`-`99` and the option channels `A0`-`A6` are excluded,
    /// as are the `00` channel and the unused first channel of each note group (`10`, `20`, ..., `60`).
    #[must_use]
    pub const fn is_sound_channel(self) -> bool {
        let c = self.0;
        !(c == 0
            || (2 <= c && c <= 14)
            || matches!(c, 36 | 72 | 108 | 144 | 180 | 216)
            || (252 <= c && c <= 333)
            || (360 <= c && c <= 366))
    }
}

impl std::fmt::Debug for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ChannelId").field(&self.to_string()).finish()
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let to_char = |d: u16| char::from_digit(u32::from(d), 36).map_or('0', |c| c.to_ascii_uppercase());
        write!(f, "{}{}", to_char(self.0 / 36), to_char(self.0 % 36))
    }
}

impl std::str::FromStr for ChannelId {
    type Err = ChannelIdParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let [Some(ch1), Some(ch2), None] = [chars.next(), chars.next(), chars.next()] else {
            return Err(ChannelIdParseError::ExpectedTwoChars(s.to_string()));
        };
        let (Some(hi), Some(lo)) = (ch1.to_digit(36), ch2.to_digit(36)) else {
            return Err(ChannelIdParseError::InvalidAsBase36(s.to_string()));
        };
        Ok(Self((hi * 36 + lo) as u16))
    }
}

impl From<ChannelId> for u16 {
    fn from(value: ChannelId) -> Self {
        value.0
    }
}

/// The meaning of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ChannelKind {
    /// For the note which will be auto-played.
    Bgm,
    /// For the section length change object.
    SectionLen,
    /// For the bpm change by an [`u8`] integer.
    BpmChangeU8,
    /// The BGA channel.
    BgaBase,
    /// The POOR BGA channel.
    BgaPoor,
    /// The BGA channel but overlay to [`ChannelKind::BgaBase`] channel.
    BgaLayer,
    /// For the bpm change object.
    BpmChange,
    /// For the stop object.
    Stop,
    /// For the note placed on a lane.
    Note {
        /// The side of the player.
        side: PlayerSide,
        /// The kind of the note.
        kind: NoteKind,
    },
    /// Anything else. Objects are kept but have no special meaning.
    Other,
}

impl ChannelKind {
    const fn from_id(id: ChannelId) -> Self {
        match id.0 {
            1 => Self::Bgm,
            2 => Self::SectionLen,
            3 => Self::BpmChangeU8,
            4 => Self::BgaBase,
            6 => Self::BgaPoor,
            7 => Self::BgaLayer,
            8 => Self::BpmChange,
            9 => Self::Stop,
            c => {
                // 1..6 and D..E in the upper digit, 1..Z in the lower digit.
                let (upper, lower) = (c / 36, c % 36);
                if lower == 0 {
                    return Self::Other;
                }
                let (side, kind) = match upper {
                    1 => (PlayerSide::Player1, NoteKind::Visible),
                    2 => (PlayerSide::Player2, NoteKind::Visible),
                    3 => (PlayerSide::Player1, NoteKind::Invisible),
                    4 => (PlayerSide::Player2, NoteKind::Invisible),
                    5 => (PlayerSide::Player1, NoteKind::Long),
                    6 => (PlayerSide::Player2, NoteKind::Long),
                    13 => (PlayerSide::Player1, NoteKind::Landmine),
                    14 => (PlayerSide::Player2, NoteKind::Landmine),
                    _ => return Self::Other,
                };
                Self::Note { side, kind }
            }
        }
    }

    /// Returns whether the objects on this channel change the tempo.
    #[must_use]
    pub const fn is_tempo_change(self) -> bool {
        matches!(self, Self::BpmChangeU8 | Self::BpmChange)
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Channel: ")?;
        match self {
            Self::Bgm => write!(f, "BGM"),
            Self::SectionLen => write!(f, "SECTION_LEN"),
            Self::BpmChangeU8 => write!(f, "BPM_CHANGE_U8"),
            Self::BgaBase => write!(f, "BGA"),
            Self::BgaPoor => write!(f, "BGA_POOR"),
            Self::BgaLayer => write!(f, "BGA_LAYER"),
            Self::BpmChange => write!(f, "BPM_CHANGE"),
            Self::Stop => write!(f, "STOP"),
            Self::Note { .. } => write!(f, "NOTE"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// A kind of the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteKind {
    /// A normal note can be seen by the user.
    Visible,
    /// A invisible note cannot be played by the user.
    Invisible,
    /// A long-press note (LN), requires the user to hold pressing the key.
    Long,
    /// A landmine note that treated as POOR judgement when pressed.
    Landmine,
}

impl NoteKind {
    /// Returns whether the note is a displayable.
    #[must_use]
    pub const fn is_displayable(self) -> bool {
        !matches!(self, Self::Invisible)
    }

    /// Returns whether the note is a long-press note.
    #[must_use]
    pub const fn is_long(self) -> bool {
        matches!(self, Self::Long)
    }
}

/// A side of the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerSide {
    /// The player 1 side.
    #[default]
    Player1,
    /// The player 2 side.
    Player2,
}
