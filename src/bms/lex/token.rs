//! Definitions of the token in BMS format.

use std::path::Path;

use crate::bms::command::{ObjId, PlayerMode, Track, channel::ChannelId, mixin::SourceRangeMixin};

use super::{
    LexWarning, Result,
    parsers::{float_prefix, int_prefix, strip_quotes, unsigned_prefix},
};

/// A token content of BMS format.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub enum Token<'a> {
    /// `#ARTIST [string]`. Defines the artist name of the music.
    Artist(&'a str),
    /// `#BMP[01-ZZ] [filename]`. Defines the background image/movie object.
    Bmp(ObjId, &'a Path),
    /// `#BPM [f64]`. Defines the initial tempo of the score.
    Bpm(f64),
    /// `#BPM[01-ZZ] [f64]`. Defines the tempo referred by the `08` channel.
    BpmChange(ObjId, f64),
    /// `#COMMENT [string]`. Defines the text which is shown in the music select view. Repeatable.
    Comment(&'a str),
    /// `#GENRE [string]`, or the misspelled `#GENLE`. Defines the genre of the music.
    Genre(&'a str),
    /// `#MAKER [string]`. Defines the author name of the score.
    Maker(&'a str),
    /// `#XXXYY:ZZ...`. Defines the message which places the object onto the score. `XXX` is the track, `YY` is the channel, and `ZZ...` is the object id sequence.
    Message {
        /// The track, or measure. Some players allow the 0 measure.
        track: Track,
        /// The channel commonly expresses what the lane be arranged the note to.
        channel: ChannelId,
        /// The message to the channel.
        message: &'a str,
    },
    /// `#PLAYER [1-4]`. Defines the play style of the score.
    Player(PlayerMode),
    /// `#PLAYLEVEL [integer]`. Defines the difficulty level shown in the music select view.
    PlayLevel(u32),
    /// `#RANK [integer]`. Defines the judgement level.
    Rank(i64),
    /// `#SUBARTIST [string]`. Defines a sub-artist name. Repeatable.
    SubArtist(&'a str),
    /// `#SUBTITLE [string]`. Defines the subtitle of the music.
    SubTitle(&'a str),
    /// `#TEXT[01-ZZ] string`. Defines the text object.
    Text(ObjId, &'a str),
    /// `#TITLE [string]`. Defines the title of the music.
    Title(&'a str),
    /// `#TOTAL [f64]`. Defines the total gauge percentage when all notes are got as PERFECT.
    Total(f64),
    /// `#VOLWAV [f64]`. Defines the relative volume percentage of the sound in the score.
    VolWav(f64),
    /// `#WAV[01-ZZ] [filename]`. Defines the key sound object.
    Wav(ObjId, &'a Path),
}

/// A token with position information.
pub type TokenWithRange<'a> = SourceRangeMixin<Token<'a>>;

/// Reads the arguments after a keyword, returns `None` if the arguments are not acceptable.
type DirectiveParser = for<'a> fn(&'a str) -> Option<Token<'a>>;

/// The header and definition directives in the priority order. The first match wins.
const DIRECTIVES: [(&str, DirectiveParser); 18] = [
    ("#PLAYER", player),
    ("#GENRE", genre),
    ("#GENLE", genre),
    ("#ARTIST", artist),
    ("#SUBARTIST", sub_artist),
    ("#MAKER", maker),
    ("#TITLE", title),
    ("#SUBTITLE", sub_title),
    ("#BPM", bpm),
    ("#PLAYLEVEL", play_level),
    ("#RANK", rank),
    ("#TOTAL", total),
    ("#VOLWAV", vol_wav),
    ("#WAV", wav),
    ("#BMP", bmp),
    ("#TEXT", text),
    ("#COMMENT", comment),
    ("#BPM", bpm_change),
];

fn player(args: &str) -> Option<Token<'_>> {
    PlayerMode::try_from(int_prefix(args)).ok().map(Token::Player)
}

fn genre(args: &str) -> Option<Token<'_>> {
    Some(Token::Genre(args.trim()))
}

fn artist(args: &str) -> Option<Token<'_>> {
    Some(Token::Artist(args.trim()))
}

fn sub_artist(args: &str) -> Option<Token<'_>> {
    Some(Token::SubArtist(args.trim()))
}

fn maker(args: &str) -> Option<Token<'_>> {
    Some(Token::Maker(args.trim()))
}

fn title(args: &str) -> Option<Token<'_>> {
    Some(Token::Title(args.trim()))
}

fn sub_title(args: &str) -> Option<Token<'_>> {
    Some(Token::SubTitle(args.trim()))
}

/// `#BPM` must be followed by a whitespace or nothing, otherwise it is `#BPMxx`.
fn bpm(args: &str) -> Option<Token<'_>> {
    let plain = args.chars().next().is_none_or(char::is_whitespace);
    plain.then(|| Token::Bpm(float_prefix(args)))
}

fn play_level(args: &str) -> Option<Token<'_>> {
    Some(Token::PlayLevel(unsigned_prefix(args)))
}

fn rank(args: &str) -> Option<Token<'_>> {
    Some(Token::Rank(int_prefix(args)))
}

fn total(args: &str) -> Option<Token<'_>> {
    Some(Token::Total(float_prefix(args)))
}

fn vol_wav(args: &str) -> Option<Token<'_>> {
    Some(Token::VolWav(float_prefix(args)))
}

/// Splits `xx rest` into the id of the first two characters and the trimmed rest.
fn split_id(args: &str) -> (ObjId, &str) {
    let id_end = args.char_indices().nth(2).map_or(args.len(), |(i, _)| i);
    (ObjId::from_lenient(&args[..id_end]), args[id_end..].trim())
}

fn wav(args: &str) -> Option<Token<'_>> {
    let (id, path) = split_id(args);
    Some(Token::Wav(id, Path::new(path)))
}

fn bmp(args: &str) -> Option<Token<'_>> {
    let (id, path) = split_id(args);
    Some(Token::Bmp(id, Path::new(path)))
}

fn text(args: &str) -> Option<Token<'_>> {
    let (id, text) = split_id(args);
    Some(Token::Text(id, strip_quotes(text)))
}

fn comment(args: &str) -> Option<Token<'_>> {
    Some(Token::Comment(strip_quotes(args.trim())))
}

fn bpm_change(args: &str) -> Option<Token<'_>> {
    let (id, value) = split_id(args);
    Some(Token::BpmChange(id, float_prefix(value)))
}

/// Strips the keyword from the command case-insensitively, and returns the rest.
fn strip_keyword<'a>(command: &'a str, keyword: &str) -> Option<&'a str> {
    let head = command.get(..keyword.len())?;
    head.eq_ignore_ascii_case(keyword)
        .then(|| &command[keyword.len()..])
}

impl<'a> Token<'a> {
    /// Parses a trimmed command, which starts with `#`, into a token.
    pub(crate) fn parse(command: &'a str) -> Result<Self> {
        for (keyword, parser) in DIRECTIVES {
            if let Some(token) = strip_keyword(command, keyword).and_then(parser) {
                return Ok(token);
            }
        }
        if command.as_bytes().get(6) == Some(&b':') {
            return Ok(Self::Message {
                track: Track(unsigned_prefix(command.get(1..4).unwrap_or_default())),
                channel: ChannelId::from_lenient(command.get(4..6).unwrap_or_default()),
                message: command[7..].trim(),
            });
        }
        Err(LexWarning::UnknownCommand {
            command: command.to_string(),
        })
    }
}
