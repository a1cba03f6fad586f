//! Wire protocol for the game channel.
//!
//! One command per line: a two-digit code, optionally followed by a single
//! space and one argument.
//!
//! ## Commands
//!
//! - `00 W|B` - Start a new game, the player takes the given color
//! - `01` - Return the board snapshot
//! - `02 <move>` - Submit the player's move
//! - `03` - Ask the engine to move
//! - `04` - Resign
//!
//! ## Move format
//!
//! `<color><kind><file><rank>-<file><rank>` optionally followed by one or two
//! three-character options: `x<color><kind>` names a captured piece and
//! `y<color><kind>` a promotion. With both, the capture comes first:
//!
//! ```text
//! WPe2-e4
//! WQd1-d7xBQ
//! WPb7-a8xBRyWQ
//! ```
//!
//! Every reply is one newline-terminated line: `OK`, `CHECK`, `MATE`, a board
//! snapshot, or one of the error tokens below.

use std::fmt;

use crate::board::{Board, Color, Kind, Square};
use crate::constants::MAX_ARG_LEN;
use crate::rules::{IllegalMove, Ply};

/// Why a command line could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// The write carried no newline.
    Unterminated,
    /// More than one argument.
    TooManyTokens,
    /// The command code is not two characters.
    BadCode,
    /// The argument is longer than any valid argument.
    ArgumentTooLong,
    MissingArgument,
    UnexpectedArgument,
    /// A move argument is not 7, 10 or 13 characters.
    BadLength,
    BadColor,
    BadKind,
    BadSquare,
    MissingSeparator,
    /// Option letters other than `x`, `y`, or `x` followed by `y`.
    BadOption,
    /// A color letter that does not belong to the expected side.
    WrongSide,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FormatError::Unterminated => "missing newline",
            FormatError::TooManyTokens => "too many tokens",
            FormatError::BadCode => "command code must be two characters",
            FormatError::ArgumentTooLong => "argument too long",
            FormatError::MissingArgument => "missing argument",
            FormatError::UnexpectedArgument => "unexpected argument",
            FormatError::BadLength => "move must be 7, 10 or 13 characters",
            FormatError::BadColor => "unknown color letter",
            FormatError::BadKind => "unknown piece letter",
            FormatError::BadSquare => "invalid square",
            FormatError::MissingSeparator => "missing '-' separator",
            FormatError::BadOption => "invalid move option",
            FormatError::WrongSide => "color does not match the side",
        };
        f.write_str(msg)
    }
}

/// Every way a command can be refused. None of them change the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Format(FormatError),
    Illegal(IllegalMove),
    NoGame,
    OutOfTurn,
    UnknownCommand(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Format(e) => write!(f, "invalid format: {e}"),
            CommandError::Illegal(e) => write!(f, "illegal move: {e}"),
            CommandError::NoGame => write!(f, "no game in progress"),
            CommandError::OutOfTurn => write!(f, "out of turn"),
            CommandError::UnknownCommand(code) => write!(f, "unknown command: {code}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<FormatError> for CommandError {
    fn from(e: FormatError) -> Self {
        CommandError::Format(e)
    }
}

impl From<IllegalMove> for CommandError {
    fn from(e: IllegalMove) -> Self {
        CommandError::Illegal(e)
    }
}

impl CommandError {
    /// The reply sent back for this error.
    pub fn response(&self) -> Response {
        match self {
            CommandError::Format(_) => Response::InvalidFormat,
            CommandError::Illegal(_) => Response::IllegalMove,
            CommandError::NoGame => Response::NoGame,
            CommandError::OutOfTurn => Response::OutOfTurn,
            CommandError::UnknownCommand(_) => Response::UnknownCommand,
        }
    }
}

/// A reply on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ok,
    Check,
    Mate,
    /// Board snapshot, newline included.
    Board(String),
    IllegalMove,
    NoGame,
    OutOfTurn,
    InvalidFormat,
    UnknownCommand,
}

impl Response {
    /// The newline-terminated text written back to the client.
    pub fn line(&self) -> String {
        let token = match self {
            Response::Board(snapshot) => return snapshot.clone(),
            Response::Ok => "OK",
            Response::Check => "CHECK",
            Response::Mate => "MATE",
            Response::IllegalMove => "ILLMOVE",
            Response::NoGame => "NOGAME",
            Response::OutOfTurn => "OOT",
            Response::InvalidFormat => "INVFMT",
            Response::UnknownCommand => "UNKCMD",
        };
        format!("{token}\n")
    }
}

/// A colored piece named in a move option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tagged {
    pub color: Color,
    pub kind: Kind,
}

/// A decoded move argument. Colors are checked against the game later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSpec {
    pub color: Color,
    pub kind: Kind,
    pub from: Square,
    pub to: Square,
    pub capture: Option<Tagged>,
    pub promotion: Option<Tagged>,
}

impl MoveSpec {
    /// Decode a move argument such as `WPe2-e4` or `WQd1-d7xBQ`.
    pub fn parse(arg: &str) -> Result<MoveSpec, FormatError> {
        let b = arg.as_bytes();
        if !matches!(b.len(), 7 | 10 | 13) {
            return Err(FormatError::BadLength);
        }

        let color = Color::from_letter(b[0]).ok_or(FormatError::BadColor)?;
        let kind = Kind::from_letter(b[1]).ok_or(FormatError::BadKind)?;
        let from = Square::from_chars(b[2], b[3]).ok_or(FormatError::BadSquare)?;
        if b[4] != b'-' {
            return Err(FormatError::MissingSeparator);
        }
        let to = Square::from_chars(b[5], b[6]).ok_or(FormatError::BadSquare)?;

        let mut options = b[7..].chunks_exact(3).map(|opt| -> Result<_, FormatError> {
            let tagged = Tagged {
                color: Color::from_letter(opt[1]).ok_or(FormatError::BadColor)?,
                kind: Kind::from_letter(opt[2]).ok_or(FormatError::BadKind)?,
            };
            Ok((opt[0], tagged))
        });
        let first = options.next().transpose()?;
        let second = options.next().transpose()?;

        let (capture, promotion) = match (first, second) {
            (None, None) => (None, None),
            (Some((b'x', c)), None) => (Some(c), None),
            (Some((b'y', p)), None) => (None, Some(p)),
            (Some((b'x', c)), Some((b'y', p))) => (Some(c), Some(p)),
            _ => return Err(FormatError::BadOption),
        };

        Ok(MoveSpec {
            color,
            kind,
            from,
            to,
            capture,
            promotion,
        })
    }

    /// Describe a board move in wire form, declaring any capture and
    /// promoting to a queen on the last rank.
    pub fn describe(board: &Board, ply: &Ply) -> MoveSpec {
        let piece = board.piece(ply.index);
        let capture = board.occupant(ply.to).map(|p| Tagged {
            color: p.color,
            kind: p.kind,
        });
        let promotion = (piece.kind == Kind::Pawn && ply.to.rank() == piece.color.last_rank())
            .then_some(Tagged {
                color: piece.color,
                kind: Kind::Queen,
            });
        MoveSpec {
            color: piece.color,
            kind: piece.kind,
            from: ply.from,
            to: ply.to,
            capture,
            promotion,
        }
    }
}

impl fmt::Display for MoveSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}-{}",
            self.color.letter(),
            self.kind.letter(),
            self.from,
            self.to
        )?;
        if let Some(c) = self.capture {
            write!(f, "x{}{}", c.color.letter(), c.kind.letter())?;
        }
        if let Some(p) = self.promotion {
            write!(f, "y{}{}", p.color.letter(), p.kind.letter())?;
        }
        Ok(())
    }
}

/// A decoded command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewGame(Color),
    ViewBoard,
    Move(MoveSpec),
    ComputerMove,
    Resign,
}

/// Decode one command line (without its newline).
///
/// The line is split on single spaces, so doubled spaces produce empty
/// tokens and are rejected like any other extra token.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut tokens = line.split(' ');
    let code = tokens.next().unwrap_or_default();
    let arg = tokens.next();
    if tokens.next().is_some() {
        return Err(FormatError::TooManyTokens.into());
    }
    if code.len() != 2 {
        return Err(FormatError::BadCode.into());
    }
    if arg.is_some_and(|a| a.len() > MAX_ARG_LEN) {
        return Err(FormatError::ArgumentTooLong.into());
    }

    match (code, arg) {
        ("00", Some("W")) => Ok(Command::NewGame(Color::White)),
        ("00", Some("B")) => Ok(Command::NewGame(Color::Black)),
        ("00", Some(_)) => Err(FormatError::BadColor.into()),
        ("00", None) | ("02", None) => Err(FormatError::MissingArgument.into()),
        ("01" | "03" | "04", Some(_)) => Err(FormatError::UnexpectedArgument.into()),
        ("01", None) => Ok(Command::ViewBoard),
        ("02", Some(arg)) => Ok(Command::Move(MoveSpec::parse(arg)?)),
        ("03", None) => Ok(Command::ComputerMove),
        ("04", None) => Ok(Command::Resign),
        (code, _) => Err(CommandError::UnknownCommand(code.to_string())),
    }
}

/// Cut the command line out of a raw write.
///
/// The command is everything before the last newline; a write without one
/// is rejected. Each non-ASCII byte becomes one `?`, so token lengths are
/// still counted in bytes.
pub fn frame(buf: &[u8]) -> Result<String, FormatError> {
    let end = buf
        .iter()
        .rposition(|&b| b == b'\n')
        .ok_or(FormatError::Unterminated)?;
    Ok(buf[..end]
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect())
}
