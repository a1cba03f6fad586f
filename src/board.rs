//! Board and piece model.
//!
//! A [`Board`] keeps two views of the same state: a 64-slot occupancy grid and
//! the table of 32 piece records. Slot `rank * 8 + file` holds index `i` exactly
//! when piece `i` is alive and stands on that square. Every mutation goes
//! through the methods here so both views always change together.

use std::fmt;

use crate::constants::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// First index of this color's records in the piece table.
    pub fn base(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => PIECES_PER_SIDE,
        }
    }

    /// Rank direction pawns of this color advance in.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn pawn_rank(self) -> i8 {
        match self {
            Color::White => WHITE_PAWN_RANK,
            Color::Black => BLACK_PAWN_RANK,
        }
    }

    pub fn last_rank(self) -> i8 {
        match self {
            Color::White => WHITE_LAST_RANK,
            Color::Black => BLACK_LAST_RANK,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }

    pub fn from_letter(c: u8) -> Option<Color> {
        match c {
            b'W' => Some(Color::White),
            b'B' => Some(Color::Black),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl Kind {
    pub fn letter(self) -> char {
        match self {
            Kind::Pawn => 'P',
            Kind::Rook => 'R',
            Kind::Knight => 'N',
            Kind::Bishop => 'B',
            Kind::Queen => 'Q',
            Kind::King => 'K',
        }
    }

    pub fn from_letter(c: u8) -> Option<Kind> {
        match c {
            b'P' => Some(Kind::Pawn),
            b'R' => Some(Kind::Rook),
            b'N' => Some(Kind::Knight),
            b'B' => Some(Kind::Bishop),
            b'Q' => Some(Kind::Queen),
            b'K' => Some(Kind::King),
            _ => None,
        }
    }
}

/// An on-board square. Off-board coordinates cannot be represented.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    file: i8,
    rank: i8,
}

impl Square {
    /// Returns `None` when either component falls outside `0..8`.
    #[inline]
    pub fn new(file: i8, rank: i8) -> Option<Square> {
        let range = 0..N as i8;
        if range.contains(&file) && range.contains(&rank) {
            Some(Square { file, rank })
        } else {
            None
        }
    }

    /// The square `(df, dr)` away, if it is still on the board.
    #[inline]
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        Square::new(self.file + df, self.rank + dr)
    }

    #[inline]
    pub fn file(self) -> i8 {
        self.file
    }

    #[inline]
    pub fn rank(self) -> i8 {
        self.rank
    }

    /// Grid slot of this square.
    #[inline]
    pub fn index(self) -> usize {
        self.rank as usize * N + self.file as usize
    }

    /// Parse a file letter and rank digit, e.g. `b'e', b'4'`.
    pub fn from_chars(file: u8, rank: u8) -> Option<Square> {
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return None;
        }
        Square::new((file - b'a') as i8, (rank - b'1') as i8)
    }

    /// Parse a two-character name such as `"e4"`.
    pub fn parse(s: &str) -> Option<Square> {
        match s.as_bytes() {
            [f, r] => Square::from_chars(*f, *r),
            _ => None,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file as u8) as char, self.rank + 1)
    }
}

/// A piece record. Dead pieces keep their last square and kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: Kind,
    pub color: Color,
    pub alive: bool,
    pub square: Square,
}

/// Back-rank layout for white: (index, kind, file). Black mirrors it on rank 8.
const BACK_RANK: [(usize, Kind, i8); 8] = [
    (ROOK_BASE, Kind::Rook, 0),
    (ROOK_BASE + 1, Kind::Rook, 7),
    (KNIGHT_BASE, Kind::Knight, 1),
    (KNIGHT_BASE + 1, Kind::Knight, 6),
    (BISHOP_BASE, Kind::Bishop, 2),
    (BISHOP_BASE + 1, Kind::Bishop, 5),
    (QUEEN_INDEX, Kind::Queen, 3),
    (KING_INDEX, Kind::King, 4),
];

/// Game board: occupancy grid plus the fixed table of piece records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    grid: [Option<u8>; SQUARES],
    pieces: [Piece; PIECES],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for i in 0..PIECES {
            let sq = board.pieces[i].square;
            board.place(i, sq);
        }
        board
    }

    /// A board with every piece record in its home slot but dead.
    ///
    /// Indices, kinds and colors follow the fixed layout; [`Board::place`]
    /// brings individual pieces onto the board for hand-built positions.
    pub fn empty() -> Self {
        let dead = |kind, color, file, rank| Piece {
            kind,
            color,
            alive: false,
            square: Square { file, rank },
        };
        let mut pieces = [dead(Kind::Pawn, Color::White, 0, 0); PIECES];
        for color in [Color::White, Color::Black] {
            let base = color.base();
            let (pawn_rank, back_rank) = match color {
                Color::White => (WHITE_PAWN_RANK, 0),
                Color::Black => (BLACK_PAWN_RANK, N as i8 - 1),
            };
            for file in 0..N as i8 {
                pieces[base + PAWN_BASE + file as usize] = dead(Kind::Pawn, color, file, pawn_rank);
            }
            for (index, kind, file) in BACK_RANK {
                pieces[base + index] = dead(kind, color, file, back_rank);
            }
        }
        Board {
            grid: [None; SQUARES],
            pieces,
        }
    }

    /// Put piece `index` alive on `square`.
    ///
    /// Any other piece already standing there is removed from play, and the
    /// piece's previous square is vacated if it was alive.
    pub fn place(&mut self, index: usize, square: Square) {
        if let Some(other) = self.grid[square.index()] {
            self.pieces[other as usize].alive = false;
        }
        let piece = &mut self.pieces[index];
        if piece.alive {
            self.grid[piece.square.index()] = None;
        }
        piece.alive = true;
        piece.square = square;
        self.grid[square.index()] = Some(index as u8);
    }

    /// Index of the piece standing on `square`.
    #[inline]
    pub fn at(&self, square: Square) -> Option<usize> {
        self.grid[square.index()].map(usize::from)
    }

    /// The piece standing on `square`.
    #[inline]
    pub fn occupant(&self, square: Square) -> Option<&Piece> {
        self.at(square).map(|i| &self.pieces[i])
    }

    #[inline]
    pub fn piece(&self, index: usize) -> &Piece {
        &self.pieces[index]
    }

    pub fn pieces(&self) -> &[Piece; PIECES] {
        &self.pieces
    }

    /// Record of `color`'s king, which always lives at a fixed index.
    #[inline]
    pub fn king(&self, color: Color) -> &Piece {
        &self.pieces[color.base() + KING_INDEX]
    }

    /// Indices of `color`'s 16 records in table order.
    pub fn side(color: Color) -> std::ops::Range<usize> {
        let base = color.base();
        base..base + PIECES_PER_SIDE
    }

    // -------------------------------------------------------------------------
    // Raw mutations used by the move transaction in `rules`.
    // -------------------------------------------------------------------------

    /// Move piece `index` to `to`, vacating its current square.
    ///
    /// The destination slot must be empty or hold a piece that has already
    /// been taken out of play.
    pub(crate) fn relocate(&mut self, index: usize, to: Square) {
        let from = self.pieces[index].square;
        if self.grid[from.index()] == Some(index as u8) {
            self.grid[from.index()] = None;
        }
        self.pieces[index].square = to;
        self.grid[to.index()] = Some(index as u8);
    }

    /// Take piece `index` out of play. Its record keeps its last square.
    pub(crate) fn remove(&mut self, index: usize) {
        let sq = self.pieces[index].square;
        if self.grid[sq.index()] == Some(index as u8) {
            self.grid[sq.index()] = None;
        }
        self.pieces[index].alive = false;
    }

    /// Bring piece `index` back onto its recorded square.
    pub(crate) fn revive(&mut self, index: usize) {
        let sq = self.pieces[index].square;
        self.pieces[index].alive = true;
        self.grid[sq.index()] = Some(index as u8);
    }

    pub(crate) fn set_kind(&mut self, index: usize, kind: Kind) {
        self.pieces[index].kind = kind;
    }

    /// Check that the grid and the piece table agree.
    pub fn is_consistent(&self) -> bool {
        let grid_ok = self.grid.iter().enumerate().all(|(slot, cell)| match cell {
            Some(i) => {
                let p = &self.pieces[*i as usize];
                p.alive && p.square.index() == slot
            }
            None => true,
        });
        let pieces_ok = self
            .pieces
            .iter()
            .enumerate()
            .filter(|(_, p)| p.alive)
            .all(|(i, p)| self.grid[p.square.index()] == Some(i as u8));
        grid_ok && pieces_ok
    }

    /// Wire snapshot: 64 two-character cells, rank-major from a1, then `\n`.
    pub fn snapshot(&self) -> String {
        let mut out = String::with_capacity(REPLY_CAPACITY);
        for cell in &self.grid {
            match cell {
                Some(i) => {
                    let p = &self.pieces[*i as usize];
                    out.push(p.color.letter());
                    out.push(p.kind.letter());
                }
                None => out.push_str("**"),
            }
        }
        out.push('\n');
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..N as i8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..N as i8 {
                let sq = Square { file, rank };
                match self.occupant(sq) {
                    Some(p) => {
                        let ch = match p.color {
                            Color::White => p.kind.letter(),
                            Color::Black => p.kind.letter().to_ascii_lowercase(),
                        };
                        write!(f, "{ch} ")?;
                    }
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    #[test]
    fn test_square_bounds() {
        assert!(Square::new(0, 0).is_some());
        assert!(Square::new(7, 7).is_some());
        assert!(Square::new(-1, 3).is_none());
        assert!(Square::new(3, 8).is_none());
        assert_eq!(sq("h8").offset(1, 0), None);
        assert_eq!(sq("a1").offset(1, 2), Some(sq("b3")));
    }

    #[test]
    fn test_square_names() {
        assert_eq!(sq("e4").file(), 4);
        assert_eq!(sq("e4").rank(), 3);
        assert_eq!(sq("e4").index(), 28);
        assert_eq!(sq("e4").to_string(), "e4");
        assert_eq!(Square::parse("i1"), None);
        assert_eq!(Square::parse("a9"), None);
        assert_eq!(Square::parse("a"), None);
    }

    #[test]
    fn test_starting_layout() {
        let board = Board::new();
        assert!(board.is_consistent());

        assert_eq!(board.at(sq("e1")), Some(15));
        assert_eq!(board.at(sq("e8")), Some(31));
        assert_eq!(board.at(sq("a1")), Some(8));
        assert_eq!(board.at(sq("h1")), Some(9));
        assert_eq!(board.at(sq("b8")), Some(26));
        assert_eq!(board.at(sq("d8")), Some(30));
        assert_eq!(board.at(sq("c2")), Some(2));
        assert_eq!(board.at(sq("c7")), Some(18));
        assert_eq!(board.at(sq("e4")), None);

        assert_eq!(board.king(Color::White).square, sq("e1"));
        assert_eq!(board.king(Color::Black).kind, Kind::King);
        assert!(board.pieces().iter().all(|p| p.alive));
    }

    #[test]
    fn test_snapshot_format() {
        let snap = Board::new().snapshot();
        assert_eq!(snap.len(), 129);
        assert!(snap.starts_with("WRWNWBWQWKWBWNWR"));
        assert!(snap.ends_with("BRBNBBBQBKBBBNBR\n"));
        assert_eq!(&snap[32..34], "**");
    }

    #[test]
    fn test_empty_board_keeps_layout() {
        let board = Board::empty();
        assert!(board.is_consistent());
        assert!(board.pieces().iter().all(|p| !p.alive));
        assert_eq!(board.piece(15).kind, Kind::King);
        assert_eq!(board.piece(16).color, Color::Black);
        assert_eq!(board.snapshot(), format!("{}\n", "*".repeat(128)));
    }

    #[test]
    fn test_place_replaces_occupant() {
        let mut board = Board::empty();
        board.place(14, sq("d4"));
        board.place(30, sq("d4"));
        assert!(!board.piece(14).alive);
        assert_eq!(board.at(sq("d4")), Some(30));
        board.place(30, sq("d5"));
        assert_eq!(board.at(sq("d4")), None);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_remove_and_revive() {
        let mut board = Board::new();
        board.remove(4);
        assert_eq!(board.at(sq("e2")), None);
        assert!(board.is_consistent());
        board.revive(4);
        assert_eq!(board, Board::new());
    }
}
