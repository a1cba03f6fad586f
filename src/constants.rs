//! Constants for board geometry, the fixed piece layout, and protocol limits.
//!
//! Piece records live in a fixed 32-slot table. Their indices are assigned once
//! when a game is set up and never change, so several rules (most notably "where
//! is the king") are answered by index arithmetic instead of searching.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board width and height.
pub const N: usize = 8;

/// Number of squares on the board.
pub const SQUARES: usize = N * N;

/// Total number of piece records in a game.
pub const PIECES: usize = 32;

/// Number of piece records owned by each color.
pub const PIECES_PER_SIDE: usize = 16;

// =============================================================================
// Fixed Piece Index Layout (white offsets; black adds `PIECES_PER_SIDE`)
// =============================================================================

/// First pawn index. Pawns occupy 0..8 in file order a..h.
pub const PAWN_BASE: usize = 0;

/// First rook index (queenside rook, then kingside rook).
pub const ROOK_BASE: usize = 8;

/// First knight index.
pub const KNIGHT_BASE: usize = 10;

/// First bishop index.
pub const BISHOP_BASE: usize = 12;

/// Queen index.
pub const QUEEN_INDEX: usize = 14;

/// King index.
pub const KING_INDEX: usize = 15;

// =============================================================================
// Ranks
// =============================================================================

/// Rank index white pawns start from.
pub const WHITE_PAWN_RANK: i8 = 1;

/// Rank index black pawns start from.
pub const BLACK_PAWN_RANK: i8 = 6;

/// Rank index a white pawn promotes on.
pub const WHITE_LAST_RANK: i8 = 7;

/// Rank index a black pawn promotes on.
pub const BLACK_LAST_RANK: i8 = 0;

// =============================================================================
// Generation and Protocol Limits
// =============================================================================

/// Upper bound on candidate destinations produced for one piece.
pub const MAX_CANDIDATES: usize = 32;

/// Longest argument accepted on the wire (a capture plus a promotion).
pub const MAX_ARG_LEN: usize = 13;

/// Capacity of a reply: a full board snapshot plus its newline.
pub const REPLY_CAPACITY: usize = 2 * SQUARES + 1;

/// Largest number of independent game instances a pool may hold.
pub const MAX_INSTANCES: usize = 4;

/// Default number of game instances.
pub const DEFAULT_INSTANCES: usize = 1;
