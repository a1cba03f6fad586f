//! Candidate move generation.
//!
//! [`generate`] lists the squares a piece could move to, looking only at
//! occupancy: it never asks whether the move would leave the mover's own king
//! attacked. That filter belongs to [`crate::rules`].
//!
//! The order candidates come out in is part of the engine's behaviour, since
//! the engine plays the first safe candidate it finds. Each kind therefore
//! walks its offsets in one fixed sequence.

use arrayvec::ArrayVec;

use crate::board::{Board, Kind, Piece, Square};
use crate::constants::MAX_CANDIDATES;

/// Bounded list of destination squares for one piece.
pub type Candidates = ArrayVec<Square, MAX_CANDIDATES>;

/// Knight jumps, vertical pairs first.
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-1, -2),
    (-1, 2),
    (1, 2),
    (1, -2),
    (2, -1),
    (2, 1),
    (-2, 1),
    (-2, -1),
];

/// King steps: along files, along ranks, then the diagonals.
const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

/// Rook rays: right, left, up, down.
const ROOK_RAYS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const BISHOP_RAYS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Generate candidate destinations for `piece` against the current board.
///
/// The board is only read. Off-board destinations are dropped here, so
/// callers never see one.
pub fn generate(board: &Board, piece: &Piece) -> Candidates {
    let mut out = Candidates::new();
    match piece.kind {
        Kind::Pawn => pawn_moves(board, piece, &mut out),
        Kind::Knight => step_moves(board, piece, &KNIGHT_OFFSETS, &mut out),
        Kind::Rook => ray_moves(board, piece, &ROOK_RAYS, &mut out),
        Kind::Bishop => ray_moves(board, piece, &BISHOP_RAYS, &mut out),
        Kind::Queen => {
            ray_moves(board, piece, &ROOK_RAYS, &mut out);
            ray_moves(board, piece, &BISHOP_RAYS, &mut out);
        }
        Kind::King => step_moves(board, piece, &KING_OFFSETS, &mut out),
    }
    out
}

/// Pawn pushes and diagonal captures.
///
/// The double step only looks at the landing square. A pawn standing on h1
/// generates nothing besides that double step.
fn pawn_moves(board: &Board, piece: &Piece, out: &mut Candidates) {
    let from = piece.square;
    let dir = piece.color.forward();

    if from.rank() == piece.color.pawn_rank() {
        if let Some(sq) = from.offset(0, 2 * dir) {
            if board.at(sq).is_none() {
                out.push(sq);
            }
        }
    }

    if from.file() == 7 && from.rank() == 0 {
        return;
    }

    if let Some(sq) = from.offset(0, dir) {
        if board.at(sq).is_none() {
            out.push(sq);
        }
    }
    for df in [-1, 1] {
        if let Some(sq) = from.offset(df, dir) {
            if board.occupant(sq).is_some_and(|p| p.color != piece.color) {
                out.push(sq);
            }
        }
    }
}

/// Single-step movers: keep on-board targets that are empty or hostile.
fn step_moves(board: &Board, piece: &Piece, offsets: &[(i8, i8)], out: &mut Candidates) {
    for &(df, dr) in offsets {
        let Some(sq) = piece.square.offset(df, dr) else {
            continue;
        };
        match board.occupant(sq) {
            Some(p) if p.color == piece.color => {}
            _ => out.push(sq),
        }
    }
}

/// Sliding movers: walk each ray until the edge or the first piece.
fn ray_moves(board: &Board, piece: &Piece, rays: &[(i8, i8)], out: &mut Candidates) {
    for &(df, dr) in rays {
        let mut cur = piece.square;
        while let Some(sq) = cur.offset(df, dr) {
            match board.occupant(sq) {
                None => out.push(sq),
                Some(p) => {
                    if p.color != piece.color {
                        out.push(sq);
                    }
                    break;
                }
            }
            cur = sq;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    fn names(c: &Candidates) -> Vec<String> {
        c.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pawn_home_rank() {
        let board = Board::new();
        let moves = generate(&board, board.piece(4));
        assert_eq!(names(&moves), ["e4", "e3"]);

        let moves = generate(&board, board.piece(20));
        assert_eq!(names(&moves), ["e5", "e6"]);
    }

    #[test]
    fn test_pawn_blocked_single_step() {
        let mut board = Board::new();
        board.place(30, sq("e3"));
        let moves = generate(&board, board.piece(4));
        // Only the landing square of the double step is looked at.
        assert_eq!(names(&moves), ["e4"]);
    }

    #[test]
    fn test_pawn_double_step_blocked() {
        let mut board = Board::new();
        board.place(30, sq("e4"));
        let moves = generate(&board, board.piece(4));
        assert_eq!(names(&moves), ["e3"]);
    }

    #[test]
    fn test_pawn_captures() {
        let mut board = Board::empty();
        board.place(3, sq("d4"));
        board.place(18, sq("c5"));
        board.place(20, sq("e5"));
        board.place(19, sq("d5"));
        let moves = generate(&board, board.piece(3));
        assert_eq!(names(&moves), ["c5", "e5"]);
    }

    #[test]
    fn test_pawn_does_not_capture_own() {
        let mut board = Board::empty();
        board.place(3, sq("d4"));
        board.place(4, sq("e5"));
        let moves = generate(&board, board.piece(3));
        assert_eq!(names(&moves), ["d5"]);
    }

    #[test]
    fn test_pawn_on_h1_is_stuck() {
        let mut board = Board::empty();
        board.place(23, sq("h1"));
        board.place(22, sq("g1"));
        assert!(generate(&board, board.piece(23)).is_empty());

        board.place(7, sq("h1"));
        // White pawn on h1 would step to h2, but h1 suppresses it.
        assert!(generate(&board, board.piece(7)).is_empty());
    }

    #[test]
    fn test_knight_offsets_in_order() {
        let board = Board::new();
        let moves = generate(&board, board.piece(10));
        assert_eq!(names(&moves), ["a3", "c3"]);

        let mut board = Board::empty();
        board.place(10, sq("d4"));
        let moves = generate(&board, board.piece(10));
        assert_eq!(
            names(&moves),
            ["c2", "c6", "e6", "e2", "f3", "f5", "b5", "b3"]
        );
    }

    #[test]
    fn test_rook_empty_board() {
        let mut board = Board::empty();
        board.place(8, sq("d4"));
        let moves = generate(&board, board.piece(8));
        assert_eq!(moves.len(), 14);
        assert_eq!(moves[0], sq("e4"));
        assert_eq!(moves[4], sq("c4"));
    }

    #[test]
    fn test_rook_stops_at_pieces() {
        let mut board = Board::empty();
        board.place(8, sq("a1"));
        board.place(0, sq("a3"));
        board.place(24, sq("d1"));
        let moves = generate(&board, board.piece(8));
        assert_eq!(names(&moves), ["b1", "c1", "d1", "a2"]);
    }

    #[test]
    fn test_bishop_and_queen() {
        let mut board = Board::empty();
        board.place(12, sq("a1"));
        assert_eq!(generate(&board, board.piece(12)).len(), 7);

        board.place(14, sq("d4"));
        let queen = generate(&board, board.piece(14));
        // The bishop on a1 blocks the queen's a1 diagonal.
        assert_eq!(queen.len(), 14 + 12);
        assert!(!queen.contains(&sq("a1")));
    }

    #[test]
    fn test_king_filters_own_pieces() {
        let board = Board::new();
        assert!(generate(&board, board.king(Color::White)).is_empty());

        let mut board = Board::empty();
        board.place(15, sq("a1"));
        board.place(31, sq("b2"));
        let moves = generate(&board, board.piece(15));
        assert_eq!(names(&moves), ["b1", "a2", "b2"]);
    }

    #[test]
    fn test_generation_does_not_mutate() {
        let board = Board::new();
        let before = board.clone();
        for p in board.pieces() {
            generate(&board, p);
        }
        assert_eq!(board, before);
    }
}
