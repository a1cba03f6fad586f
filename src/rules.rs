//! Move legality: tentative application, validation, check and mate tests.
//!
//! Every legality question that depends on king safety is answered the same
//! way: apply the move on the real board, ask [`in_check`], and undo it with
//! the [`Undo`] record if the answer is unwanted. Nothing here copies the
//! board.

use std::fmt;

use crate::board::{Board, Color, Kind, Square};
use crate::movegen::generate;

/// Reason a requested move was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllegalMove {
    /// The named piece is not standing on the named square.
    NoSuchPiece,
    /// The destination is not among the piece's candidates.
    Unreachable,
    /// A capture happens but was not declared, or names the wrong kind.
    CaptureMismatch,
    /// A pawn reaches its last rank without a promotion declaration.
    PromotionMissing,
    /// The promotion declaration does not fit the move.
    BadPromotion,
    /// The move would leave the mover's own king attacked.
    SelfCheck,
}

impl fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalMove::NoSuchPiece => write!(f, "no such piece on the source square"),
            IllegalMove::Unreachable => write!(f, "piece cannot reach the destination"),
            IllegalMove::CaptureMismatch => write!(f, "capture not declared or wrong kind"),
            IllegalMove::PromotionMissing => write!(f, "promotion required"),
            IllegalMove::BadPromotion => write!(f, "invalid promotion"),
            IllegalMove::SelfCheck => write!(f, "move leaves own king in check"),
        }
    }
}

/// A move as claimed by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub color: Color,
    pub kind: Kind,
    pub from: Square,
    pub to: Square,
    /// Kind of the piece the player says is being taken.
    pub capture: Option<Kind>,
    /// Kind the player wants the pawn to become.
    pub promotion: Option<Kind>,
}

/// A move made by the engine's search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ply {
    pub index: usize,
    pub from: Square,
    pub to: Square,
}

/// Everything needed to take back one tentatively applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    index: usize,
    from: Square,
    captured: Option<usize>,
    promoted: bool,
}

/// Apply a move to the board and return its undo record.
///
/// `to` must be one of the piece's generated candidates, so any occupant is
/// hostile. A `promotion` kind replaces the moving piece's kind.
pub fn make_move(board: &mut Board, index: usize, to: Square, promotion: Option<Kind>) -> Undo {
    let from = board.piece(index).square;
    let captured = board.at(to);
    if let Some(victim) = captured {
        board.remove(victim);
    }
    if let Some(kind) = promotion {
        board.set_kind(index, kind);
    }
    board.relocate(index, to);
    Undo {
        index,
        from,
        captured,
        promoted: promotion.is_some(),
    }
}

/// Restore the board to exactly what it was before [`make_move`].
pub fn unmake_move(board: &mut Board, undo: Undo) {
    board.relocate(undo.index, undo.from);
    if undo.promoted {
        board.set_kind(undo.index, Kind::Pawn);
    }
    if let Some(victim) = undo.captured {
        board.revive(victim);
    }
}

/// Whether `color`'s king stands on a square some live enemy piece can reach.
pub fn in_check(board: &Board, color: Color) -> bool {
    let king = board.king(color).square;
    Board::side(color.opponent()).any(|i| {
        let p = board.piece(i);
        p.alive && generate(board, p).contains(&king)
    })
}

/// Whether `index` is a pawn landing on its last rank at `to`.
fn reaches_last_rank(board: &Board, index: usize, to: Square) -> bool {
    let p = board.piece(index);
    p.kind == Kind::Pawn && to.rank() == p.color.last_rank()
}

/// Check a player's move and, if it is legal, play it.
///
/// On any refusal the board is left untouched.
pub fn validate(board: &mut Board, req: &MoveRequest) -> Result<(), IllegalMove> {
    let index = board.at(req.from).ok_or(IllegalMove::NoSuchPiece)?;
    let piece = *board.piece(index);
    if piece.color != req.color || piece.kind != req.kind || !piece.alive {
        return Err(IllegalMove::NoSuchPiece);
    }

    if let Some(kind) = req.promotion {
        let to_rank = req.color.last_rank();
        let from_rank = to_rank - req.color.forward();
        if req.kind != Kind::Pawn
            || matches!(kind, Kind::Pawn | Kind::King)
            || req.from.rank() != from_rank
            || req.to.rank() != to_rank
        {
            return Err(IllegalMove::BadPromotion);
        }
    }

    if !generate(board, &piece).contains(&req.to) {
        return Err(IllegalMove::Unreachable);
    }

    if let Some(victim) = board.occupant(req.to) {
        if victim.color != piece.color && req.capture != Some(victim.kind) {
            return Err(IllegalMove::CaptureMismatch);
        }
    }

    let promotion = if reaches_last_rank(board, index, req.to) {
        Some(req.promotion.ok_or(IllegalMove::PromotionMissing)?)
    } else {
        None
    };

    let undo = make_move(board, index, req.to, promotion);
    if in_check(board, req.color) {
        unmake_move(board, undo);
        return Err(IllegalMove::SelfCheck);
    }
    Ok(())
}

/// Find `color`'s first move that does not leave its own king attacked.
///
/// Pieces are tried in table order and each piece's candidates in generation
/// order; pawns reaching the last rank become queens. With `commit` the move
/// found stays on the board, otherwise it is taken back and this is only an
/// existence test. `None` means `color` has no legal move at all.
pub fn search_move(board: &mut Board, color: Color, commit: bool) -> Option<Ply> {
    for index in Board::side(color) {
        let piece = *board.piece(index);
        if !piece.alive {
            continue;
        }
        for to in generate(board, &piece) {
            let promotion = reaches_last_rank(board, index, to).then_some(Kind::Queen);
            let undo = make_move(board, index, to, promotion);
            let safe = !in_check(board, color);
            if !safe || !commit {
                unmake_move(board, undo);
            }
            if safe {
                return Some(Ply {
                    index,
                    from: piece.square,
                    to,
                });
            }
        }
    }
    None
}

/// Every move `color` could legally make, in search order.
pub fn legal_moves(board: &mut Board, color: Color) -> Vec<Ply> {
    let mut out = Vec::new();
    for index in Board::side(color) {
        let piece = *board.piece(index);
        if !piece.alive {
            continue;
        }
        for to in generate(board, &piece) {
            let promotion = reaches_last_rank(board, index, to).then_some(Kind::Queen);
            let undo = make_move(board, index, to, promotion);
            if !in_check(board, color) {
                out.push(Ply {
                    index,
                    from: piece.square,
                    to,
                });
            }
            unmake_move(board, undo);
        }
    }
    out
}
