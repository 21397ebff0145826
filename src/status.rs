//! Game-status queries: checkmate, stalemate, and draw detection. Read-only
//! — the search never consults this (spec §4.5 treats stalemate and
//! checkmate identically, returning 0; this module is for callers above the
//! core that want the FIDE-accurate distinction).

use arrayvec::ArrayVec;

use crate::board::{Color, Piece, Position};
use crate::moves::execute::do_move;
use crate::moves::movegen::{generate_pseudo_legal, is_in_check};
use crate::moves::types::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InPlay,
    DrawFivefold,
    DrawSeventyFiveMove,
    DrawThreefold,
    DrawFiftyMove,
    DrawDeadPosition,
    Stalemate,
    Checkmate,
}

pub fn is_draw_by_threefold(pos: &Position) -> bool {
    pos.repetition_count() >= 3
}

pub fn is_draw_by_fifty_move(pos: &Position) -> bool {
    pos.halfmove_clock >= 100
}

pub fn is_fivefold(pos: &Position) -> bool {
    pos.repetition_count() >= 5
}

pub fn is_seventyfive_move(pos: &Position) -> bool {
    pos.halfmove_clock >= 150
}

/// K vs K, K vs KB, K vs KN, and KN vs KN / KB vs KN / KN vs KB: no sequence
/// of legal moves can force checkmate, so FIDE treats the position as an
/// automatic draw.
pub fn is_insufficient_material(pos: &Position) -> bool {
    let major_or_pawn = pos.bb(Color::White, Piece::Pawn)
        | pos.bb(Color::Black, Piece::Pawn)
        | pos.bb(Color::White, Piece::Rook)
        | pos.bb(Color::Black, Piece::Rook)
        | pos.bb(Color::White, Piece::Queen)
        | pos.bb(Color::Black, Piece::Queen);
    if major_or_pawn != 0 {
        return false;
    }

    let wb = pos.bb(Color::White, Piece::Bishop).count_ones();
    let wn = pos.bb(Color::White, Piece::Knight).count_ones();
    let bb = pos.bb(Color::Black, Piece::Bishop).count_ones();
    let bn = pos.bb(Color::Black, Piece::Knight).count_ones();

    let w_minors = wb + wn;
    let b_minors = bb + bn;
    let total_minors = w_minors + b_minors;

    match total_minors {
        0 | 1 => true,
        2 => {
            if wn == 2 || bn == 2 {
                true
            } else {
                w_minors == 1 && b_minors == 1
            }
        }
        _ => false,
    }
}

fn has_legal_move(pos: &Position) -> bool {
    let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
    generate_pseudo_legal(pos, &mut moves);
    let mover = pos.side_to_move;
    for mv in moves {
        let mut next = *pos;
        // A fresh ZobristKeys would perturb the hash but not the board
        // state this check inspects, so any keys work here.
        do_move(&mut next, &crate::hash::ZobristKeys::from_seed(0), mv);
        if !is_in_check(&next, mover) {
            return true;
        }
    }
    false
}

/// Priority (highest to lowest): fivefold, 75-move, dead position,
/// threefold, 50-move, then checkmate/stalemate/in-play.
pub fn position_status(pos: &Position) -> GameStatus {
    if is_fivefold(pos) {
        return GameStatus::DrawFivefold;
    }
    if is_seventyfive_move(pos) {
        return GameStatus::DrawSeventyFiveMove;
    }
    if is_insufficient_material(pos) {
        return GameStatus::DrawDeadPosition;
    }
    if is_draw_by_threefold(pos) {
        return GameStatus::DrawThreefold;
    }
    if is_draw_by_fifty_move(pos) {
        return GameStatus::DrawFiftyMove;
    }

    if has_legal_move(pos) {
        GameStatus::InPlay
    } else if is_in_check(pos, pos.side_to_move) {
        GameStatus::Checkmate
    } else {
        GameStatus::Stalemate
    }
}
