//! `do_move`: apply one pseudo-legal move to a position in place.
//!
//! Unmake is not implemented here — per spec §9 ("deep-copy-as-unmake"),
//! callers value-copy the `Position` before calling `do_move` and restore the
//! copy afterward. `Position` is `Copy` for exactly this reason.

use arrayvec::ArrayVec;

use crate::board::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, NO_EP_FILE, Piece, Position};
use crate::hash::ZobristKeys;
use crate::square::Square;

use super::movegen::{generate_pseudo_legal, is_in_check};
use super::types::Move;

/// External boundary entry point (spec §7 "Illegal-move request from
/// outside"). Applies `mv` if and only if it is in the current legal-move
/// list; otherwise it is a no-op that returns `false`. Internal `do_move`
/// never re-validates — this is the only validating call site.
pub fn apply_move(pos: &mut Position, keys: &ZobristKeys, mv: Move) -> bool {
    let mover = pos.side_to_move;
    let mut candidates: ArrayVec<Move, 256> = ArrayVec::new();
    generate_pseudo_legal(pos, &mut candidates);

    let legal = candidates.iter().any(|&candidate| {
        if candidate != mv {
            return false;
        }
        let mut next = *pos;
        do_move(&mut next, keys, candidate);
        !is_in_check(&next, mover)
    });

    if !legal {
        return false;
    }

    do_move(pos, keys, mv);
    true
}

/// Apply `mv` to `pos`. `mv` is assumed pseudo-legal for `pos`; this function
/// does not re-validate (spec §4.3/§7: internal `do_move` does not
/// re-validate, the caller's legality filter does).
pub fn do_move(pos: &mut Position, keys: &ZobristKeys, mv: Move) {
    let mover = pos.side_to_move;
    let opponent = !mover;

    // Step 1: clear both sides' en-passant slots, XOR-ing out whichever was live.
    for color in [Color::White, Color::Black] {
        let slot = &mut pos.ep_file[color as usize];
        if *slot != NO_EP_FILE {
            pos.zobrist ^= keys.ep_file[*slot as usize];
            *slot = NO_EP_FILE;
        }
    }

    let is_pawn_move = mv.piece == Piece::Pawn;
    let mut is_capture = false;

    // Step 2: captures.
    if mv.is_en_passant() {
        let captured_sq = match mover {
            Color::White => Square::new(mv.to.file(), mv.to.rank() - 1),
            Color::Black => Square::new(mv.to.file(), mv.to.rank() + 1),
        };
        pos.remove_piece(keys, opponent, Piece::Pawn, captured_sq);
        is_capture = true;
    } else if let Some((cap_color, cap_piece)) = pos.piece_at(mv.to) {
        debug_assert_eq!(cap_color, opponent);
        pos.remove_piece(keys, opponent, cap_piece, mv.to);
        is_capture = true;
    }

    // Step 3: move the piece.
    pos.remove_piece(keys, mover, mv.piece, mv.from);
    pos.place_piece(keys, mover, mv.piece, mv.to);

    // Step 4: promotion.
    if let Some(promotion) = mv.promotion {
        pos.remove_piece(keys, mover, Piece::Pawn, mv.to);
        pos.place_piece(keys, mover, promotion, mv.to);
    }

    // Step 5: double pawn push opens an en-passant slot for the mover.
    if mv.is_double_pawn_push() {
        let file = mv.from.file();
        pos.ep_file[mover as usize] = file;
        pos.zobrist ^= keys.ep_file[file as usize];
    }

    // Step 6: castling relocates the rook.
    if mv.is_castling() {
        let home_rank = mv.from.rank();
        let (rook_from, rook_to) = if mv.is_kingside_castle() {
            (Square::new(7, home_rank), Square::new(5, home_rank))
        } else {
            (Square::new(0, home_rank), Square::new(3, home_rank))
        };
        pos.remove_piece(keys, mover, Piece::Rook, rook_from);
        pos.place_piece(keys, mover, Piece::Rook, rook_to);
    }

    // Step 7: castling-rights clearing. King leaving home clears both of its
    // rights; a rook leaving (or being captured on) its home corner clears
    // the single corresponding right. Checked against the correct side's
    // bits only — the upstream source has a variant that cross-wires this
    // (black rook moves clearing white's rights); that bug is not
    // reproduced here.
    let old_rights = pos.castling_rights;
    let mut new_rights = old_rights;
    if mv.piece == Piece::King {
        match mover {
            Color::White => new_rights &= !(CASTLE_WK | CASTLE_WQ),
            Color::Black => new_rights &= !(CASTLE_BK | CASTLE_BQ),
        }
    }
    clear_right_if_corner_touched(&mut new_rights, mv.from);
    clear_right_if_corner_touched(&mut new_rights, mv.to);
    if new_rights != old_rights {
        xor_castling_delta(pos, keys, old_rights, new_rights);
        pos.castling_rights = new_rights;
    }

    // Step 8: occupancy caches are already kept current incrementally by
    // place_piece/remove_piece.

    // Step 9: flip side to move.
    pos.side_to_move = opponent;
    pos.zobrist ^= keys.side_to_move;

    // Step 10: repetition history.
    if is_pawn_move || is_capture {
        pos.repetition_history.clear();
        pos.halfmove_clock = 0;
    } else {
        if pos.repetition_history.is_full() {
            pos.repetition_history.remove(0);
        }
        pos.repetition_history.push(pos.zobrist);
        pos.halfmove_clock = pos.halfmove_clock.saturating_add(1);
    }
}

fn clear_right_if_corner_touched(rights: &mut u8, sq: Square) {
    match (sq.file(), sq.rank()) {
        (0, 0) => *rights &= !CASTLE_WQ,
        (7, 0) => *rights &= !CASTLE_WK,
        (0, 7) => *rights &= !CASTLE_BQ,
        (7, 7) => *rights &= !CASTLE_BK,
        _ => {}
    }
}

fn xor_castling_delta(pos: &mut Position, keys: &ZobristKeys, old: u8, new: u8) {
    let delta = old ^ new;
    if delta & CASTLE_WK != 0 {
        pos.zobrist ^= keys.castling[0];
    }
    if delta & CASTLE_WQ != 0 {
        pos.zobrist ^= keys.castling[1];
    }
    if delta & CASTLE_BK != 0 {
        pos.zobrist ^= keys.castling[2];
    }
    if delta & CASTLE_BQ != 0 {
        pos.zobrist ^= keys.castling[3];
    }
}
