//! Check-filter behavior: a pseudo-legal move that leaves the mover's own
//! king in check must be excluded from the legal move list, exactly as
//! `moves::execute::apply_move` and the search's do-move-then-check-filter
//! loop both rely on.

use arrayvec::ArrayVec;

use vantage_core::hash::ZobristKeys;
use vantage_core::moves::execute::do_move;
use vantage_core::moves::movegen::{generate_pseudo_legal, is_in_check};
use vantage_core::moves::types::Move;
use vantage_core::{Color, Position, Square};

fn keys() -> ZobristKeys {
    ZobristKeys::from_seed(101)
}

fn legal_moves(pos: &Position) -> Vec<Move> {
    let k = keys();
    let mut candidates: ArrayVec<Move, 256> = ArrayVec::new();
    generate_pseudo_legal(pos, &mut candidates);
    let mover = pos.side_to_move;
    candidates
        .into_iter()
        .filter(|&mv| {
            let mut next = *pos;
            do_move(&mut next, &k, mv);
            !is_in_check(&next, mover)
        })
        .collect()
}

fn has_move(moves: &[Move], from: &str, to: &str) -> bool {
    let f = Square::try_from_algebraic(from).unwrap();
    let t = Square::try_from_algebraic(to).unwrap();
    moves.iter().any(|m| m.from == f && m.to == t)
}

#[test]
fn self_check_is_filtered_out() {
    // White Ke1, Re2; black Re8. Moving Re2->f2 exposes the e-file -> illegal.
    let pos = Position::from_fen(&keys(), "4r3/8/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
    let legal = legal_moves(&pos);
    assert!(!has_move(&legal, "e2", "f2"), "e2f2 should be filtered (self-check)");
    assert!(has_move(&legal, "e2", "e3"), "e2e3 blocks the file and stays legal");
}

#[test]
fn checking_moves_are_kept() {
    let pos = Position::from_fen(&keys(), "4k3/4n3/8/8/8/8/8/4R2K w - - 0 1").unwrap();
    let legal = legal_moves(&pos);
    assert!(has_move(&legal, "e1", "e7"), "e1xe7+ is a legal capture, not a self-check");
}

#[test]
fn king_cannot_capture_a_defended_piece() {
    // Black king on e8, white rook on e7 defended by the white king on e6.
    // Kxe7 would leave the black king in check from the white king.
    let pos = Position::from_fen(&keys(), "4k3/4R3/4K3/8/8/8/8/8 b - - 0 1").unwrap();
    let legal = legal_moves(&pos);
    assert!(!has_move(&legal, "e8", "e7"));
}

#[test]
fn pinned_piece_may_only_move_along_the_pin_line() {
    // White Ke1, Re1-file blocked by... set up a classic pin: white king e1,
    // white bishop e2 pinned by a black rook on e8 against the king.
    let pos = Position::from_fen(&keys(), "4r3/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
    let legal = legal_moves(&pos);
    // The bishop is pinned on the e-file; it has no legal diagonal moves.
    assert!(!has_move(&legal, "e2", "d3"));
    assert!(!has_move(&legal, "e2", "f3"));
}

#[test]
fn checkmate_position_has_no_legal_moves() {
    let pos = Position::from_fen(&keys(), "6k1/8/6K1/8/8/8/8/R7 w - - 0 1").unwrap();
    let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
    generate_pseudo_legal(&pos, &mut moves);
    let mv = moves.into_iter().find(|m| m.to_uci() == "a1a8").unwrap();
    let mut after = pos;
    do_move(&mut after, &keys(), mv);
    assert_eq!(after.side_to_move, Color::Black);
    assert!(legal_moves(&after).is_empty());
}
