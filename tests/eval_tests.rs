//! Integration coverage for tapered evaluation (spec §4.4): mirror symmetry
//! across colors and the expected sign/magnitude of material imbalances.

use vantage_core::hash::ZobristKeys;
use vantage_core::search::evaluate;
use vantage_core::Position;

fn keys() -> ZobristKeys {
    ZobristKeys::from_seed(707)
}

#[test]
fn startpos_evaluates_to_exactly_zero() {
    let pos = Position::startpos(&keys());
    assert_eq!(evaluate(&pos), 0);
}

#[test]
fn a_mirrored_position_with_the_other_side_to_move_negates() {
    let k = keys();
    let white_up_a_rook = Position::from_fen(&k, "4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
    let black_up_a_rook = Position::from_fen(&k, "r3k3/8/8/8/8/8/8/4K3 b q - 0 1").unwrap();
    assert_eq!(evaluate(&white_up_a_rook), -evaluate(&black_up_a_rook));
}

#[test]
fn being_up_a_queen_is_a_large_positive_score() {
    let pos = Position::from_fen(&keys(), "4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
    assert!(evaluate(&pos) > 800);
}

#[test]
fn being_down_a_queen_is_a_large_negative_score() {
    let pos = Position::from_fen(&keys(), "q3k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    assert!(evaluate(&pos) < -800);
}

#[test]
fn bare_kings_evaluate_to_zero() {
    let pos = Position::from_fen(&keys(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    assert_eq!(evaluate(&pos), 0);
}
