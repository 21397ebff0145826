//! Integration coverage for the transposition table's interaction with
//! search: entries are actually produced and reused across probes of the
//! same position reached by different move orders (transposition), plus
//! the XOR-tagging scheme's concurrent-writer safety (spec §8 scenario 6).

use std::thread;

use vantage_core::hash::ZobristKeys;
use vantage_core::moves::execute::do_move;
use vantage_core::moves::movegen::generate_pseudo_legal;
use vantage_core::moves::types::Move;
use vantage_core::search::{search_fixed_depth, NodeType, TranspositionTable};
use vantage_core::Position;
use arrayvec::ArrayVec;

fn keys() -> ZobristKeys {
    ZobristKeys::from_seed(505)
}

fn play(pos: &mut Position, k: &ZobristKeys, uci: &str) {
    let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
    generate_pseudo_legal(pos, &mut moves);
    let mv = moves.into_iter().find(|m| m.to_uci() == uci).unwrap();
    do_move(pos, k, mv);
}

#[test]
fn search_populates_the_transposition_table() {
    let k = keys();
    let tt = TranspositionTable::new(4096);
    let pos = Position::startpos(&k);
    assert!(search_fixed_depth(&pos, &k, &tt, 3).is_some());
    assert!(tt.probe(pos.zobrist).is_some(), "root position should be stored after a search");
}

#[test]
fn transposed_move_orders_reach_the_same_zobrist_key() {
    let k = keys();
    let mut via_knights_first = Position::startpos(&k);
    play(&mut via_knights_first, &k, "g1f3");
    play(&mut via_knights_first, &k, "g8f6");
    play(&mut via_knights_first, &k, "b1c3");
    play(&mut via_knights_first, &k, "b8c6");

    let mut via_other_order = Position::startpos(&k);
    play(&mut via_other_order, &k, "b1c3");
    play(&mut via_other_order, &k, "b8c6");
    play(&mut via_other_order, &k, "g1f3");
    play(&mut via_other_order, &k, "g8f6");

    assert_eq!(via_knights_first.zobrist, via_other_order.zobrist);

    let tt = TranspositionTable::new(4096);
    assert!(search_fixed_depth(&via_knights_first, &k, &tt, 2).is_some());
    let reused = tt.probe(via_other_order.zobrist);
    assert!(reused.is_some(), "a transposed position should hit the same TT slot");
}

#[test]
fn stored_entries_decode_to_a_resolvable_node_type() {
    let tt = TranspositionTable::new(1024);
    tt.store(777, 4, 6, 250, NodeType::Exact, 1);
    let entry = tt.probe(777).unwrap();
    assert_eq!(entry.node_type, NodeType::Exact);
    assert_eq!(entry.score, 250);
}

#[test]
fn concurrent_writers_to_a_colliding_slot_never_produce_a_torn_read() {
    // Capacity 1 forces every key onto the same slot, so the two writer
    // threads below hammer one (key, data) atomic pair concurrently while a
    // third thread probes it. A torn read would show up as a payload that
    // decodes but does not match either writer's known-good fields; the
    // XOR tag instead makes a torn key^data combination miss outright
    // (`probe` returns `None`), which is the safe outcome.
    let tt = TranspositionTable::new(1);
    const ZOBRIST_A: u64 = 0xA5A5_A5A5_A5A5_A5A5;
    const ZOBRIST_B: u64 = 0x5A5A_5A5A_5A5A_5A5A;
    const ITERS: usize = 20_000;

    thread::scope(|scope| {
        scope.spawn(|| {
            for age in 0..ITERS {
                tt.store(ZOBRIST_A, 1, 5, 111, NodeType::Exact, (age % 256) as u8);
            }
        });
        scope.spawn(|| {
            for age in 0..ITERS {
                tt.store(ZOBRIST_B, 2, 5, -222, NodeType::Lower, (age % 256) as u8);
            }
        });
        scope.spawn(|| {
            for _ in 0..ITERS {
                if let Some(entry) = tt.probe(ZOBRIST_A) {
                    assert_eq!(entry.best_move_index, 1);
                    assert_eq!(entry.score, 111);
                    assert_eq!(entry.node_type, NodeType::Exact);
                }
                if let Some(entry) = tt.probe(ZOBRIST_B) {
                    assert_eq!(entry.best_move_index, 2);
                    assert_eq!(entry.score, -222);
                    assert_eq!(entry.node_type, NodeType::Lower);
                }
            }
        });
    });
}
