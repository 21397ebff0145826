//! Perft: recursive leaf count used to validate move generation against
//! the published node counts (spec §8). Grounded on the copy/restore
//! recursive counter in the upstream source's search driver.

use crate::board::Position;
use crate::hash::ZobristKeys;
use arrayvec::ArrayVec;

use super::execute::do_move;
use super::movegen::{generate_pseudo_legal, is_in_check};
use super::types::Move;

pub fn perft(pos: &Position, keys: &ZobristKeys, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
    generate_pseudo_legal(pos, &mut moves);

    let mover = pos.side_to_move;
    let mut nodes = 0u64;
    for mv in moves {
        let mut next = *pos;
        do_move(&mut next, keys, mv);
        if is_in_check(&next, mover) {
            continue;
        }
        nodes += perft(&next, keys, depth - 1);
    }
    nodes
}
