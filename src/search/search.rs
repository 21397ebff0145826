//! Negamax alpha-beta search with a quiescence extension and iterative
//! deepening (spec §4.5). Grounded on the upstream `negaMax`/`Search`
//! recursion, extended with the transposition table and the time-out flag
//! the upstream source does not have.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use arrayvec::ArrayVec;

use crate::board::Position;
use crate::hash::ZobristKeys;
use crate::moves::execute::do_move;
use crate::moves::movegen::{generate_captures, generate_pseudo_legal, is_in_check};
use crate::moves::types::Move;

use super::eval::evaluate;
use super::tt::{NodeType, TranspositionTable};

const MAX_PLY_MOVES: usize = 256;

/// Shared, read-only-after-construction context threaded through every node
/// of one top-level search call.
pub struct SearchContext<'a> {
    pub keys: &'a ZobristKeys,
    pub tt: &'a TranspositionTable,
    pub stop: &'a AtomicBool,
}

/// Quiescence search: stand-pat, then extend through captures only
/// (spec §4.5 "Quiescence"). No TT consultation, no depth limit beyond the
/// capture sequence terminating on its own.
pub fn quiescence(pos: &Position, ctx: &SearchContext, mut alpha: i32, beta: i32) -> i32 {
    if ctx.stop.load(Ordering::Relaxed) {
        return 0;
    }

    let stand_pat = evaluate(pos);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mover = pos.side_to_move;
    let mut captures: ArrayVec<Move, MAX_PLY_MOVES> = ArrayVec::new();
    generate_captures(pos, &mut captures);

    for mv in captures {
        let mut next = *pos;
        do_move(&mut next, ctx.keys, mv);
        if is_in_check(&next, mover) {
            continue;
        }
        let score = -quiescence(&next, ctx, -beta, -alpha);
        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

/// Principal negamax node (spec §4.5 "Body"). `age` identifies the
/// iterative-deepening iteration this call belongs to, for TT replacement.
pub fn negamax(pos: &Position, ctx: &SearchContext, depth: u8, mut alpha: i32, beta: i32, age: u8) -> i32 {
    if ctx.stop.load(Ordering::Relaxed) {
        return 0;
    }
    if depth == 0 {
        return quiescence(pos, ctx, alpha, beta);
    }
    if pos.repetition_count() >= 3 {
        return 0;
    }

    let orig_alpha = alpha;
    let tt_entry = ctx.tt.probe(pos.zobrist);

    let mut moves: ArrayVec<Move, MAX_PLY_MOVES> = ArrayVec::new();
    generate_pseudo_legal(pos, &mut moves);

    if let Some(entry) = tt_entry {
        if entry.depth >= depth {
            match entry.node_type {
                NodeType::Exact => return entry.score,
                NodeType::Upper if entry.score <= alpha => return entry.score,
                NodeType::Lower if entry.score >= beta => return entry.score,
                _ => {}
            }
        }
    }

    let hint_index = tt_entry
        .map(|e| e.best_move_index as usize)
        .filter(|&i| i < moves.len());

    let mut order: ArrayVec<usize, MAX_PLY_MOVES> = ArrayVec::new();
    if let Some(h) = hint_index {
        order.push(h);
    }
    for i in 0..moves.len() {
        if Some(i) != hint_index {
            order.push(i);
        }
    }

    let mover = pos.side_to_move;
    let mut best_score = i32::MIN;
    let mut best_move_index: u8 = 0;
    let mut any_legal = false;

    for i in order {
        let mv = moves[i];
        let mut next = *pos;
        do_move(&mut next, ctx.keys, mv);
        if is_in_check(&next, mover) {
            continue;
        }
        any_legal = true;

        let score = -negamax(&next, ctx, depth - 1, -beta, -alpha, age);
        if score > best_score {
            best_score = score;
            best_move_index = i as u8;
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            ctx.tt.store(pos.zobrist, i as u8, depth, score, NodeType::Lower, age);
            return score;
        }
    }

    if !any_legal {
        // Stalemate or checkmate; mate scoring is intentionally omitted
        // (spec §9 open question).
        return 0;
    }

    let node_type = if best_score > orig_alpha { NodeType::Exact } else { NodeType::Upper };
    ctx.tt.store(pos.zobrist, best_move_index, depth, best_score, node_type, age);
    best_score
}

/// Searches every legal root move to `depth` and returns the best one with
/// its score. Returns `None` if the position has no legal move.
pub fn search_root(pos: &Position, ctx: &SearchContext, depth: u8, age: u8) -> Option<(Move, i32)> {
    let mut moves: ArrayVec<Move, MAX_PLY_MOVES> = ArrayVec::new();
    generate_pseudo_legal(pos, &mut moves);
    search_root_moves(pos, ctx, &moves, depth, age)
}

/// Searches only `moves` (a caller-supplied subset of the root's pseudo-legal
/// moves) to `depth` and returns the best one with its score. Used by
/// root-parallel dispatch (spec §4.5 "Root-parallel dispatch"), where each
/// worker searches one chunk of the root move list.
pub fn search_root_moves(
    pos: &Position,
    ctx: &SearchContext,
    moves: &[Move],
    depth: u8,
    age: u8,
) -> Option<(Move, i32)> {
    let mover = pos.side_to_move;
    let mut best: Option<(Move, i32)> = None;
    let mut alpha = i32::MIN + 1;
    let beta = i32::MAX;

    for &mv in moves {
        let mut next = *pos;
        do_move(&mut next, ctx.keys, mv);
        if is_in_check(&next, mover) {
            continue;
        }
        let score = if depth == 0 {
            -quiescence(&next, ctx, -beta, -alpha)
        } else {
            -negamax(&next, ctx, depth - 1, -beta, -alpha, age)
        };
        if best.is_none() || score > best.unwrap().1 {
            best = Some((mv, score));
        }
        if score > alpha {
            alpha = score;
        }
    }

    best
}

/// Fixed-depth search (spec §6 `search_fixed_depth`). Runs unconditionally;
/// the caller is responsible for supplying a stop flag that never fires if
/// no time limit is wanted.
pub fn search_fixed_depth(pos: &Position, keys: &ZobristKeys, tt: &TranspositionTable, depth: u8) -> Option<Move> {
    let stop = AtomicBool::new(false);
    let ctx = SearchContext { keys, tt, stop: &stop };
    search_root(pos, &ctx, depth, 1).map(|(mv, _)| mv)
}

/// Iterative deepening under a wall-clock budget (spec §4.5 "Iterative
/// deepening" and §6 `search_timed`). Each iteration's `age` is the depth
/// of that iteration, per the open-question decision in this crate's
/// design notes. Returns the best move from the last *fully completed*
/// iteration; an in-progress iteration that the timer cuts off is discarded.
///
/// A background timer thread sets the shared stop flag once `budget_ms`
/// elapses, exactly like `Engine::search_timed` — without it the per-node
/// `ctx.stop` checks in `negamax`/`quiescence` never fire and an in-progress
/// iteration would run to unbounded completion instead of being cut off.
pub fn search_timed(pos: &Position, keys: &ZobristKeys, tt: &TranspositionTable, budget_ms: u64) -> Option<Move> {
    let stop = Arc::new(AtomicBool::new(false));
    let budget = std::time::Duration::from_millis(budget_ms);

    let timer_stop = Arc::clone(&stop);
    // Detached: it only ever sets an already-terminal flag, so it's
    // harmless to outlive the search it was timing.
    thread::spawn(move || {
        thread::sleep(budget);
        timer_stop.store(true, Ordering::Relaxed);
    });

    let mut best: Option<Move> = None;
    let mut depth: u8 = 1;
    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        let ctx = SearchContext { keys, tt, stop: &*stop };
        match search_root(pos, &ctx, depth, depth) {
            Some((mv, _)) if !stop.load(Ordering::Relaxed) => {
                best = Some(mv);
            }
            _ => break,
        }
        if stop.load(Ordering::Relaxed) {
            break;
        }
        depth = depth.saturating_add(1);
        if depth > 127 {
            break;
        }
    }
    best
}
