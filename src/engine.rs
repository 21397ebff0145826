//! Top-level engine: owns the Zobrist constants and the transposition
//! table, and dispatches root-parallel search across a worker pool.
//!
//! The threading idiom — `thread::Builder` with a named, sized stack,
//! scoped workers sharing state through references, and a join rendezvous —
//! is grounded on the upstream project's Lazy-SMP dispatcher, adapted here
//! to root-move-chunk partitioning instead of depth-staggered workers
//! (spec §4.5 "Root-parallel dispatch").

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::board::Position;
use crate::hash::ZobristKeys;
use crate::moves::movegen::generate_pseudo_legal;
use crate::moves::types::Move;
use crate::search::search::search_root_moves;
use crate::search::tt::TranspositionTable;
use crate::search::SearchContext;

/// 8 MiB per worker: deep enough for the recursion this engine produces
/// (bounded iterative-deepening depth, no null-move or extensions that
/// would blow past it).
const SEARCH_STACK_SIZE: usize = 8 * 1024 * 1024;
const MAX_ROOT_MOVES: usize = 256;

pub struct EngineConfig {
    /// Transposition table capacity, in entries (spec §6 "Configuration constants").
    pub tt_capacity: usize,
    /// Default time budget for `search_timed`, in milliseconds.
    pub default_time_budget_ms: u64,
    /// Default depth for `search_fixed_depth`.
    pub default_fixed_depth: u8,
    /// Root-level worker count (spec §5 "fixed-size pool sized to the
    /// hardware thread count").
    pub num_workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tt_capacity: 100_000,
            default_time_budget_ms: 1_000,
            default_fixed_depth: 6,
            num_workers: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
        }
    }
}

pub struct Engine {
    keys: ZobristKeys,
    tt: Arc<TranspositionTable>,
    config: EngineConfig,
}

impl Engine {
    /// `seed` fixes the Zobrist constants for reproducible hashing (tests,
    /// deterministic replay); `None` draws them from entropy, unless the
    /// `deterministic_zobrist` feature is enabled, in which case a fixed
    /// built-in seed always wins (reproducible builds for benchmarking).
    pub fn new(config: EngineConfig, seed: Option<u64>) -> Self {
        #[cfg(feature = "deterministic_zobrist")]
        let keys = ZobristKeys::from_seed(crate::hash::DETERMINISTIC_SEED);
        #[cfg(not(feature = "deterministic_zobrist"))]
        let keys = match seed {
            Some(seed) => ZobristKeys::from_seed(seed),
            None => ZobristKeys::from_entropy(),
        };
        let tt = Arc::new(TranspositionTable::new(config.tt_capacity));
        info!(
            tt_capacity = config.tt_capacity,
            num_workers = config.num_workers,
            "engine initialised"
        );
        Engine { keys, tt, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The Zobrist constants this engine hashes with. Callers building a
    /// `Position` to search with this engine must parse/construct it with
    /// these same keys — `deterministic_zobrist` builds may not be the keys
    /// `new`'s `seed` argument requested.
    pub fn keys(&self) -> &ZobristKeys {
        &self.keys
    }

    /// Runs a single fixed-depth root-parallel search (spec §6 `search_fixed_depth`).
    pub fn search_fixed_depth(&self, pos: &Position, depth: u8) -> Option<Move> {
        let stop = AtomicBool::new(false);
        self.root_parallel_search(pos, depth, 1, &stop).map(|(mv, _)| mv)
    }

    /// Iterative deepening under a wall-clock budget, each iteration
    /// dispatched root-parallel (spec §6 `search_timed`). A background
    /// timer thread sets the shared stop flag once the budget elapses;
    /// the in-progress iteration is discarded and the previous iteration's
    /// best move is returned (spec §5 "Cancellation").
    pub fn search_timed(&self, pos: &Position, budget_ms: u64) -> Option<Move> {
        let stop = Arc::new(AtomicBool::new(false));
        let start = Instant::now();
        let budget = Duration::from_millis(budget_ms);

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
            match self.root_parallel_search(pos, depth, depth, &stop) {
                Some((mv, score)) if !stop.load(Ordering::Relaxed) => {
                    debug!(depth, score, move_ = %mv, "iteration complete");
                    best = Some(mv);
                }
                _ => break,
            }
            depth = depth.saturating_add(1);
            if depth > 127 {
                break;
            }
        }
        best
    }

    /// Partitions the root's pseudo-legal moves into `num_workers` chunks
    /// and searches each chunk on its own value-copy of `pos`, sharing the
    /// transposition table. Highest score wins; ties break to the
    /// lowest-numbered worker (spec §5 "Ordering guarantees").
    fn root_parallel_search(&self, pos: &Position, depth: u8, age: u8, stop: &AtomicBool) -> Option<(Move, i32)> {
        let mut moves: ArrayVec<Move, MAX_ROOT_MOVES> = ArrayVec::new();
        generate_pseudo_legal(pos, &mut moves);
        if moves.is_empty() {
            return None;
        }

        let num_workers = self.config.num_workers.max(1).min(moves.len());
        if num_workers == 1 {
            let ctx = SearchContext { keys: &self.keys, tt: &self.tt, stop };
            return search_root_moves(pos, &ctx, &moves, depth, age);
        }

        let chunk_size = moves.len().div_ceil(num_workers);
        let chunks: Vec<&[Move]> = moves.chunks(chunk_size).collect();
        let pos_copy = *pos;

        let results: Vec<Option<(usize, Move, i32)>> = thread::scope(|scope| {
            let handles: Vec<_> = chunks
                .into_iter()
                .enumerate()
                .map(|(worker_id, chunk)| {
                    let keys = &self.keys;
                    let tt = &self.tt;
                    thread::Builder::new()
                        .name(format!("search-worker-{worker_id}"))
                        .stack_size(SEARCH_STACK_SIZE)
                        .spawn_scoped(scope, move || {
                            let ctx = SearchContext { keys, tt, stop };
                            search_root_moves(&pos_copy, &ctx, chunk, depth, age)
                                .map(|(mv, score)| (worker_id, mv, score))
                        })
                        .expect("failed to spawn search worker")
                })
                .collect();

            handles.into_iter().map(|h| h.join().unwrap_or(None)).collect()
        });

        let mut best: Option<(usize, Move, i32)> = None;
        for result in results.into_iter().flatten() {
            best = match best {
                None => Some(result),
                Some(current) if result.2 > current.2 || (result.2 == current.2 && result.0 < current.0) => {
                    Some(result)
                }
                Some(current) => Some(current),
            };
        }
        best.map(|(_, mv, score)| (mv, score))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default(), None)
    }
}
