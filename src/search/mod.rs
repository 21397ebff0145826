pub mod eval;
pub mod search;
pub mod tt;

pub use eval::evaluate;
pub use search::{
    negamax, quiescence, search_fixed_depth, search_root, search_root_moves, search_timed, SearchContext,
};
pub use tt::{NodeType, TTEntry, TranspositionTable};
