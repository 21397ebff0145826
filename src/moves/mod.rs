pub mod execute;
pub mod movegen;
pub mod perft;
pub mod types;

pub use execute::{apply_move, do_move};
pub use movegen::{attacks_by, generate_captures, generate_pseudo_legal, is_in_check};
pub use types::{Move, MoveBuffer};
