//! Zobrist hashing.
//!
//! Unlike the source this crate is descended from, the random constants are
//! not a process-global singleton: they are built once by [`Engine::new`]
//! from a seeded RNG and threaded explicitly into every [`crate::board::Position`]
//! operation that needs them. This keeps position mutation free of hidden
//! global state and makes the constants themselves trivially swappable for
//! deterministic tests.

use rand::{RngCore, SeedableRng, rngs::StdRng};

/// 12 piece-square randoms × 64, one side-to-move random, four castling-right
/// randoms (order: white-short, white-long, black-short, black-long), and
/// eight en-passant-file randoms.
#[derive(Debug, Clone)]
pub struct ZobristKeys {
    /// `piece[color][piece][square]`, color 0=white/1=black, piece 0..5 =
    /// pawn,knight,bishop,rook,queen,king.
    pub piece: [[[u64; 64]; 6]; 2],
    pub side_to_move: u64,
    /// `[white_short, white_long, black_short, black_long]`.
    pub castling: [u64; 4],
    pub ep_file: [u64; 8],
}

#[cfg(feature = "deterministic_zobrist")]
pub(crate) const DETERMINISTIC_SEED: u64 = 0x9E37_79B9_AAAC_5C87;

impl ZobristKeys {
    /// Build from a seeded RNG — used when the `deterministic_zobrist`
    /// feature is enabled, or directly by tests that need reproducible keys.
    pub fn from_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Build from process entropy. This is what `Engine::new` uses by
    /// default; the `deterministic_zobrist` feature overrides the call site
    /// in [`crate::engine::Engine::new`] to use [`Self::from_seed`] instead.
    pub fn from_entropy() -> Self {
        let mut seed_bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut seed_bytes);
        Self::from_rng(StdRng::from_seed(seed_bytes))
    }

    fn from_rng(mut rng: StdRng) -> Self {
        fn non_zero(rng: &mut StdRng) -> u64 {
            loop {
                let v = rng.next_u64();
                if v != 0 {
                    return v;
                }
            }
        }

        let mut piece = [[[0u64; 64]; 6]; 2];
        for color in &mut piece {
            for kind in color {
                for square in kind {
                    *square = non_zero(&mut rng);
                }
            }
        }

        ZobristKeys {
            piece,
            side_to_move: non_zero(&mut rng),
            castling: [
                non_zero(&mut rng),
                non_zero(&mut rng),
                non_zero(&mut rng),
                non_zero(&mut rng),
            ],
            ep_file: std::array::from_fn(|_| non_zero(&mut rng)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_keys_are_reproducible() {
        let a = ZobristKeys::from_seed(42);
        let b = ZobristKeys::from_seed(42);
        assert_eq!(a.piece[0][0][0], b.piece[0][0][0]);
        assert_eq!(a.side_to_move, b.side_to_move);
        assert_eq!(a.ep_file, b.ep_file);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = ZobristKeys::from_seed(1);
        let b = ZobristKeys::from_seed(2);
        assert_ne!(a.side_to_move, b.side_to_move);
    }
}
