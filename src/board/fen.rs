//! FEN parsing and serialization.
//!
//! Fields 1-3 (piece placement, active color, castling availability) are
//! honoured in full. Field 4 (en-passant target square) is parsed
//! permissively: if present and well-formed it is accepted and otherwise
//! ignored, matching the upstream source this engine was distilled from,
//! which never wires the parsed en-passant square into its move generator.
//! A position's actual en-passant opportunity always comes from an in-game
//! double pawn push (see `moves::execute::do_move`), never from FEN.

use super::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Piece, Position, fen_tables};
use crate::hash::ZobristKeys;
use crate::square::Square;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    WrongRankCount(usize),
    BadPieceLetter(char),
    RankOverflow(u8),
    BadActiveColor(String),
    BadCastlingField(String),
    InvalidPosition(String),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::WrongRankCount(n) => write!(f, "expected 8 ranks, found {n}"),
            FenError::BadPieceLetter(c) => write!(f, "unrecognised piece letter '{c}'"),
            FenError::RankOverflow(rank) => write!(f, "rank {rank} does not sum to 8 squares"),
            FenError::BadActiveColor(s) => write!(f, "active color must be 'w' or 'b', got '{s}'"),
            FenError::BadCastlingField(s) => write!(f, "bad castling field '{s}'"),
            FenError::InvalidPosition(s) => write!(f, "{s}"),
        }
    }
}

impl std::error::Error for FenError {}

impl Position {
    pub fn from_fen(keys: &ZobristKeys, fen: &str) -> Result<Position, FenError> {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().unwrap_or("");
        let active_color = fields.next().unwrap_or("w");
        let castling = fields.next().unwrap_or("-");
        let _en_passant = fields.next(); // parsed permissively; see module docs

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount(ranks.len()));
        }

        let mut pos = Position::empty();
        // FEN ranks run 8 down to 1; our rank 0 is rank 1.
        for (rank_from_top, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_from_top as u8;
            let mut file = 0u8;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    file += skip as u8;
                    if file > 8 {
                        return Err(FenError::RankOverflow(rank + 1));
                    }
                    continue;
                }
                if !ch.is_ascii() || (ch as usize) >= 128 {
                    return Err(FenError::BadPieceLetter(ch));
                }
                let (piece, color) = fen_tables::CHAR_TO_PC[ch as usize]
                    .ok_or(FenError::BadPieceLetter(ch))?;
                if file >= 8 {
                    return Err(FenError::RankOverflow(rank + 1));
                }
                pos.place_piece(keys, color, piece, Square::new(file, rank));
                file += 1;
            }
            if file != 8 {
                return Err(FenError::RankOverflow(rank + 1));
            }
        }

        pos.side_to_move = match active_color {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadActiveColor(other.to_string())),
        };
        if pos.side_to_move == Color::Black {
            pos.zobrist ^= keys.side_to_move;
        }

        if castling != "-" {
            for c in castling.chars() {
                match c {
                    'K' => pos.castling_rights |= CASTLE_WK,
                    'Q' => pos.castling_rights |= CASTLE_WQ,
                    'k' => pos.castling_rights |= CASTLE_BK,
                    'q' => pos.castling_rights |= CASTLE_BQ,
                    _ => return Err(FenError::BadCastlingField(castling.to_string())),
                }
            }
        }
        if pos.castling_rights & CASTLE_WK != 0 {
            pos.zobrist ^= keys.castling[0];
        }
        if pos.castling_rights & CASTLE_WQ != 0 {
            pos.zobrist ^= keys.castling[1];
        }
        if pos.castling_rights & CASTLE_BK != 0 {
            pos.zobrist ^= keys.castling[2];
        }
        if pos.castling_rights & CASTLE_BQ != 0 {
            pos.zobrist ^= keys.castling[3];
        }

        pos.validate().map_err(FenError::InvalidPosition)?;
        debug_assert_eq!(pos.zobrist, pos.recompute_zobrist(keys));
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::new();
        for rank_from_top in 0..8u8 {
            let rank = 7 - rank_from_top;
            let mut empty_run = 0u8;
            for file in 0..8u8 {
                match self.piece_at(Square::new(file, rank)) {
                    None => empty_run += 1,
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            out.push(char::from_digit(empty_run as u32, 10).unwrap());
                            empty_run = 0;
                        }
                        let idx = (color as usize) * 6 + (piece as usize);
                        out.push(fen_tables::PC_TO_CHAR[idx]);
                    }
                }
            }
            if empty_run > 0 {
                out.push(char::from_digit(empty_run as u32, 10).unwrap());
            }
            if rank_from_top != 7 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(if self.side_to_move == Color::White { 'w' } else { 'b' });

        out.push(' ');
        let mut any_castle = false;
        if self.castling_rights & CASTLE_WK != 0 {
            out.push('K');
            any_castle = true;
        }
        if self.castling_rights & CASTLE_WQ != 0 {
            out.push('Q');
            any_castle = true;
        }
        if self.castling_rights & CASTLE_BK != 0 {
            out.push('k');
            any_castle = true;
        }
        if self.castling_rights & CASTLE_BQ != 0 {
            out.push('q');
            any_castle = true;
        }
        if !any_castle {
            out.push('-');
        }

        out.push_str(" - 0 1");
        out
    }
}
