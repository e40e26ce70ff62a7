//! Masks and other board-wide constants.
//!
//! Bit patterns here follow the file-major square numbering used throughout
//! this crate (`square = file * 8 + rank`): a file's eight squares occupy one
//! contiguous byte, and a rank's eight squares are spread one bit apart, one
//! per byte. This is the mirror image of the more commonly seen rank-major
//! layout.

pub const PLAYER_CNT: usize = 2;
pub const PIECE_TYPE_CNT: usize = 7;
pub const SQ_CNT: usize = 64;
pub const FILE_CNT: usize = 8;
pub const RANK_CNT: usize = 8;

/// Bit representation of file A (squares a1..a8).
pub const FILE_A: u64 = 0x0000_0000_0000_00FF;
pub const FILE_B: u64 = 0x0000_0000_0000_FF00;
pub const FILE_C: u64 = 0x0000_0000_00FF_0000;
pub const FILE_D: u64 = 0x0000_0000_FF00_0000;
pub const FILE_E: u64 = 0x0000_00FF_0000_0000;
pub const FILE_F: u64 = 0x0000_FF00_0000_0000;
pub const FILE_G: u64 = 0x00FF_0000_0000_0000;
pub const FILE_H: u64 = 0xFF00_0000_0000_0000;

/// Bit representation of rank 1 (one bit per file, lowest bit of each byte).
pub const RANK_1: u64 = 0x0101_0101_0101_0101;
pub const RANK_2: u64 = RANK_1 << 1;
pub const RANK_3: u64 = RANK_1 << 2;
pub const RANK_4: u64 = RANK_1 << 3;
pub const RANK_5: u64 = RANK_1 << 4;
pub const RANK_6: u64 = RANK_1 << 5;
pub const RANK_7: u64 = RANK_1 << 6;
pub const RANK_8: u64 = RANK_1 << 7;

pub static FILE_BB: [u64; FILE_CNT] = [
    FILE_A, FILE_B, FILE_C, FILE_D, FILE_E, FILE_F, FILE_G, FILE_H,
];

pub static RANK_BB: [u64; RANK_CNT] = [
    RANK_1, RANK_2, RANK_3, RANK_4, RANK_5, RANK_6, RANK_7, RANK_8,
];

/// Squares a pawn promotes from: rank 7 (White) or rank 2 (Black), the ranks
/// a pawn leaves *to* land on the back rank.
pub const PROM_RANKS: u64 = RANK_1 | RANK_8;

pub const START_W_PAWN: u64 = RANK_2;
pub const START_B_PAWN: u64 = RANK_7;
pub const START_W_KNIGHT: u64 = SQ_B1 | SQ_G1;
pub const START_W_BISHOP: u64 = SQ_C1 | SQ_F1;
pub const START_W_ROOK: u64 = SQ_A1 | SQ_H1;
pub const START_W_QUEEN: u64 = SQ_D1;
pub const START_W_KING: u64 = SQ_E1;

pub const START_B_KNIGHT: u64 = SQ_B8 | SQ_G8;
pub const START_B_BISHOP: u64 = SQ_C8 | SQ_F8;
pub const START_B_ROOK: u64 = SQ_A8 | SQ_H8;
pub const START_B_QUEEN: u64 = SQ_D8;
pub const START_B_KING: u64 = SQ_E8;

const SQ_A1: u64 = 1 << 0;
const SQ_B1: u64 = 1 << 8;
const SQ_C1: u64 = 1 << 16;
const SQ_D1: u64 = 1 << 24;
const SQ_E1: u64 = 1 << 32;
const SQ_F1: u64 = 1 << 40;
const SQ_G1: u64 = 1 << 48;
const SQ_H1: u64 = 1 << 56;
const SQ_A8: u64 = 1 << 7;
const SQ_B8: u64 = 1 << 15;
const SQ_C8: u64 = 1 << 23;
const SQ_D8: u64 = 1 << 31;
const SQ_E8: u64 = 1 << 39;
const SQ_F8: u64 = 1 << 47;
const SQ_G8: u64 = 1 << 55;
const SQ_H8: u64 = 1 << 63;

pub const START_WHITE_OCC: u64 =
    START_W_PAWN | START_W_KNIGHT | START_W_BISHOP | START_W_ROOK | START_W_QUEEN | START_W_KING;
pub const START_BLACK_OCC: u64 =
    START_B_PAWN | START_B_KNIGHT | START_B_BISHOP | START_B_ROOK | START_B_QUEEN | START_B_KING;
pub const START_OCC_ALL: u64 = START_WHITE_OCC | START_BLACK_OCC;

/// Home square of each color's king, using the file-major square numbering.
pub const WHITE_KING_START: u8 = 32; // e1
pub const BLACK_KING_START: u8 = 39; // e8

pub const ROOK_WHITE_KSIDE_START: u8 = 56; // h1
pub const ROOK_WHITE_QSIDE_START: u8 = 0; // a1
pub const ROOK_BLACK_KSIDE_START: u8 = 63; // h8
pub const ROOK_BLACK_QSIDE_START: u8 = 7; // a8

/// Castling right bit flags, aligned so the 4-bit nibble `W_KS|W_QS|B_KS|B_QS`
/// indexes the Zobrist castling table directly.
pub const C_WHITE_K_MASK: u8 = 0b1000;
pub const C_WHITE_Q_MASK: u8 = 0b0100;
pub const C_BLACK_K_MASK: u8 = 0b0010;
pub const C_BLACK_Q_MASK: u8 = 0b0001;

pub static FILE_DISPLAYS: [char; FILE_CNT] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];
pub static RANK_DISPLAYS: [char; RANK_CNT] = ['1', '2', '3', '4', '5', '6', '7', '8'];
pub static PIECE_DISPLAYS: [[char; PIECE_TYPE_CNT]; PLAYER_CNT] = [
    ['_', 'P', 'N', 'B', 'R', 'Q', 'K'],
    ['_', 'p', 'n', 'b', 'r', 'q', 'k'],
];
