//! The rules engine proper.
//!
//! Control flow: `dispatcher` routes a dart to `offense`, `kicking` or
//! `conversion`; those produce the updated drive and events; `progression`
//! then decides whether the drive/quarter/game also ends. Every operation is
//! snapshot-in, snapshot-out.

pub mod board;
pub mod conversion;
pub mod dispatcher;
pub mod kicking;
pub mod offense;
pub mod progression;
pub mod undo;

pub use board::{resolve_dart, Dartboard, RingCalibration, SECTOR_NUMBERS};
pub use dispatcher::{
    advance, apply_dart_hit, attempt_field_goal, attempt_punt, available_actions,
    choose_conversion, new_game, start_next_drive, AvailableActions,
};
pub use progression::{set_overtime_possession, DEFAULT_DRIVE_START, DRIVES_PER_QUARTER};
pub use undo::undo;
