//! # fd_core - Football-Darts Rules Engine
//!
//! Authoritative rules engine for a two-player, turn-based football-darts
//! match. One thrown dart resolves into a deterministic change of game
//! state: field position, score, possession, and drive/quarter/overtime
//! progression.
//!
//! ## Design
//! - Pure core: every operation takes an immutable snapshot and returns a
//!   new one; no I/O, no locking, no hidden state.
//! - Append-only event log as the source of truth; aggregate fields are
//!   re-derivable caches.
//! - JSON API for easy host integration; the host owns persistence and
//!   transport.

// Allow unused code for features under development
#![allow(dead_code)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod state;

// Re-export main API functions
pub use api::{
    advance_json, apply_dart_json, available_actions_json, choose_conversion_json,
    game_snapshot_json, new_game_json, set_overtime_possession_json, undo_json,
};
pub use error::{EngineError, Result};

// Re-export engine entry points
pub use engine::{
    advance, apply_dart_hit, attempt_field_goal, attempt_punt, available_actions,
    choose_conversion, new_game, resolve_dart, set_overtime_possession, start_next_drive, undo,
    AvailableActions, Dartboard, RingCalibration,
};

// Re-export model types
pub use models::{
    ConversionKind, DartHit, DartResult, DriveResult, DriveState, EventType, GameEvent, GameState,
    GameStatus, Multiplier, PendingStart, PendingStartReason, PlayerSide,
};

// Re-export state management
pub use state::{get_state, reset_state, set_state, GAME_STATE};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
