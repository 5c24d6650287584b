pub mod dart;
pub mod drive;
pub mod events;
pub mod game;

pub use dart::{DartHit, DartResult, Multiplier};
pub use drive::{DriveResult, DriveState};
pub use events::{EventDetails, EventType, GameEvent};
pub use game::{
    ConversionKind, GameState, GameStatus, PendingStart, PendingStartReason, PlayerSide,
};
