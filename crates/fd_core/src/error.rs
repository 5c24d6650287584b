use thiserror::Error;

/// Engine-level failures.
///
/// Every variant except the serialization pair marks a contract violation:
/// the host issued an action that `available_actions` would have reported as
/// illegal. None of them leave a partially-mutated snapshot behind; the
/// caller's `GameState` is untouched on error.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no active drive")]
    NoActiveDrive,

    #[error("no bonus dart available")]
    NoBonusDartAvailable,

    #[error("bonus dart must be resolved first")]
    BonusDartPending,

    #[error("not in field goal range: position {position}")]
    NotInFGRange { position: u8 },

    #[error("punt not available: requires the 4th dart inside own territory")]
    PuntNotAvailable,

    #[error("no conversion type selected")]
    NoConversionTypeSelected,

    #[error("no conversion pending")]
    NoConversionPending,

    #[error("invalid dart payload: segment {segment} with {multiplier}")]
    InvalidDartPayload { segment: u8, multiplier: String },

    #[error("game already completed")]
    GameCompleted,

    #[error("no game loaded")]
    NoGameLoaded,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            EngineError::Deserialization(err.to_string())
        } else {
            EngineError::Serialization(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
