//! Stateless JSON entry points for host integration.
//!
//! Every request carries the full game snapshot plus the action; every
//! response carries the new snapshot and the legal-move projection. The host
//! owns durability; nothing here touches storage.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::{self, AvailableActions};
use crate::error::{EngineError, Result};
use crate::models::{ConversionKind, DartHit, GameState, PlayerSide};
use crate::SCHEMA_VERSION;

#[derive(Debug, Deserialize)]
pub struct NewGameRequest {
    pub schema_version: u8,
    pub player_a: String,
    pub player_b: String,
    pub first_possession: PlayerSide,
}

/// How the submitted dart is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DartAction {
    /// Normal throw; the engine routes it by pending state.
    #[default]
    Throw,
    FieldGoal,
    Punt,
}

#[derive(Debug, Deserialize)]
pub struct DartRequest {
    pub schema_version: u8,
    pub game: GameState,
    pub hit: DartHit,
    #[serde(default)]
    pub action: DartAction,
}

#[derive(Debug, Deserialize)]
pub struct ConversionChoiceRequest {
    pub schema_version: u8,
    pub game: GameState,
    pub choice: ConversionKind,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    pub schema_version: u8,
    pub game: GameState,
    /// Explicit start spot; omitted means "consume the pending override or
    /// default to the 30".
    #[serde(default)]
    pub start_position: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct GameRequest {
    pub schema_version: u8,
    pub game: GameState,
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub schema_version: u8,
    pub game: GameState,
    pub available_actions: AvailableActions,
}

fn check_schema(version: u8) -> Result<()> {
    if version != SCHEMA_VERSION {
        warn!(version, expected = SCHEMA_VERSION, "schema version mismatch");
        return Err(EngineError::Deserialization(format!(
            "unsupported schema_version {version}, expected {SCHEMA_VERSION}"
        )));
    }
    Ok(())
}

fn respond(game: GameState) -> Result<String> {
    let actions = engine::available_actions(&game);
    let response = GameResponse {
        schema_version: SCHEMA_VERSION,
        game,
        available_actions: actions,
    };
    Ok(serde_json::to_string(&response)?)
}

pub fn new_game_json(request: &str) -> Result<String> {
    let request: NewGameRequest = serde_json::from_str(request)?;
    check_schema(request.schema_version)?;
    info!(
        player_a = %request.player_a,
        player_b = %request.player_b,
        "new game"
    );
    let game = engine::new_game(
        request.player_a,
        request.player_b,
        request.first_possession,
    );
    respond(game)
}

pub fn apply_dart_json(request: &str) -> Result<String> {
    let request: DartRequest = serde_json::from_str(request)?;
    check_schema(request.schema_version)?;
    let next = match request.action {
        DartAction::Throw => engine::apply_dart_hit(&request.game, request.hit)?,
        DartAction::FieldGoal => engine::attempt_field_goal(&request.game, request.hit)?,
        DartAction::Punt => engine::attempt_punt(&request.game, request.hit)?,
    };
    respond(next)
}

pub fn choose_conversion_json(request: &str) -> Result<String> {
    let request: ConversionChoiceRequest = serde_json::from_str(request)?;
    check_schema(request.schema_version)?;
    let next = engine::choose_conversion(&request.game, request.choice)?;
    respond(next)
}

pub fn advance_json(request: &str) -> Result<String> {
    let request: AdvanceRequest = serde_json::from_str(request)?;
    check_schema(request.schema_version)?;
    let next = match request.start_position {
        Some(start) => engine::start_next_drive(&request.game, start),
        None => engine::advance(&request.game),
    };
    respond(next)
}

pub fn undo_json(request: &str) -> Result<String> {
    let request: GameRequest = serde_json::from_str(request)?;
    check_schema(request.schema_version)?;
    respond(engine::undo(&request.game))
}

/// Re-serialize a snapshot together with its legal-move projection. Lets a
/// host refresh a stored game against the current engine without acting.
pub fn game_snapshot_json(request: &str) -> Result<String> {
    let request: GameRequest = serde_json::from_str(request)?;
    check_schema(request.schema_version)?;
    respond(request.game)
}

pub fn available_actions_json(request: &str) -> Result<String> {
    let request: GameRequest = serde_json::from_str(request)?;
    check_schema(request.schema_version)?;
    let actions = engine::available_actions(&request.game);
    Ok(serde_json::to_string(&serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "available_actions": actions,
    }))?)
}

/// External coin-flip result for the first overtime possession.
pub fn set_overtime_possession_json(request: &str) -> Result<String> {
    #[derive(Debug, Deserialize)]
    struct CoinFlipRequest {
        schema_version: u8,
        game: GameState,
        possession: PlayerSide,
    }
    let request: CoinFlipRequest = serde_json::from_str(request)?;
    check_schema(request.schema_version)?;
    respond(engine::set_overtime_possession(
        &request.game,
        request.possession,
    ))
}
