pub mod json_api;

pub use json_api::{
    advance_json, apply_dart_json, available_actions_json, choose_conversion_json,
    game_snapshot_json, new_game_json, set_overtime_possession_json, undo_json, AdvanceRequest,
    ConversionChoiceRequest, DartAction, DartRequest, GameRequest, GameResponse, NewGameRequest,
};
