use crate::pazaak::{Action, Card, Record, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque server-issued token correlating requests with one game instance.
/// Sent back in exactly the JSON form it arrived in, since the server looks
/// games up by that key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum GameId {
    Int(i64),
    Str(String),
}

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        GameId::Str(id.into())
    }
}

impl From<i64> for GameId {
    fn from(id: i64) -> Self {
        GameId::Int(id)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameId::Int(id) => write!(f, "{}", id),
            GameId::Str(id) => write!(f, "{}", id),
        }
    }
}

/// Body of the new-game request. Naming the game being replaced lets the
/// server drop it.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewGameRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<GameId>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EndTurnRequest {
    pub action: Action,
    pub turn: Side,
    pub game_id: GameId,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StandRequest {
    pub action: Action,
    pub game_id: GameId,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SelectHandCardRequest {
    pub action: Action,
    pub card_index: usize,
    pub game_id: GameId,
}

/// One side of the table as reported by the new-game endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SideSnapshot {
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub hand: Vec<Card>,
    #[serde(default)]
    pub placed: Vec<Card>,
    #[serde(default)]
    pub is_standing: bool,
    pub record: Option<Record>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewGameResponse {
    pub game_id: GameId,
    pub player: SideSnapshot,
    pub opponent: SideSnapshot,
    #[serde(rename = "move")]
    pub opening_move: Option<Card>,
}

// The integer value is authoritative; the name is informational only
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StatusCode {
    pub value: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug)]
pub struct SideValue {
    pub value: Side,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TurnInfo {
    pub just_went: SideValue,
    pub up_next: SideValue,
}

/// Response shared by the end-turn, stand and select-hand-card endpoints.
/// Score, placed cards, hand and standing flag describe the side that just went.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    #[serde(default)]
    pub game_id: Option<GameId>,
    pub status: StatusCode,
    pub turn: TurnInfo,
    pub score: i32,
    #[serde(default)]
    pub placed: Vec<Card>,
    #[serde(default)]
    pub hand: Option<Vec<Card>>,
    #[serde(default)]
    pub is_standing: bool,
    #[serde(default)]
    pub record: Option<Record>,
}

impl TurnResponse {
    pub fn just_went(&self) -> Side {
        self.turn.just_went.value
    }

    pub fn up_next(&self) -> Side {
        self.turn.up_next.value
    }
}
