use crate::pazaak::player::Side;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    #[serde(rename = "end-turn-player")]
    EndTurnPlayer,
    #[serde(rename = "end-turn-opponent")]
    EndTurnOpponent,
    #[serde(rename = "hand-player")]
    HandPlayer,
    #[serde(rename = "stand-player")]
    StandPlayer,
}

impl Action {
    pub fn end_turn(side: Side) -> Self {
        match side {
            Side::Player => Action::EndTurnPlayer,
            Side::Opponent => Action::EndTurnOpponent,
        }
    }

    // The side the action is performed on behalf of
    pub fn side(self) -> Side {
        match self {
            Action::EndTurnOpponent => Side::Opponent,
            Action::EndTurnPlayer | Action::HandPlayer | Action::StandPlayer => Side::Player,
        }
    }
}
