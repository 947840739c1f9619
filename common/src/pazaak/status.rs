use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("Unexpected game status code {0}")]
pub struct UnknownStatus(pub i64);

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "i64", into = "i64")]
pub enum GameStatus {
    PlayerWins,
    OpponentWins,
    Tie,
    GameOn,
    PlayerForfeit,
}

impl GameStatus {
    pub fn code(self) -> i64 {
        match self {
            GameStatus::PlayerWins => 0,
            GameStatus::OpponentWins => 1,
            GameStatus::Tie => 2,
            GameStatus::GameOn => 3,
            GameStatus::PlayerForfeit => 4,
        }
    }

    pub fn is_over(self) -> bool {
        self != GameStatus::GameOn
    }
}

impl TryFrom<i64> for GameStatus {
    type Error = UnknownStatus;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(GameStatus::PlayerWins),
            1 => Ok(GameStatus::OpponentWins),
            2 => Ok(GameStatus::Tie),
            3 => Ok(GameStatus::GameOn),
            4 => Ok(GameStatus::PlayerForfeit),
            _ => Err(UnknownStatus(code)),
        }
    }
}

impl From<GameStatus> for i64 {
    fn from(status: GameStatus) -> Self {
        status.code()
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Winner {
    Player,
    Opponent,
    Tie,
}

/// What a status code means for the client: whether the game has ended,
/// who won, and the banner to show.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub status: GameStatus,
    pub is_over: bool,
    pub winner: Option<Winner>,
    pub message: Option<&'static str>,
}

pub fn resolve_game_status(code: i64) -> Result<Resolution, UnknownStatus> {
    let status = GameStatus::try_from(code)?;
    let (winner, message) = match status {
        GameStatus::PlayerWins => (Some(Winner::Player), Some("Player Wins!")),
        GameStatus::OpponentWins => (Some(Winner::Opponent), Some("Opponent Wins!")),
        GameStatus::Tie => (Some(Winner::Tie), Some("Tie!")),
        GameStatus::GameOn | GameStatus::PlayerForfeit => (None, None),
    };
    Ok(Resolution {
        status,
        is_over: status.is_over(),
        winner,
        message,
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOverStatus {
    pub is_over: bool,
    pub status: GameStatus,
    pub winner: Option<Winner>,
    pub message: Option<String>,
}

impl Default for GameOverStatus {
    fn default() -> Self {
        GameOverStatus {
            is_over: false,
            status: GameStatus::GameOn,
            winner: None,
            message: None,
        }
    }
}

impl GameOverStatus {
    // A forfeit carries no message of its own, so the previous banner is kept
    pub fn concluded(&self, resolution: Resolution) -> Self {
        GameOverStatus {
            is_over: resolution.is_over,
            status: resolution.status,
            winner: resolution.winner,
            message: resolution
                .message
                .map(str::to_string)
                .or_else(|| self.message.clone()),
        }
    }
}
