use common::messages::GameId;
use common::UnknownStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Could not reach the game server: {0}")]
    Transport(String),
    #[error("Hand card index {index} is out of range for a hand of {len} cards")]
    InvalidIndex { index: usize, len: usize },
    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatus),
    #[error("Response for game {received} does not belong to the current game {expected:?}")]
    StaleResponse {
        expected: Option<GameId>,
        received: GameId,
    },
    #[error("The game is over")]
    GameOver,
    #[error("No game has been started")]
    NotStarted,
    #[error("Actions are disabled until the current turn resolves")]
    ActionsDisabled,
    #[error("No interrupted turn to resume")]
    NothingToResume,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}
