mod action;
mod card;
mod player;
mod status;

pub use action::Action;
pub use card::Card;
pub use player::{PlayerState, Record, Side};
pub use status::{resolve_game_status, GameOverStatus, GameStatus, Resolution, UnknownStatus, Winner};
