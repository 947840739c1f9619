use crate::error::ClientError;
use async_trait::async_trait;
use common::messages::{GameId, NewGameResponse, TurnResponse};
use common::Side;

/// The server-side oracle holding the game rules. The coordinator only ever
/// talks to the game through this trait.
#[async_trait(?Send)]
pub trait GameServer {
    /// Starts a game. `replacing` names the game being abandoned so the server
    /// can drop it.
    async fn new_game(&self, replacing: Option<&GameId>) -> Result<NewGameResponse, ClientError>;

    async fn end_turn(&self, game_id: &GameId, side: Side) -> Result<TurnResponse, ClientError>;

    async fn stand(&self, game_id: &GameId) -> Result<TurnResponse, ClientError>;

    async fn select_hand_card(
        &self,
        game_id: &GameId,
        card_index: usize,
    ) -> Result<TurnResponse, ClientError>;
}
