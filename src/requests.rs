use crate::error::ClientError;
use crate::server::GameServer;
use async_trait::async_trait;
use common::messages::{
    EndTurnRequest, GameId, NewGameRequest, NewGameResponse, SelectHandCardRequest, StandRequest, TurnResponse,
};
use common::{Action, Side};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, info};

pub const NEW_GAME_URL: &str = "/pazaak/api/new-game";
pub const END_TURN_URL: &str = "/pazaak/api/end-turn";
pub const STAND_URL: &str = "/pazaak/api/stand";
pub const SELECT_HAND_CARD_URL: &str = "/pazaak/api/select-hand-card";

/// Thin JSON-over-POST wrapper over an HTTP client rooted at a base URL.
#[derive(Debug, Clone)]
pub struct RequestService {
    client: reqwest::Client,
    base_url: String,
}

impl RequestService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(RequestService {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    // With a base URL the path gets a leading and trailing slash, which the
    // server's routes require
    pub fn url(&self, path: &str) -> String {
        if self.base_url.is_empty() {
            return path.to_string();
        }
        let mut path = path.to_string();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if !path.ends_with('/') {
            path.push('/');
        }
        format!("{}{}", self.base_url, path)
    }

    #[tracing::instrument(skip(self))]
    pub async fn post<P, R>(&self, path: &str, payload: &P) -> Result<R, ClientError>
    where
        P: Serialize + Debug + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

/// The game server reached over its JSON endpoints.
#[derive(Debug, Clone)]
pub struct HttpGameServer {
    requests: RequestService,
}

impl HttpGameServer {
    pub fn new(requests: RequestService) -> Self {
        HttpGameServer { requests }
    }
}

#[async_trait(?Send)]
impl GameServer for HttpGameServer {
    async fn new_game(&self, replacing: Option<&GameId>) -> Result<NewGameResponse, ClientError> {
        let payload = NewGameRequest {
            game_id: replacing.cloned(),
        };
        let response: NewGameResponse = self.requests.post(NEW_GAME_URL, &payload).await?;
        info!("server started game {}", response.game_id);
        Ok(response)
    }

    async fn end_turn(&self, game_id: &GameId, side: Side) -> Result<TurnResponse, ClientError> {
        let payload = EndTurnRequest {
            action: Action::end_turn(side),
            turn: side,
            game_id: game_id.clone(),
        };
        self.requests.post(END_TURN_URL, &payload).await
    }

    async fn stand(&self, game_id: &GameId) -> Result<TurnResponse, ClientError> {
        let payload = StandRequest {
            action: Action::StandPlayer,
            game_id: game_id.clone(),
        };
        self.requests.post(STAND_URL, &payload).await
    }

    async fn select_hand_card(
        &self,
        game_id: &GameId,
        card_index: usize,
    ) -> Result<TurnResponse, ClientError> {
        let payload = SelectHandCardRequest {
            action: Action::HandPlayer,
            card_index,
            game_id: game_id.clone(),
        };
        self.requests.post(SELECT_HAND_CARD_URL, &payload).await
    }
}
