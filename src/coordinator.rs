use crate::delay::{Delay, DelayPolicy};
use crate::error::ClientError;
use crate::server::GameServer;
use common::messages::{GameId, NewGameResponse, SideSnapshot, TurnResponse};
use common::{resolve_game_status, GameOverStatus, PlayerState, Record, Side};
use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    AwaitingUserInput,
    RequestInFlight,
    // An automatic continuation for this side failed to reach the server
    Interrupted(Side),
    GameOver,
}

/// Whether standing shows up locally as soon as it is requested or only once
/// the server has confirmed it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StandPolicy {
    #[default]
    Confirmed,
    Optimistic,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CoordinatorSettings {
    pub delay_policy: DelayPolicy,
    pub stand_policy: StandPolicy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TurnState {
    pub current_turn: Side,
    pub game_over: GameOverStatus,
}

/// Local projection of one server-side game.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub game_id: GameId,
    pub player: PlayerState,
    pub opponent: PlayerState,
    pub turn: TurnState,
}

impl Session {
    fn new(response: NewGameResponse, records: Records) -> Self {
        Session {
            game_id: response.game_id,
            player: player_state(response.player, records.player),
            opponent: player_state(response.opponent, records.opponent),
            turn: TurnState {
                current_turn: Side::Player,
                game_over: GameOverStatus::default(),
            },
        }
    }

    pub fn side(&self, side: Side) -> &PlayerState {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut PlayerState {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    fn merge(&mut self, response: TurnResponse) {
        let state = self.side_mut(response.just_went());
        state.score = response.score;
        state.placed = response.placed;
        state.is_standing = response.is_standing;
        if let Some(hand) = response.hand {
            state.hand = hand;
        }
        if let Some(record) = response.record {
            state.record = record;
        }
    }
}

fn player_state(snapshot: SideSnapshot, record: Record) -> PlayerState {
    PlayerState {
        score: snapshot.score,
        is_standing: snapshot.is_standing,
        placed: snapshot.placed,
        hand: snapshot.hand,
        record: snapshot.record.unwrap_or(record),
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Records {
    player: Record,
    opponent: Record,
}

/// What the coordinator does after applying a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    WaitForUser,
    AutoContinue(Side),
    Finished,
}

#[derive(Debug)]
pub enum Event {
    GameStarted(GameId),
    TurnApplied { just_went: Side, up_next: Side },
    GameOver(GameOverStatus),
    Discarded(ClientError),
    Failed(ClientError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TurnRequest {
    EndTurn { side: Side, automatic: bool },
    Stand { optimistic: bool },
    SelectHandCard(usize),
}

enum Completion {
    NewGame {
        epoch: u64,
        result: Result<NewGameResponse, ClientError>,
    },
    Turn {
        game_id: GameId,
        request: TurnRequest,
        result: Result<TurnResponse, ClientError>,
    },
}

/// Drives the request/response cycle against the game server and keeps the
/// local view of whose turn it is, whether the user may act and whether the
/// game has ended.
pub struct TurnCoordinator<S, D> {
    server: Rc<S>,
    delay: Rc<D>,
    settings: CoordinatorSettings,
    session: Option<Session>,
    records: Records,
    phase: Phase,
    epoch: u64,
    in_flight: FuturesUnordered<LocalBoxFuture<'static, Completion>>,
}

impl<S: GameServer + 'static, D: Delay + 'static> TurnCoordinator<S, D> {
    pub fn new(server: Rc<S>, delay: Rc<D>, settings: CoordinatorSettings) -> Self {
        TurnCoordinator {
            server,
            delay,
            settings,
            session: None,
            records: Records::default(),
            phase: Phase::NotStarted,
            epoch: 0,
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn actions_enabled(&self) -> bool {
        self.phase == Phase::AwaitingUserInput
    }

    pub fn has_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Discards the current game and asks the server for a fresh one. Any
    /// response still in flight for the old game is dropped on arrival.
    pub fn start_new_game(&mut self) {
        self.epoch += 1;
        let replacing = self.session.take().map(|session| {
            info!("discarding game {}", session.game_id);
            self.records = Records {
                player: session.player.record,
                opponent: session.opponent.record,
            };
            session.game_id
        });
        self.phase = Phase::RequestInFlight;

        let epoch = self.epoch;
        let server = Rc::clone(&self.server);
        self.in_flight.push(
            async move {
                let result = server.new_game(replacing.as_ref()).await;
                Completion::NewGame { epoch, result }
            }
            .boxed_local(),
        );
    }

    pub fn submit_end_turn(&mut self) -> Result<(), ClientError> {
        let game_id = self.ensure_can_act()?.game_id.clone();
        self.dispatch(
            game_id,
            TurnRequest::EndTurn {
                side: Side::Player,
                automatic: false,
            },
        );
        Ok(())
    }

    // A standing player is never waited on, so passing the phase check also
    // means the player has not stood yet
    pub fn submit_stand(&mut self) -> Result<(), ClientError> {
        self.ensure_can_act()?;
        let optimistic = self.settings.stand_policy == StandPolicy::Optimistic;
        let session = self.session.as_mut().ok_or(ClientError::NotStarted)?;
        if optimistic {
            session.player.is_standing = true;
        }
        let game_id = session.game_id.clone();
        self.dispatch(game_id, TurnRequest::Stand { optimistic });
        Ok(())
    }

    pub fn select_hand_card(&mut self, index: usize) -> Result<(), ClientError> {
        let session = self.ensure_can_act()?;
        let len = session.player.hand.len();
        if index >= len {
            return Err(ClientError::InvalidIndex { index, len });
        }
        let game_id = session.game_id.clone();
        self.dispatch(game_id, TurnRequest::SelectHandCard(index));
        Ok(())
    }

    /// Re-issues the automatic end-turn that failed to reach the server.
    pub fn resume(&mut self) -> Result<(), ClientError> {
        let side = match self.phase {
            Phase::Interrupted(side) => side,
            Phase::GameOver => return Err(ClientError::GameOver),
            _ => return Err(ClientError::NothingToResume),
        };
        let game_id = self
            .session
            .as_ref()
            .ok_or(ClientError::NotStarted)?
            .game_id
            .clone();
        self.dispatch(
            game_id,
            TurnRequest::EndTurn {
                side,
                automatic: true,
            },
        );
        Ok(())
    }

    /// Waits for the next outstanding request to complete and applies it.
    /// Returns `None` when nothing is in flight.
    pub async fn next_event(&mut self) -> Option<Event> {
        let completion = self.in_flight.next().await?;
        Some(self.handle_completion(completion))
    }

    /// Applies completions until no request is left in flight, i.e. until the
    /// user has to act, the game is over or a request failed.
    pub async fn settle<F: FnMut(&Self, Event)>(&mut self, mut observer: F) {
        while let Some(event) = self.next_event().await {
            observer(self, event);
        }
    }

    /// Core transition: folds one end-turn/stand/hand-card response into the
    /// session and decides whether to wait for the user or continue on its own.
    pub fn apply_turn_result(&mut self, response: TurnResponse) -> Result<Transition, ClientError> {
        if self.phase == Phase::GameOver {
            return Ok(Transition::Finished);
        }
        let session = self.session.as_mut().ok_or(ClientError::NotStarted)?;
        if let Some(received) = &response.game_id {
            if *received != session.game_id {
                return Err(ClientError::StaleResponse {
                    expected: Some(session.game_id.clone()),
                    received: received.clone(),
                });
            }
        }

        match resolve_game_status(response.status.value) {
            Ok(resolution) if resolution.is_over => {
                session.turn.game_over = session.turn.game_over.concluded(resolution);
                info!(
                    "game {} is over: {:?}",
                    session.game_id, session.turn.game_over
                );
                self.phase = Phase::GameOver;
                return Ok(Transition::Finished);
            }
            Ok(_) => {}
            Err(err) => {
                error!("{}; treating game {} as still on", err, session.game_id);
            }
        }

        let up_next = response.up_next();
        debug!("{} went, {} is up next", response.just_went(), up_next);
        session.merge(response);
        Ok(self.proceed(up_next))
    }

    fn proceed(&mut self, up_next: Side) -> Transition {
        let Some(session) = self.session.as_mut() else {
            return Transition::Finished;
        };
        session.turn.current_turn = up_next;
        let should_wait_for_user = up_next == Side::Player && !session.player.is_standing;
        if should_wait_for_user {
            self.phase = Phase::AwaitingUserInput;
            return Transition::WaitForUser;
        }
        let game_id = session.game_id.clone();
        self.dispatch(
            game_id,
            TurnRequest::EndTurn {
                side: up_next,
                automatic: true,
            },
        );
        Transition::AutoContinue(up_next)
    }

    fn ensure_can_act(&self) -> Result<&Session, ClientError> {
        match self.phase {
            Phase::AwaitingUserInput => self.session.as_ref().ok_or(ClientError::NotStarted),
            Phase::GameOver => Err(ClientError::GameOver),
            Phase::NotStarted => Err(ClientError::NotStarted),
            Phase::RequestInFlight | Phase::Interrupted(_) => Err(ClientError::ActionsDisabled),
        }
    }

    fn dispatch(&mut self, game_id: GameId, request: TurnRequest) {
        self.phase = Phase::RequestInFlight;
        let server = Rc::clone(&self.server);
        let delay = Rc::clone(&self.delay);
        let delay_policy = self.settings.delay_policy;
        self.in_flight.push(
            async move {
                let result = match request {
                    TurnRequest::EndTurn { side, .. } => server.end_turn(&game_id, side).await,
                    TurnRequest::Stand { .. } => server.stand(&game_id).await,
                    TurnRequest::SelectHandCard(index) => {
                        server.select_hand_card(&game_id, index).await
                    }
                };
                if let Ok(response) = &result {
                    delay.wait(delay_policy.delay_for(response)).await;
                }
                Completion::Turn {
                    game_id,
                    request,
                    result,
                }
            }
            .boxed_local(),
        );
    }

    fn handle_completion(&mut self, completion: Completion) -> Event {
        match completion {
            Completion::NewGame { epoch, result } => self.handle_new_game(epoch, result),
            Completion::Turn {
                game_id,
                request,
                result,
            } => self.handle_turn(game_id, request, result),
        }
    }

    fn handle_new_game(
        &mut self,
        epoch: u64,
        result: Result<NewGameResponse, ClientError>,
    ) -> Event {
        if epoch != self.epoch {
            warn!("dropping new game response from superseded request {}", epoch);
            return match result {
                Ok(response) => Event::Discarded(ClientError::StaleResponse {
                    expected: None,
                    received: response.game_id,
                }),
                Err(err) => Event::Discarded(err),
            };
        }
        match result {
            Ok(response) => {
                if let Some(card) = &response.opening_move {
                    debug!("opening move {}", card);
                }
                let session = Session::new(response, self.records);
                let game_id = session.game_id.clone();
                info!("started game {}", game_id);
                self.session = Some(session);
                self.proceed(Side::Player);
                Event::GameStarted(game_id)
            }
            Err(err) => {
                error!("failed to start a new game: {}", err);
                self.phase = Phase::NotStarted;
                Event::Failed(err)
            }
        }
    }

    fn handle_turn(
        &mut self,
        game_id: GameId,
        request: TurnRequest,
        result: Result<TurnResponse, ClientError>,
    ) -> Event {
        let current = self.session.as_ref().map(|s| s.game_id.clone());
        if current.as_ref() != Some(&game_id) {
            warn!("dropping response for superseded game {}", game_id);
            return Event::Discarded(ClientError::StaleResponse {
                expected: current,
                received: game_id,
            });
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                error!("{:?} failed: {}", request, err);
                self.recover(request);
                return Event::Failed(err);
            }
        };

        let just_went = response.just_went();
        let up_next = response.up_next();
        match self.apply_turn_result(response) {
            Ok(Transition::Finished) => match &self.session {
                Some(session) => Event::GameOver(session.turn.game_over.clone()),
                None => Event::Failed(ClientError::NotStarted),
            },
            Ok(_) => Event::TurnApplied { just_went, up_next },
            Err(err @ ClientError::StaleResponse { .. }) => {
                warn!("{}", err);
                self.recover(request);
                Event::Discarded(err)
            }
            Err(err) => Event::Failed(err),
        }
    }

    // Back to the last consistent state after a request produced nothing usable
    fn recover(&mut self, request: TurnRequest) {
        match request {
            TurnRequest::EndTurn {
                side,
                automatic: true,
            } => {
                self.phase = Phase::Interrupted(side);
            }
            TurnRequest::Stand { optimistic } => {
                if let (true, Some(session)) = (optimistic, self.session.as_mut()) {
                    session.player.is_standing = false;
                }
                self.phase = Phase::AwaitingUserInput;
            }
            TurnRequest::EndTurn { .. } | TurnRequest::SelectHandCard(_) => {
                self.phase = Phase::AwaitingUserInput;
            }
        }
    }
}
