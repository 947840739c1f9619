use async_trait::async_trait;
use common::messages::TurnResponse;
use common::Side;
use std::time::Duration;

/// Suspends before a response is applied so the player can follow the
/// opponent's moves. Injectable so tests can run without timers.
#[async_trait(?Send)]
pub trait Delay {
    async fn wait(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait(?Send)]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

#[async_trait(?Send)]
impl Delay for NoDelay {
    async fn wait(&self, _duration: Duration) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    pub standing: Duration,
    pub opponent: Duration,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        DelayPolicy {
            standing: Duration::from_millis(500),
            opponent: Duration::from_millis(750),
        }
    }
}

impl DelayPolicy {
    pub fn none() -> Self {
        DelayPolicy {
            standing: Duration::ZERO,
            opponent: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, response: &TurnResponse) -> Duration {
        match response.just_went() {
            Side::Player if response.is_standing => self.standing,
            Side::Player => Duration::ZERO,
            Side::Opponent => self.opponent,
        }
    }
}
