pub mod cli;
pub mod config;
pub mod coordinator;
pub mod delay;
pub mod error;
pub mod requests;
pub mod server;

pub use coordinator::{Event, Phase, Session, StandPolicy, TurnCoordinator};
pub use error::ClientError;
