use crate::coordinator::{Event, Phase, Session};
use common::{PlayerState, Side};
use std::fmt::Write;
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  end       end your turn
  stand     stand for the rest of the game
  hand <n>  play card <n> from your hand
  new       start over with a new game
  retry     resend a turn that failed to reach the server
  peek      show or hide the opponent's hand
  record    show or hide win/loss records
  help      show this message
  quit      leave the table";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    EndTurn,
    Stand,
    // Zero-based, although players type the one-based number shown on screen
    Hand(usize),
    NewGame,
    Retry,
    Peek,
    Record,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    Unknown(String),
    #[error("'hand' needs the number of the card to play")]
    MissingIndex,
    #[error("'{0}' is not a card number")]
    BadIndex(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_lowercase();
        match command.as_str() {
            "end" | "e" => Ok(Command::EndTurn),
            "stand" | "s" => Ok(Command::Stand),
            "hand" | "h" => {
                let number = words.next().ok_or(CommandError::MissingIndex)?;
                number
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .map(Command::Hand)
                    .ok_or_else(|| CommandError::BadIndex(number.to_string()))
            }
            "new" => Ok(Command::NewGame),
            "retry" => Ok(Command::Retry),
            "peek" => Ok(Command::Peek),
            "record" => Ok(Command::Record),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(command)),
        }
    }
}

/// Display toggles that survive starting over.
#[derive(Clone, Copy, Debug, Default)]
pub struct View {
    pub show_opponent_hand: bool,
    pub show_records: bool,
}

pub fn describe(event: &Event) -> Option<String> {
    match event {
        Event::GameStarted(game_id) => Some(format!("New game {}", game_id)),
        Event::TurnApplied {
            just_went: Side::Opponent,
            ..
        } => Some("Opponent played".to_string()),
        Event::TurnApplied { .. } => None,
        Event::GameOver(status) => status.message.clone(),
        Event::Discarded(_) => None,
        Event::Failed(err) => Some(format!("Error: {}", err)),
    }
}

pub fn render(session: Option<&Session>, phase: Phase, view: &View) -> String {
    let Some(session) = session else {
        return match phase {
            Phase::NotStarted => "No game running. Type 'new' to start one.".to_string(),
            _ => "Waiting for the server...".to_string(),
        };
    };
    let mut out = String::new();
    if let Some(message) = &session.turn.game_over.message {
        let _ = writeln!(out, "*** {} ***", message);
    }
    render_side(&mut out, "You", &session.player, true, view);
    render_side(
        &mut out,
        "Opponent",
        &session.opponent,
        view.show_opponent_hand,
        view,
    );
    let status = match phase {
        Phase::AwaitingUserInput => "Your move (end, stand, hand <n>)".to_string(),
        Phase::Interrupted(side) => format!("Lost contact while {} was up. Type 'retry'", side),
        Phase::GameOver => "Game over. Type 'new' to play again".to_string(),
        Phase::RequestInFlight => format!("Waiting on {}", session.turn.current_turn),
        Phase::NotStarted => String::new(),
    };
    out.push_str(&status);
    out
}

fn render_side(out: &mut String, name: &str, state: &PlayerState, show_hand: bool, view: &View) {
    let standing = if state.is_standing { " (standing)" } else { "" };
    let _ = write!(out, "{}: {}{}", name, state.score, standing);
    if view.show_records {
        let _ = write!(out, " [{}]", state.record);
    }
    out.push('\n');
    let placed: Vec<String> = state.placed.iter().map(ToString::to_string).collect();
    let _ = writeln!(out, "  table: {}", placed.join(" "));
    let hand: Vec<String> = state
        .hand
        .iter()
        .enumerate()
        .map(|(i, card)| {
            if show_hand {
                format!("{}){}", i + 1, card)
            } else {
                format!("{})??", i + 1)
            }
        })
        .collect();
    let _ = writeln!(out, "  hand:  {}", hand.join(" "));
}
