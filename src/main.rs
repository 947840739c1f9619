use clap::Parser;
use pazaak_client::cli::{describe, render, Command, View, HELP};
use pazaak_client::config::ClientConfig;
use pazaak_client::coordinator::{CoordinatorSettings, StandPolicy, TurnCoordinator};
use pazaak_client::delay::{DelayPolicy, TokioDelay};
use pazaak_client::requests::{HttpGameServer, RequestService};
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(version, about = "Play Pazaak against a remote game server")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base URL of the game server
    #[arg(long)]
    server: Option<String>,
    /// Show the stand before the server confirms it
    #[arg(long)]
    optimistic_stand: bool,
    /// Apply every response as soon as it arrives
    #[arg(long)]
    no_delay: bool,
    #[arg(long)]
    show_opponent_hand: bool,
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if self.optimistic_stand {
            config.stand_policy = StandPolicy::Optimistic;
        }
        if self.no_delay {
            config.standing_delay_ms = 0;
            config.opponent_delay_ms = 0;
        }
        if self.show_opponent_hand {
            config.show_opponent_hand = true;
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = log_dir.clone();
        }
    }
}

type Coordinator = TurnCoordinator<HttpGameServer, TokioDelay>;

async fn settle_and_render(coordinator: &mut Coordinator, view: &View) {
    coordinator
        .settle(|_, event| {
            if let Some(line) = describe(&event) {
                println!("{}", line);
            }
        })
        .await;
    println!("{}", render(coordinator.session(), coordinator.phase(), view));
    prompt();
}

fn prompt() {
    print!("> ");
    if let Err(err) = std::io::stdout().flush() {
        warn!("could not flush prompt: {}", err);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "client.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(non_blocking)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    info!("starting client against {}", config.server_url);

    let requests = RequestService::new(config.server_url.as_str(), config.request_timeout())?;
    let settings: CoordinatorSettings = config.coordinator_settings();
    if settings.delay_policy == DelayPolicy::none() {
        info!("response delays disabled");
    }
    let mut coordinator = TurnCoordinator::new(
        Rc::new(HttpGameServer::new(requests)),
        Rc::new(TokioDelay),
        settings,
    );
    let mut view = View {
        show_opponent_hand: config.show_opponent_hand,
        show_records: false,
    };

    println!("{}", HELP);
    coordinator.start_new_game();
    settle_and_render(&mut coordinator, &view).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            prompt();
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                println!("{}", err);
                prompt();
                continue;
            }
        };
        let result = match command {
            Command::EndTurn => coordinator.submit_end_turn(),
            Command::Stand => coordinator.submit_stand(),
            Command::Hand(index) => coordinator.select_hand_card(index),
            Command::NewGame => {
                coordinator.start_new_game();
                Ok(())
            }
            Command::Retry => coordinator.resume(),
            Command::Peek => {
                view.show_opponent_hand = !view.show_opponent_hand;
                Ok(())
            }
            Command::Record => {
                view.show_records = !view.show_records;
                Ok(())
            }
            Command::Help => {
                println!("{}", HELP);
                Ok(())
            }
            Command::Quit => break,
        };
        if let Err(err) = result {
            warn!("rejected {:?}: {}", command, err);
            println!("{}", err);
        }
        settle_and_render(&mut coordinator, &view).await;
    }
    info!("client exiting");
    Ok(())
}
