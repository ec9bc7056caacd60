use clap::Parser;
use client::config::{Config, LogFormat, PhaseDurations};
use client::domain::Catalog;
use client::runtime::{driver, UserIntent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

mod telemetry;

#[derive(Parser)]
#[command(name = "client")]
#[command(about = "Terminal client for the multiplayer card game")]
struct Args {
    /// Game server base URL (http(s) or ws(s))
    #[arg(long, env = "GAME_SERVER_URL")]
    server_url: String,

    /// Username to play as
    #[arg(long, env = "GAME_USERNAME")]
    username: String,

    /// Bearer token for the Socket.IO handshake
    #[arg(long, env = "GAME_TOKEN", hide_env_values = true)]
    token: String,

    /// Lobby code to join
    #[arg(long, env = "GAME_LOBBY_CODE")]
    lobby: String,

    /// Score reveal step length in milliseconds (0 = instant)
    #[arg(long, env = "ANIMATION_SPEED_MS", default_value_t = 400)]
    animation_speed_ms: u64,

    /// Show locally drawn filler cards until the server deals
    #[arg(long, env = "PROVISIONAL_DRAW")]
    provisional_draw: bool,

    /// Fallback phase lengths in seconds, phases 0..=4
    #[arg(long, env = "PHASE_DURATIONS", default_value = "30,120,60,30,10")]
    phase_durations: PhaseDurations,

    /// Log output format
    #[arg(long, env = "CLIENT_LOG_FORMAT", default_value = "json")]
    log_format: LogFormat,
}

impl Args {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.server_url, self.username, self.token, self.lobby);
        config.animation_speed_ms = self.animation_speed_ms;
        config.provisional_draw = self.provisional_draw;
        config.phase_durations = self.phase_durations;
        config.log_format = self.log_format;
        config
    }
}

/// Forward stdin lines as intents until EOF or shutdown.
async fn read_commands(tx: mpsc::Sender<UserIntent>, shutdown: CancellationToken) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => return,
            line = lines.next_line() => line,
        };
        match line {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => match line.parse::<UserIntent>() {
                Ok(intent) => {
                    if tx.send(intent).await.is_err() {
                        return;
                    }
                }
                Err(err) => warn!(error = %err, "unrecognized command"),
            },
            Ok(None) => return,
            Err(err) => {
                warn!(error = %err, "stdin read failed");
                return;
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let config = Args::parse().into_config();
    telemetry::init_tracing(config.log_format);

    let shutdown = CancellationToken::new();
    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(read_commands(tx, shutdown.clone()));
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    info!(lobby = %config.lobby_code, user = %config.username, "starting client");
    if let Err(err) = driver::run(config, Catalog::standard(), rx, shutdown.clone()).await {
        error!(error = %err, "client stopped");
        shutdown.cancel();
        std::process::exit(1);
    }
    shutdown.cancel();
}
