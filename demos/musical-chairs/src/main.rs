use std::process::ExitCode;
use std::time::Duration;

use chairs::prelude::*;
use clap::Parser;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "musical-chairs")]
#[command(about = "N players race for N-1 seats until one is left")]
struct Cli {
    /// Number of players
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=1024))]
    players: u32,

    /// How long the music plays each round, in milliseconds
    #[arg(long, default_value_t = 2000)]
    music_ms: u64,

    /// Random extra music time per round (0..jitter), in milliseconds
    #[arg(long, default_value_t = 0)]
    music_jitter_ms: u64,

    /// Pause seated players take between rounds, in milliseconds
    #[arg(long, default_value_t = 100)]
    settle_ms: u64,

    /// Give up on a round if players haven't all reported within this
    /// many milliseconds (0 waits forever)
    #[arg(long, default_value_t = 5000)]
    rendezvous_timeout_ms: u64,

    /// Stop after this many rounds even without a winner
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Event output: text or json
    #[arg(short, long, default_value = "text")]
    format: EventFormat,

    /// Tracing filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn builder(&self) -> MusicalChairsBuilder {
        let timeout = match self.rendezvous_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        MusicalChairs::builder()
            .players(self.players as usize)
            .max_rounds(self.max_rounds)
            .music(Duration::from_millis(self.music_ms))
            .music_jitter(Duration::from_millis(self.music_jitter_ms))
            .settle(Duration::from_millis(self.settle_ms))
            .rendezvous_timeout(timeout)
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(&cli).await {
        Ok(report) => {
            tracing::info!(
                winner = ?report.winner,
                rounds = report.rounds,
                end = ?report.end,
                "game finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            if e.is_protocol_violation() {
                tracing::error!(error = %e, "round protocol broke, aborting");
            }
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<GameReport, ChairsError> {
    let game = cli.builder().build()?;
    let encoder = cli.format.encoder();
    game.run_printing(encoder.as_ref(), tokio::io::stdout()).await
}
