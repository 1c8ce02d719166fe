//! social-client - Terminal front-end for the client core
//!
//! Run with: cargo run --bin social-client -- chunks "hello #world"

use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use social_client_core::{
    config::ClientConfig,
    get_chunks, highlight, logging,
    AnimatedPresence, Catalog, Error, HighlightStyle, PresenceConfig, PresenceState,
    ResendCountdown, SharedClock, SystemClock,
};

#[derive(Parser)]
#[command(name = "social-client", version, about)]
struct Cli {
    /// Config file (TOML)
    #[arg(long, env = "SOCIAL_CLIENT_CONFIG", default_value = "social-client.toml")]
    config: PathBuf,

    /// Log verbosity when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the text/hashtag chunks of TEXT
    Chunks {
        text: String,
        /// Emit JSON instead of one chunk per line
        #[arg(long)]
        json: bool,
    },
    /// Print TEXT with hashtags highlighted
    Highlight { text: String },
    /// Run a resend countdown in the terminal
    Countdown {
        /// Seconds until resend (defaults to the configured window)
        #[arg(long)]
        secs: Option<u64>,
    },
    /// Play an animation preset and print its opacity curve
    Presence {
        preset: String,
        /// Frames per second
        #[arg(long, default_value_t = 20)]
        fps: u32,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> social_client_core::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log);

    let config = ClientConfig::load(&cli.config)?.with_env_overrides();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Chunks { text, json } => {
            let chunks = get_chunks(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&chunks)?);
            } else {
                for chunk in &chunks {
                    let kind = if chunk.is_hashtag() { "hashtag" } else { "text" };
                    println!("{kind:>8} {:?}", chunk.content());
                }
            }
        }
        Command::Highlight { text } => {
            println!("{}", highlight(&text, &HighlightStyle::default()));
        }
        Command::Countdown { secs } => {
            let clock: SharedClock = Rc::new(SystemClock);
            let secs = secs.unwrap_or(config.default_resend_secs);
            let expires_at = resend_deadline(clock.now(), secs)?;
            let countdown = ResendCountdown::new(expires_at, clock);
            let catalog = Catalog::english();

            print_line(&countdown.label(&catalog))?;

            let ticker = countdown.run(config.countdown_tick());
            tokio::pin!(ticker);
            let mut redraw = tokio::time::interval(config.countdown_tick());
            loop {
                tokio::select! {
                    _ = &mut ticker => break,
                    _ = redraw.tick() => print_line(&countdown.label(&catalog))?,
                }
            }
            print_line(&countdown.label(&catalog))?;
            println!();
        }
        Command::Presence { preset, fps } => {
            let clock: SharedClock = Rc::new(SystemClock);
            let mut presence =
                AnimatedPresence::new(PresenceConfig::named(&preset)?.start(true), clock);
            let mut frames = tokio::time::interval(Duration::from_millis(1000 / fps.max(1) as u64));
            loop {
                frames.tick().await;
                let visual = presence.tick();
                let bar = "#".repeat((visual.opacity * 40.0).round() as usize);
                println!(
                    "{bar:<40} opacity={:.2} y={:+.1} scale={:.2}",
                    visual.opacity, visual.offset_y, visual.scale
                );
                if presence.state() == PresenceState::Settled {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn print_line(text: &str) -> io::Result<()> {
    let mut out = io::stdout();
    write!(out, "\r{text}    ")?;
    out.flush()
}

/// Instant `secs` seconds after `now`, rejecting values chrono cannot hold.
fn resend_deadline(
    now: chrono::DateTime<chrono::Utc>,
    secs: u64,
) -> social_client_core::Result<chrono::DateTime<chrono::Utc>> {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|window| now.checked_add_signed(window))
        .ok_or_else(|| Error::configuration(format!("--secs {secs} is out of range")))
}
