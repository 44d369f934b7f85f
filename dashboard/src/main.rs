use std::io::{self, BufRead, IsTerminal, Stdout, Write};

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use common::logger::init_tracing;
use dashboard::{
    cli::Cli,
    command::Command,
    config::AppConfig,
    error::AppError,
    render::render_frame,
    session::{DashboardSession, Frame},
};

/// Where frames go: text table (cleared in place on a terminal) or JSON lines.
struct Screen {
    stdout: Stdout,
    json: bool,
    clear: bool,
}

impl Screen {
    fn new(json: bool) -> Self {
        let stdout = io::stdout();
        let clear = !json && stdout.is_terminal();

        Self {
            stdout,
            json,
            clear,
        }
    }

    fn draw(&self, frame: &Frame) -> Result<(), AppError> {
        let mut out = self.stdout.lock();

        if self.json {
            serde_json::to_writer(&mut out, frame)?;
            writeln!(out)?;
        } else {
            if self.clear {
                write!(out, "\x1b[2J\x1b[H")?;
            }
            writeln!(out, "{}", render_frame(frame))?;
        }

        out.flush()?;
        Ok(())
    }
}

/// Forward stdin lines from a plain thread; a blocked read must not keep the
/// runtime alive at shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);

    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    rx
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = AppConfig::from_env().context("failed to load configuration")?;
    cli.apply(&mut cfg);

    init_tracing("crypto-feed", cfg.json_logs);

    info!("Starting crypto-feed...");

    let render_interval = cfg.render_interval;
    let mut session = DashboardSession::start(cfg);
    info!(trace_id = %session.trace_id(), "session ready; type `search <term>`, `sort <key>`, `clear` or `quit`");

    let mut updates = session.subscribe().await;
    let mut commands = spawn_stdin_reader();

    let mut redraw = interval_at(Instant::now() + render_interval, render_interval);
    redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let screen = Screen::new(cli.json);
    screen.draw(&session.frame().await)?;

    let mut ticks = 0u64;

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                res.context("failed to listen for ctrl-c")?;
                info!("Shutdown signal received");
                break;
            }

            Some(snapshot) = updates.recv() => {
                ticks += 1;
                debug!(seq = snapshot.seq, "snapshot received");
                screen.draw(&session.frame().await)?;

                if cli.ticks.is_some_and(|limit| ticks >= limit) {
                    info!(ticks, "tick limit reached");
                    break;
                }
            }

            // JSON output follows the feed only.
            _ = redraw.tick(), if !cli.json => {
                screen.draw(&session.frame().await)?;
            }

            Some(line) = commands.recv() => {
                if line.trim().is_empty() {
                    continue;
                }

                match line.parse::<Command>() {
                    Ok(cmd) => {
                        if !session.apply(cmd) {
                            break;
                        }
                        screen.draw(&session.frame().await)?;
                    }
                    Err(e) => warn!(error = %e, "command ignored"),
                }
            }
        }
    }

    session.shutdown();

    Ok(())
}
