//! Console harness and entry point.
//!
//! This binary wires the tradesite engine to a line-oriented console so the
//! whole pipeline can be exercised by hand: fetch, cache, mode filtering,
//! debounced search, and the reconciliation loop. It is a smoke-testing
//! surface, not a product UI; embedding applications provide their own
//! [`PresentationSurface`] and command rendering.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │   stdin line loop        │  ← gestures in
//! │  ┌────────────────────┐  │
//! │  │  QueryController   │  │  ← debounce + search
//! │  └────────────────────┘  │
//! │          │ commands      │
//! │          ▼               │
//! │  ┌────────────────────┐  │
//! │  │  printer task      │  │  ← panels out (stdout)
//! │  └────────────────────┘  │
//! └──────────────────────────┘
//! ```
//!
//! Log output goes to stderr, so panels stay readable when `RUST_LOG` is set.
//!
//! # Commands
//!
//! - plain text: mirror the line into the search field (debounced search)
//! - empty line: focus the field (recent-articles panel)
//! - `:switch`: flip the display mode and persist it
//! - `:open`: activate the top visible result
//! - `:clear`: clear the field and close the panel
//! - `:quit` / `:q`: exit

#![allow(clippy::multiple_crate_versions)]

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tradesite::app::LOADING_MESSAGE;
use tradesite::{
    initialize, Config, PanelState, PresentationSurface, QueryEvent, SiteMode, SurfaceCommand,
};

/// Presentation surface that mirrors mode state onto the console.
///
/// The reconciliation loop drives this exactly like it would a real page:
/// styling is "applied" by remembering it, the switch label is refreshed on
/// every pass.
struct ConsoleSurface {
    applied: Mutex<Option<SiteMode>>,
    switch_label: Mutex<String>,
}

impl ConsoleSurface {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            applied: Mutex::new(None),
            switch_label: Mutex::new(String::new()),
        })
    }
}

impl PresentationSurface for ConsoleSurface {
    fn applied_mode(&self) -> Option<SiteMode> {
        *self.applied.lock()
    }

    fn apply_mode(&self, mode: SiteMode) {
        *self.applied.lock() = Some(mode);
        println!("[surface] {} styling applied", mode.label());
    }

    fn set_switch_label(&self, label: &str) {
        // Refreshed every enforcement pass; only changes are worth printing.
        let mut current = self.switch_label.lock();
        if *current != label {
            label.clone_into(&mut current);
            println!("[surface] switch now offers: {label}");
        }
    }
}

/// Spawns the task that prints surface commands as they arrive.
///
/// Commands appear asynchronously (debounced searches fire after their
/// window), so printing happens on a dedicated task instead of inline with
/// the input loop.
fn spawn_command_printer(
    mut commands: mpsc::UnboundedReceiver<SurfaceCommand>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(command) = commands.recv().await {
            render_command(&command);
        }
    })
}

fn render_command(command: &SurfaceCommand) {
    match command {
        SurfaceCommand::ShowPanel(panel) => render_panel(panel),
        SurfaceCommand::HidePanel => println!("[panel] hidden"),
        SurfaceCommand::SetClearVisible(visible) => {
            let state = if *visible { "shown" } else { "hidden" };
            println!("[input] clear control {state}");
        }
        SurfaceCommand::Navigate(url) => println!("[nav] opening {url}"),
    }
}

fn render_panel(panel: &PanelState) {
    match panel {
        PanelState::Loading => println!("[panel] {LOADING_MESSAGE}"),
        PanelState::Results { header, items } => {
            println!("[panel] {header}");
            for item in items {
                let date = if item.date.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", item.date)
                };
                println!("  - {} [{}]{} {}", item.title, item.category, date, item.url);
            }
        }
        PanelState::NoResults { message } => println!("[panel] {message}"),
    }
}

#[tokio::main]
async fn main() -> tradesite::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };
    tradesite::observability::init_tracing(&config);
    tracing::debug!("console harness starting");

    let engine = initialize(&config)?;
    engine.start(ConsoleSurface::new());

    let (sink, commands) = mpsc::unbounded_channel();
    let printer = spawn_command_printer(commands);
    let controller = engine.controller(sink);

    println!("tradesite console harness");
    println!("type to search; :switch flips the mode, :open follows the top hit,");
    println!(":clear resets the field, :quit exits");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupt received");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    ":quit" | ":q" => break,
                    ":switch" => {
                        let next = engine.mode_store().switch()?;
                        println!("[mode] now {}", next.label());
                    }
                    ":open" => controller.handle(QueryEvent::Submitted),
                    ":clear" => controller.handle(QueryEvent::Cleared),
                    "" => controller.handle(QueryEvent::Focused),
                    _ => controller.handle(QueryEvent::InputChanged(line.clone())),
                }
            }
        }
    }

    engine.shutdown();
    printer.abort();
    tracing::debug!("console harness stopped");
    Ok(())
}
