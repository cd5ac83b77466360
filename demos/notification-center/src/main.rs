//! Notification center TUI - edu-notify example
//!
//! One loop owns the notification center:
//! 1. Terminal events -> components -> AppActions
//! 2. Event sources (simulated producer) -> IncomingEvent -> records
//! 3. Severe records -> ChannelAlertSink -> toasts
//! 4. Action buttons -> ActionTasks -> ActionOutcome -> loading state cleared
//! 5. If anything changed, re-render
//!
//! # Usage
//!
//! ```sh
//! # Simulated notifications every 5s, always
//! cargo run -p notification-center -- --interval 5 --probability 1
//!
//! # Read settings from a JSON file, no simulation
//! cargo run -p notification-center -- --config center.json --no-sim
//!
//! # Log store actions before and after they apply
//! RUST_LOG=debug cargo run -p notification-center -- --verbose
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use edu_notify::{
    process_raw_event, spawn_event_poller, ActionRegistry, CenterConfig, ChannelAlertSink,
    ConfigError, EventSources, LoggingMiddleware, NotificationCenter, NotificationStore, RawEvent,
};
use notification_center::{register_demo_actions, seed, App, AppAction};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Redraw period for relative timestamps and toast expiry
const TICK: Duration = Duration::from_secs(1);

/// Notification center TUI - edu-notify example
#[derive(Parser, Debug)]
#[command(name = "notification-center")]
#[command(about = "A notification and messaging center demonstrating edu-notify")]
struct Args {
    /// JSON file with center settings
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Seconds between simulated producer rolls
    #[arg(long, short)]
    interval: Option<u64>,

    /// Chance (0..=1) that a roll produces a notification
    #[arg(long, short)]
    probability: Option<f64>,

    /// Seed for the simulated producer
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the simulated producer
    #[arg(long)]
    no_sim: bool,

    /// Also log every store action before it is applied
    #[arg(long, short)]
    verbose: bool,

    /// Where to write logs (the terminal is owned by the UI)
    #[arg(long, default_value = "notification-center.log")]
    log_file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum LoadConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn load_config(args: &Args) -> Result<CenterConfig, LoadConfigError> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|source| LoadConfigError::Read {
                path: path.clone(),
                source,
            })?;
            CenterConfig::from_json_str(&json)?
        }
        None => CenterConfig::new(),
    };

    if let Some(secs) = args.interval {
        config = config.with_interval_secs(secs);
    }
    if let Some(p) = args.probability {
        config = config.with_probability(p);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if args.no_sim {
        config = config.without_simulation();
    }
    config.validate()?;
    Ok(config)
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,edu_notify_core=debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    init_logging(&args.log_file)?;
    tracing::info!(?config, "Starting notification center");

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let middleware = if args.verbose {
        LoggingMiddleware::verbose()
    } else {
        LoggingMiddleware::new()
    };
    let result = run_app(&mut terminal, config, middleware).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: CenterConfig,
    middleware: LoggingMiddleware,
) -> io::Result<()> {
    let (alert_tx, mut alert_rx) = mpsc::unbounded_channel();
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
    let (incoming_tx, mut incoming_rx) = mpsc::unbounded_channel();

    let mut registry = ActionRegistry::new();
    register_demo_actions(&mut registry);

    let store = NotificationStore::with_middleware(middleware);
    let center = NotificationCenter::new(store)
        .with_alert_sink(ChannelAlertSink::new(alert_tx))
        .with_registry(registry);

    let mut app = App::new(center, outcome_tx, config.toast_ttl());
    seed(&mut app.center);

    // Producers
    let mut sources = EventSources::new(incoming_tx);
    if let Some(simulated) = config.simulated_source() {
        sources.attach("simulated", simulated);
    }

    // Event poller
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RawEvent>();
    let cancel_token = CancellationToken::new();
    let _poller = spawn_event_poller(
        event_tx,
        Duration::from_millis(10),
        Duration::from_millis(16),
        cancel_token.clone(),
    );

    let mut tick = tokio::time::interval(TICK);
    let mut should_render = true;

    'main: loop {
        if should_render {
            terminal.draw(|frame| app.render(frame))?;
            should_render = false;
        }

        let actions = tokio::select! {
            Some(raw) = event_rx.recv() => app.handle_event(&process_raw_event(raw)),
            Some(event) = incoming_rx.recv() => vec![AppAction::Incoming(event)],
            Some(alert) = alert_rx.recv() => vec![AppAction::Alert(alert)],
            Some(outcome) = outcome_rx.recv() => vec![AppAction::ActionFinished(outcome)],
            _ = tick.tick() => vec![AppAction::Tick],
            _ = cancel_token.cancelled() => break 'main,
        };

        for action in actions {
            if action == AppAction::Quit {
                break 'main;
            }
            should_render |= app.update(action);
        }
    }

    cancel_token.cancel();
    sources.cancel_all();
    app.tasks.cancel_all();
    tracing::info!("Notification center stopped");
    Ok(())
}
