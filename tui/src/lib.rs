// Forbid accidental stdout/stderr writes in the library portion of the TUI:
// the terminal is in raw alternate-screen mode while the widget runs.
#![deny(clippy::print_stdout, clippy::print_stderr)]

use std::fs::OpenOptions;

use color_eyre::Result;
use crossterm::ExecutableCommand;
use crossterm::event::DisableFocusChange;
use crossterm::event::EnableFocusChange;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod app;
mod app_event;
mod cli;
mod debounce;
mod line_metrics;
mod staged_input;

use app::App;
pub use cli::Cli;
pub use debounce::Debouncer;
pub use line_metrics::LineMetrics;
pub use line_metrics::MeasureFn;
pub use line_metrics::measure;
pub use staged_input::CommitCallback;
pub use staged_input::RESIZE_MAX_WAIT;
pub use staged_input::RESIZE_QUIET_WINDOW;
pub use staged_input::StagedInput;
pub use staged_input::StagedInputConfig;

/// Run the demo shell: mount one staging editor over a committed-items list
/// and drive it until the user quits with Esc or Ctrl+C.
pub async fn run_main(cli: Cli) -> Result<()> {
    let _log_guard = init_logging()?;
    let mut terminal = ratatui::init();
    let _ = std::io::stdout().execute(EnableFocusChange);
    let result = App::new(&cli).run(&mut terminal).await;
    let _ = std::io::stdout().execute(DisableFocusChange);
    ratatui::restore();
    result
}

/// Route tracing output to a file: the terminal itself is busy rendering the
/// UI, so nothing may log to stdout/stderr while the app runs.
fn init_logging() -> Result<WorkerGuard> {
    let log_path = std::env::temp_dir().join("linestage-tui.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    let (writer, guard) = tracing_appender::non_blocking(log_file);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| color_eyre::eyre::eyre!("failed to initialize logging: {err}"))?;
    Ok(guard)
}
