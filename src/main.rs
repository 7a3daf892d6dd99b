// EMS Log Filter - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml and logging initialisation
// 3. Selection memory loading
// 4. Either a one-shot headless save or the eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can use
// `crate::app::...`, `crate::ui::...` etc.
pub use ems_log_filter::app;

pub use ems_log_filter::core;
pub use ems_log_filter::platform;
pub use ems_log_filter::ui;
pub use ems_log_filter::util;

use crate::app::headless::HeadlessOptions;
use crate::core::model::KeySelectionMode;
use clap::Parser;
use std::path::PathBuf;

/// EMS Log Filter - reduce FortiClient EMS logs to the fields you care about.
///
/// Load a key=value log, tick the keys to keep, optionally filter by text,
/// and save a timestamped result next to the source file.
#[derive(Parser, Debug)]
#[command(name = "ems-log-filter", version, about)]
struct Cli {
    /// Log file to load at startup (required with --headless).
    path: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Directory holding config.toml and the remembered checkbox state.
    #[arg(long = "state-dir")]
    state_dir: Option<PathBuf>,

    /// Filter and save without opening a window, then print the output path.
    #[arg(long, requires = "path")]
    headless: bool,

    /// Key to keep in the output (repeatable). Defaults to the remembered selection.
    #[arg(short = 'k', long = "key")]
    keys: Vec<String>,

    /// Only keep entries containing this text.
    #[arg(short = 'f', long = "filter")]
    filter: Option<String>,

    /// Drop entries containing the filter text instead of keeping them.
    #[arg(short = 'x', long = "exclude")]
    exclude: bool,

    /// Match the filter text case-insensitively.
    #[arg(short = 'i', long = "ignore-case")]
    ignore_case: bool,

    /// Lines of context before each matching entry.
    #[arg(short = 'B', long = "before")]
    before: Option<usize>,

    /// Lines of context after each matching entry.
    #[arg(short = 'A', long = "after")]
    after: Option<usize>,

    /// Lines of context on both sides.
    #[arg(short = 'C', long = "context", conflicts_with_all = ["before", "after"])]
    context: Option<usize>,

    /// How checked keys are used: project, require or both.
    #[arg(long = "key-mode")]
    key_mode: Option<KeySelectionMode>,

    /// Do not open the saved file in an editor.
    #[arg(long = "no-open")]
    no_open: bool,
}

fn main() {
    let cli = Cli::parse();

    // Resolve platform paths: CLI override > platform default
    let platform_paths = match &cli.state_dir {
        Some(dir) => platform::config::PlatformPaths::with_config_dir(dir.clone()),
        None => platform::config::PlatformPaths::resolve(),
    };

    let (config, config_warnings) = platform::config::load_config(&platform_paths.config_dir);

    // Initialise logging subsystem
    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        state_dir = %platform_paths.config_dir.display(),
        "EMS Log Filter starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    let (mut memory, memory_warnings) = app::memory::SelectionMemory::load(&platform_paths.config_dir);
    for warning in &memory_warnings {
        tracing::warn!(warning = %warning, "Selection memory warning");
    }

    let editor = platform::editor::configured_editor(&config, cli.no_open);

    if cli.headless {
        let Some(input) = cli.path.clone() else {
            eprintln!("Error: --headless needs a log file");
            std::process::exit(2);
        };
        let options = HeadlessOptions {
            input,
            keys: cli.keys,
            filter_text: cli.filter,
            exclude: cli.exclude,
            ignore_case: cli.ignore_case,
            lines_before: cli.context.or(cli.before),
            lines_after: cli.context.or(cli.after),
            key_mode: cli.key_mode,
        };
        match app::headless::run(&options, &config, &mut memory, &*editor) {
            Ok(outcome) => {
                if let Some(e) = &outcome.memory_error {
                    eprintln!("Warning: checkbox state not saved: {e}");
                }
                if let Some(e) = &outcome.editor_error {
                    eprintln!("Warning: {e}");
                }
                tracing::info!(summary = %outcome.summary(), "Headless run finished");
                println!("{}", outcome.path.display());
            }
            Err(e) => {
                tracing::error!(error = %e, "Headless run failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    // Create application state
    let mut state = app::state::AppState::new(config, memory, cli.debug);
    state.warnings.extend(config_warnings);
    state.warnings.extend(memory_warnings);
    if let Some(mode) = cli.key_mode {
        state.key_mode = mode;
    }
    if cli.ignore_case {
        state.case_sensitive = false;
    }
    if let Some(text) = cli.filter {
        state.filter_text = text;
    }
    state.filter_out = cli.exclude;
    if let Some(n) = cli.context.or(cli.before) {
        state.lines_before = n;
    }
    if let Some(n) = cli.context.or(cli.after) {
        state.lines_after = n;
    }

    // If a path was provided on the CLI, load it once the window is up
    if let Some(ref path) = cli.path {
        state.pending_load = Some(path.clone());
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size(ui::theme::WINDOW_SIZE)
            .with_min_inner_size(ui::theme::MIN_WINDOW_SIZE),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |_cc| Ok(Box::new(gui::EmsLogFilterApp::new(state, editor)))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch EMS Log Filter GUI: {e}");
        std::process::exit(1);
    }
}
