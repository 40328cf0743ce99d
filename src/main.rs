//! The tool's entrypoint file.
mod args;
mod commands;
mod config;
mod consts;
mod fs_manager;
mod logging;
mod reset;
mod time;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{error, info, warn};

use config::Config;
use consts::messages;
use logging::{ActionLog, ActionSink};
use reset::{CancelToken, ResetError, ResetOptions, ResetOutcome};

/// Set while files are being removed; Ctrl+C then stops the scan instead of exiting.
static RESET_RUNNING: AtomicBool = AtomicBool::new(false);

fn main() {
    let args = args::init();

    // This must executes as early as possible
    logging::init(if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });

    let cancel = CancelToken::new();
    if let Err(e) = init_ctrlc_handler(cancel.clone()) {
        error!("Failed to install the Ctrl+C handler: {e}");
        gracefully_exit(ExitCode::Failure);
    }

    let config = match Config::load(&args.config_path()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load the configuration: {e}");
            gracefully_exit(ExitCode::Failure);
        }
    };

    let selection = match &args.region {
        Some(input) => commands::parse_selection(input, config.regions.len()),
        None => commands::prompt_region(&config.regions, io::stdin().lock(), io::stdout()),
    };
    let selection = match selection {
        Ok(index) => index,
        Err(e) => {
            println!("{}", messages::invalid_selection(&e.to_string()));
            gracefully_exit(ExitCode::InvalidSelection(e.exit_code()));
        }
    };

    let options = ResetOptions {
        dry_run: args.dry_run,
        cancel,
    };

    match run(&config, selection, &options) {
        Ok(outcome) if outcome.cancelled => gracefully_exit(ExitCode::CtrlC),
        Ok(outcome) if outcome.failed_deletions > 0 => gracefully_exit(ExitCode::PartialFailure),
        Ok(_) => gracefully_exit(ExitCode::Success),
        Err(e) => {
            error!("Failed to reset the region: {e}");
            gracefully_exit(ExitCode::Failure);
        }
    }
}

/// Resets the region at `selection`, framing the run in the action log.
fn run(
    config: &Config,
    selection: usize,
    options: &ResetOptions,
) -> Result<ResetOutcome, ResetError> {
    let region = &config.regions[selection];

    let mut log = ActionLog::new(
        consts::action_log::CONSOLE_WIDTH,
        config.logs.save,
        &config.logs.path,
    );
    log.enable_treeview(consts::action_log::TREE_INDENT);
    if let Some(pattern) = &config.logs.time_format {
        log.use_custom_strftime(pattern);
    }

    log.timestamp();
    log.add_header(&region.name);
    log.add_line(&format!("> Region: {selection}"));
    log.add_line(&format!("> Start:  {}", region.start));
    log.add_line(&format!("> Stop:   {}", region.stop));
    if options.dry_run {
        log.add_line("> Dry run, nothing will be removed");
    }
    log.add_header("Reset Log");

    RESET_RUNNING.store(true, Ordering::SeqCst);
    let outcome = reset::reset_region(&config.path, region, &mut log, options);
    RESET_RUNNING.store(false, Ordering::SeqCst);

    log.timestamp();
    outcome
}

/// Sets up a behavior when the user executes CTRL + C.
///
/// While a reset runs the scan is asked to stop, so the summary still gets written.
/// Otherwise the process exits right away.
fn init_ctrlc_handler(cancel: CancelToken) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        if RESET_RUNNING.load(Ordering::SeqCst) {
            warn!("Received Ctrl+C, stopping after the current file...");
            cancel.cancel();
        } else {
            info!("Received Ctrl+C, exiting...");
            gracefully_exit(ExitCode::CtrlC);
        }
    })
}

/// Enum representing standardized exit codes.
pub enum ExitCode {
    Success,
    Failure,
    /// The region selection was rejected, carries its own code.
    InvalidSelection(i32),
    /// The reset finished but some files could not be removed.
    PartialFailure,
    CtrlC,
}

/// Exits the process with an exit code.
pub fn gracefully_exit(exit_code: ExitCode) -> ! {
    let numerical_exit_code: i32 = match exit_code {
        ExitCode::Success => {
            info!("{}", *messages::RESET_DONE);
            0
        }
        ExitCode::Failure => {
            warn!("{}", *messages::EXIT_ERROR);
            // 1 mean general error
            1
        }
        ExitCode::InvalidSelection(code) => code,
        ExitCode::PartialFailure => {
            warn!("{}", *messages::RESET_DONE_WITH_FAILURES);
            3
        }
        ExitCode::CtrlC => {
            info!("{}", *messages::EXIT_CTRL_C);
            // 130 mean script terminated by Ctrl+C
            130
        }
    };

    std::process::exit(numerical_exit_code);
}
