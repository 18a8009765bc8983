//! Pulsar CLI: run capture-window automation suites
//!
//! ## Usage
//!
//! ```bash
//! pulsador run                         # Run the track interaction suite
//! pulsador run --capture-seconds 10   # Longer capture
//! pulsador run --report out.json      # Write a JSON report
//! pulsador list                       # List the cases in the suite
//! ```
//!
//! Suites run against the built-in deterministic capture window, which makes
//! the binary usable as a self-check in environments without a real UI
//! backend.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pulsar::mock::{MockUiDriver, TrackSpec, WINDOW_TITLE};
use pulsar::scenarios::{
    Capture, CheckEvents, CheckThreadStates, CheckTimers, DeselectTrack, FilterTracks,
    MatchTracks, MoveTrack, SelectTrack,
};
use pulsar::{FailureMode, PulsarResult, Session, Suite, SuiteReport, SuiteRunner};

#[derive(Debug, Parser)]
#[command(name = "pulsador", version, about = "Capture-window automation suites")]
struct Cli {
    /// Increase log output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the track interaction suite
    Run(RunArgs),
    /// Print the cases the suite would run
    List,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Capture length in seconds
    #[arg(long, default_value_t = 5)]
    capture_seconds: u64,

    /// Collect thread states during the capture
    #[arg(long)]
    collect_thread_states: bool,

    /// Keep running cases after the first failure
    #[arg(long)]
    keep_going: bool,

    /// Write a JSON report to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match cli.command {
        Commands::Run(args) => match run_suite(&args) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        },
        Commands::List => {
            let args = RunArgs {
                capture_seconds: 5,
                collect_thread_states: false,
                keep_going: false,
                report: None,
            };
            for case in build_suite(&args).cases() {
                println!("{}", case.name());
            }
            ExitCode::SUCCESS
        }
    }
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.quiet {
        "off"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Tracks the deterministic capture window produces when a capture stops
fn capture_profile(args: &RunArgs) -> Vec<TrackSpec> {
    let mut profile = vec![
        TrackSpec::new("Scheduler").selectable(false),
        TrackSpec::new("gfx").timers(true),
        TrackSpec::new("sdma0").timers(true),
        TrackSpec::new("All Threads").events(true),
        TrackSpec::new("hello_ggp_stand").timers(true).events(true),
        TrackSpec::new("MainThread_420").timers(true),
    ];
    if args.collect_thread_states {
        profile[4] = TrackSpec::new("hello_ggp_stand")
            .timers(true)
            .events(true)
            .thread_states(true);
    }
    profile
}

fn build_suite(args: &RunArgs) -> Suite {
    let capture = Capture::new()
        .length(Duration::from_secs(args.capture_seconds))
        .collect_thread_states(args.collect_thread_states);
    let mut suite = Suite::new("track interaction")
        .with_case(capture)
        .with_case(
            MatchTracks::new(["Scheduler", "gfx", "hello_ggp_stand"])
                .allowing_additional_tracks(),
        )
        .with_case(SelectTrack::new(0).expecting_failure())
        .with_case(SelectTrack::new(1))
        .with_case(DeselectTrack::new())
        .with_case(MoveTrack::new(5, 0))
        .with_case(MoveTrack::new(0, 3))
        .with_case(MoveTrack::new(3, 5))
        .with_case(FilterTracks::new("hello", 1).expecting_names(["hello_ggp_stand"]))
        .with_case(FilterTracks::new("Hello", 1))
        .with_case(FilterTracks::new("thread", 2))
        .with_case(CheckTimers::new("gfx"))
        .with_case(CheckEvents::new("hello_ggp"));
    if args.collect_thread_states {
        suite.add_case(CheckThreadStates::new("hello_ggp"));
    }
    suite
}

fn run_suite(args: &RunArgs) -> PulsarResult<bool> {
    let driver = MockUiDriver::builder()
        .capture_profile(capture_profile(args))
        .build();
    let mut session = Session::attach(Box::new(driver), WINDOW_TITLE)?;

    let failure_mode = if args.keep_going {
        FailureMode::CollectAll
    } else {
        FailureMode::FailFast
    };
    let suite = build_suite(args);
    let results = SuiteRunner::new()
        .with_failure_mode(failure_mode)
        .run(&suite, &mut session);

    let report = SuiteReport::from_results(&results);
    println!("{}", report.render_text());
    if let Some(path) = &args.report {
        report.write_json(path)?;
        println!("Report written to {}", path.display());
    }
    Ok(results.all_passed())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_args() -> RunArgs {
        RunArgs {
            capture_seconds: 1,
            collect_thread_states: true,
            keep_going: false,
            report: None,
        }
    }

    #[test]
    fn test_cli_parses_run_flags() {
        let cli = Cli::parse_from([
            "pulsador",
            "run",
            "--capture-seconds",
            "10",
            "--collect-thread-states",
            "--keep-going",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.capture_seconds, 10);
                assert!(args.collect_thread_states);
                assert!(args.keep_going);
            }
            Commands::List => panic!("expected run"),
        }
    }

    #[test]
    fn test_builtin_suite_passes() {
        let args = default_args();
        assert!(run_suite(&args).unwrap());
    }

    #[test]
    fn test_report_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let args = RunArgs {
            report: Some(dir.path().join("report.json")),
            ..default_args()
        };
        assert!(run_suite(&args).unwrap());
        let raw = std::fs::read_to_string(dir.path().join("report.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["suite"], "track interaction");
    }
}
