//! Inverter sizer entry point: CLI wiring, scenario replay and reporting.

mod cli;

use std::path::Path;
use std::process;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use inverter_sizer::catalog::Catalog;
use inverter_sizer::config::ScenarioConfig;
use inverter_sizer::io::export::export_csv;
use inverter_sizer::selection::IntentOutcome;

/// Installs the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,inverter_sizer={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_scenario(opts: &cli::CliOptions) -> ScenarioConfig {
    let loaded = match (&opts.scenario, &opts.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path),
        (None, Some(name)) => ScenarioConfig::from_preset(name),
        (None, None) => Ok(ScenarioConfig::baseline()),
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    })
}

fn main() {
    let opts = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(2);
    });
    init_logging(opts.verbosity);

    let scenario = load_scenario(&opts);
    let catalog = Arc::new(Catalog::builtin());

    let errors = scenario.validate(&catalog);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let (manager, outcomes) = scenario.replay(Arc::clone(&catalog));
    for (intent, outcome) in scenario.selection.iter().zip(&outcomes) {
        match outcome {
            IntentOutcome::Applied | IntentOutcome::CustomAdded { .. } => {
                debug!(?intent, "intent applied");
            }
            IntentOutcome::Ignored { reason } => warn!(?intent, ?reason, "intent ignored"),
            other => info!(?intent, outcome = ?other, "intent resolved"),
        }
    }

    let result = manager.calculate(&scenario.sizing);
    let backup = scenario.battery.estimate(&result);

    if opts.json {
        let report = json!({
            "outcomes": outcomes,
            "result": result,
            "backup": backup,
        });
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: failed to encode JSON: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("{result}");
        println!("\n{backup}");
    }

    if let Some(ref path) = opts.export_csv {
        if let Err(e) = export_csv(&result.load_lines, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Load table written to {}", path.display());
    }

    #[cfg(feature = "api")]
    if opts.serve {
        use std::net::SocketAddr;

        use inverter_sizer::api::AppState;

        let state = Arc::new(AppState::new(manager, scenario.sizing, scenario.battery));
        let addr = SocketAddr::from(([0, 0, 0, 0], opts.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(inverter_sizer::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
