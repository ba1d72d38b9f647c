use std::env;
use std::path::PathBuf;

#[cfg(feature = "api")]
const DEFAULT_PORT: u16 = 3000;

pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub export_csv: Option<PathBuf>,
    pub json: bool,
    pub verbosity: u8,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: u16,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut export_csv = None;
    let mut json = false;
    let mut verbosity = 0u8;
    #[cfg(feature = "api")]
    let mut serve = false;
    #[cfg(feature = "api")]
    let mut port = DEFAULT_PORT;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --scenario (expected a TOML file path)")?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--export-csv" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --export-csv (expected a file path)")?;
                if export_csv.replace(PathBuf::from(path)).is_some() {
                    return Err("--export-csv provided more than once".to_string());
                }
            }
            "--json" => json = true,
            "-v" | "--verbose" => verbosity = verbosity.saturating_add(1),
            #[cfg(feature = "api")]
            "--serve" => serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                port = value
                    .parse()
                    .map_err(|_| format!("--port value \"{value}\" is not a valid u16"))?;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if scenario.is_none() && preset.is_none() {
        preset = Some("baseline".to_string());
    }

    Ok(CliOptions {
        scenario,
        preset,
        export_csv,
        json,
        verbosity,
        #[cfg(feature = "api")]
        serve,
        #[cfg(feature = "api")]
        port,
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("inverter-sizer: size an inverter and battery bank for a household load");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  inverter-sizer [--scenario <path> | --preset <name>] [--export-csv <path>] [--json] [-v]"
    );
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>     Load scenario from TOML config file");
    eprintln!("  --preset <name>       Use a built-in preset (baseline, cooling, kitchen)");
    eprintln!("  --export-csv <path>   Write the load table to CSV");
    eprintln!("  --json                Print the result as JSON instead of a report");
    eprintln!("  -v, --verbose         Raise log verbosity (repeatable; RUST_LOG overrides)");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve               Start REST API server with the scenario loaded");
        eprintln!("  --port <u16>          API server port (default: {DEFAULT_PORT})");
    }
    eprintln!("  --help                Show this help message");
}

#[cfg(test)]
mod tests {
    use super::parse_args_from;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn supports_scenario_cli() {
        let opts = parse_args_from(args(&["--scenario", "house.toml"])).expect("parse should succeed");
        assert_eq!(
            opts.scenario.as_deref().and_then(|p| p.to_str()),
            Some("house.toml")
        );
        assert!(opts.preset.is_none());
    }

    #[test]
    fn supports_preset_cli() {
        let opts = parse_args_from(args(&["--preset", "cooling"])).expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("cooling"));
        assert!(opts.scenario.is_none());
    }

    #[test]
    fn defaults_to_baseline_preset() {
        let opts = parse_args_from(Vec::new()).expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("baseline"));
        assert!(!opts.json);
        assert_eq!(opts.verbosity, 0);
    }

    #[test]
    fn output_flags() {
        let opts = parse_args_from(args(&["--json", "-v", "-v", "--export-csv", "loads.csv"]))
            .expect("parse should succeed");
        assert!(opts.json);
        assert_eq!(opts.verbosity, 2);
        assert_eq!(
            opts.export_csv.as_deref().and_then(|p| p.to_str()),
            Some("loads.csv")
        );
    }

    #[test]
    fn scenario_and_preset_conflict() {
        let err = parse_args_from(args(&["--scenario", "a.toml", "--preset", "baseline"]))
            .err()
            .unwrap_or_default();
        assert!(err.contains("mutually exclusive"));
    }

    #[test]
    fn missing_value_is_an_error() {
        let err = parse_args_from(args(&["--export-csv"])).err().unwrap_or_default();
        assert!(err.contains("--export-csv"));
    }

    #[test]
    fn unknown_argument_is_an_error() {
        let err = parse_args_from(args(&["--seed", "4"])).err().unwrap_or_default();
        assert_eq!(err, "unknown argument: --seed");
    }
}
