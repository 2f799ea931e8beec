//! node-telemetry entry point.
//!
//! ## CLI Subcommands
//!
//! - `node-telemetry config show` - Resolve the telemetry config read-only
//! - `node-telemetry config ensure` - Load or create and persist the config
//! - `node-telemetry exporter run` - Keep the telemetry exporter running
//! - `node-telemetry event <category> <id>` - Emit one telemetry event

use std::path::PathBuf;
use std::process::ExitCode;

use node_telemetry::cli::{self, config_cmd, event_cmd, exporter_cmd, CommonArgs};
use node_telemetry::logging::{init_logging, LogConfig, LogFormat};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    let log_config = LogConfig {
        format: LogFormat::Pretty,
        level: "info".to_string(),
        output_path: None,
    };
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Logging setup failed: {}", e);
    }

    let common = CommonArgs::parse(&args);

    match command {
        "config" => {
            let subcommand = args.get(2).map(|s| s.as_str()).unwrap_or("show");
            match subcommand {
                "show" => exit(config_cmd::run_show(&common)),
                "ensure" => exit(config_cmd::run_ensure(&common)),
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    print_usage();
                    ExitCode::FAILURE
                }
            }
        }
        "exporter" => {
            let subcommand = args.get(2).map(|s| s.as_str()).unwrap_or("run");
            match subcommand {
                "run" => {
                    let exe = cli::flag_value(&args, "--exe").map(PathBuf::from);
                    exit(exporter_cmd::run(&common, exe).await)
                }
                _ => {
                    eprintln!("Unknown exporter subcommand: {}", subcommand);
                    print_usage();
                    ExitCode::FAILURE
                }
            }
        }
        "event" => {
            let positional = cli::positionals(&args, 2);
            exit(event_cmd::run(
                &common,
                positional.first().copied(),
                positional.get(1).copied(),
            ))
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("node-telemetry {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(code.clamp(0, 255) as u8)
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "node-telemetry v{}

USAGE:
    node-telemetry [COMMAND] [OPTIONS]

COMMANDS:
    config show              Print the resolved telemetry config (read-only)
    config ensure            Load the telemetry config, creating it if missing
    exporter run --exe PATH  Keep the telemetry exporter running until Ctrl-C
    event CATEGORY ID        Emit one telemetry event
    version                  Show version information
    help                     Show this help message

OPTIONS:
    --datadir PATH   Node data directory (default: $NODE_DATA_DIR)
    --genesis ID     Genesis identifier used in the chain ID (default: devnet)

ENVIRONMENT:
    NODE_DATA_DIR              Node data directory
    NODE_TELEMETRY_GLOBAL_DIR  Global config directory (default: $HOME/.node-telemetry)
    RUST_LOG                   Log filter (debug, info, warn, error)

EXIT CODES:
    0  Success
    1  Failure / degraded config
    2  Usage error",
        version
    );
}
