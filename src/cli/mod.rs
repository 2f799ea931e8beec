//! CLI subcommands for node telemetry operators.
//!
//! ## Usage
//!
//! ```bash
//! node-telemetry config show   --datadir /var/lib/node --genesis mainnet-v1.0
//! node-telemetry config ensure --datadir /var/lib/node
//! node-telemetry exporter run  --exe /usr/bin/filebeat --datadir /var/lib/node
//! node-telemetry event ApplicationState Startup --datadir /var/lib/node
//! ```

pub mod config_cmd;
pub mod event_cmd;
pub mod exporter_cmd;

use std::path::PathBuf;

/// Environment fallback for `--datadir`.
pub const DATA_DIR_ENV: &str = "NODE_DATA_DIR";

/// Genesis ID used when `--genesis` is not given.
pub const DEFAULT_GENESIS_ID: &str = "devnet";

/// Options shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommonArgs {
    pub data_dir: Option<PathBuf>,
    pub genesis_id: String,
}

impl CommonArgs {
    /// Parse `--datadir` and `--genesis` from `args`, falling back to
    /// `NODE_DATA_DIR` for the data directory.
    pub fn parse(args: &[String]) -> Self {
        let data_dir = flag_value(args, "--datadir")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .filter(|p| !p.as_os_str().is_empty());
        let genesis_id = flag_value(args, "--genesis")
            .unwrap_or(DEFAULT_GENESIS_ID)
            .to_string();
        Self {
            data_dir,
            genesis_id,
        }
    }
}

/// Value following `name` in `args`, if both are present.
pub fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Positional arguments after `skip`, ignoring `--flag value` pairs.
pub fn positionals(args: &[String], skip: usize) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter().skip(skip);
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}
