//! `event`: emit one telemetry event, for checking the pipeline end to end.

use std::sync::Arc;

use super::CommonArgs;
use crate::logging::{Logger, TracingSink};
use crate::telemetry::{Category, ConfigResolver, Event};

/// Emit `/<category>/<identifier>` through a root logger.
///
/// Returns 0 when emitted, 1 when telemetry is disabled, 2 on usage errors.
pub fn run(args: &CommonArgs, category: Option<&str>, identifier: Option<&str>) -> i32 {
    let (Some(category), Some(identifier)) = (category, identifier) else {
        eprintln!("usage: event <category> <identifier>");
        return 2;
    };

    let resolution = ConfigResolver::new().ensure_created(args.data_dir.as_deref(), &args.genesis_id);
    let logger = Logger::new(Arc::new(TracingSink));
    logger.enable_telemetry(resolution.config.enable);
    if !logger.telemetry_enabled() {
        eprintln!("Telemetry is disabled; nothing emitted.");
        return 1;
    }

    logger.event(Category::new(category), Event::new(identifier));
    println!("emitted /{}/{} session={}", category, identifier, logger.telemetry_session());
    0
}
