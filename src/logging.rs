// src/logging.rs
// =============================================================================
// Sets up tracing output for the binary.
//
// - Events go to stderr, so `--json` output on stdout stays parseable
// - RUST_LOG wins when it is set (e.g. RUST_LOG=crawlscope=debug)
// - Otherwise -v / -vv / -vvv raise the level from "warn"
// =============================================================================

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn setup_logging(verbosity: u8) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive(verbosity))?,
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "crawlscope=info",
        2 => "crawlscope=debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "crawlscope=info");
        assert_eq!(default_directive(2), "crawlscope=debug");
        assert_eq!(default_directive(9), "trace");
    }
}
