//! Tracing setup for resolver diagnostics.
//!
//! Only developer diagnostics go through tracing. Banners and the validation
//! tool's passthrough output are written directly to stdout/stderr, so
//! `RUST_LOG` never changes what a user of the CLI sees from the tool itself.

use std::env;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber: compact lines on stderr, filtered by `RUST_LOG`.
///
/// `RUST_LOG=typefix=debug typefix react` traces every command and retry.
pub fn init() {
    let directives = env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(filter_from(directives.as_deref()))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Build the filter from `RUST_LOG`-style directives; unset or invalid means `warn`.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_directives_default_to_warn() {
        assert_eq!(filter_from(None).to_string(), "warn");
    }

    #[test]
    fn invalid_directives_fall_back_to_warn() {
        assert_eq!(filter_from(Some("typefix=loud")).to_string(), "warn");
    }

    #[test]
    fn explicit_directives_replace_default() {
        assert_eq!(
            filter_from(Some("typefix=debug")).to_string(),
            "typefix=debug"
        );
    }
}
