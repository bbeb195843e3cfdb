use std::io::IsTerminal;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter directive: warnings only, or debug for this crate when verbose.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,site_rank=debug"
    } else {
        "warn"
    }
}

/// Initialize tracing. `RUST_LOG` overrides the default filter.
///
/// Events are written through [`crate::stderr_buffer`] so a terminal chart
/// never gets log lines drawn over it.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(crate::stderr_buffer::writer)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert!(default_directive(true).contains("site_rank=debug"));
    }

    #[test]
    fn test_directives_parse() {
        assert!(default_directive(true).parse::<EnvFilter>().is_ok());
        assert!(default_directive(false).parse::<EnvFilter>().is_ok());
    }
}
