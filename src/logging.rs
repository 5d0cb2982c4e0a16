use tracing_subscriber::{prelude::*, EnvFilter};

/// Environment variable holding a tracing filter, e.g. `bibimamba=debug`.
pub const LOG_ENV: &str = "BIBIMAMBA_LOG";

fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "bibimamba=info",
        1 => "bibimamba=debug",
        _ => "bibimamba=trace",
    }
}

/// Initialize tracing to stderr. Call once at startup.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
