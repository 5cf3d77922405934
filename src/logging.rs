use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "trialbal=debug"
    } else {
        "trialbal=warn"
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the default level.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // A second init (tests, embedding) keeps the existing subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
