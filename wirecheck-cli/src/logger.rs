use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a compact stderr logger.
///
/// `RUST_LOG` takes precedence. Otherwise `verbose` enables debug output
/// from the wirecheck crates.
pub fn init_cli_logger(verbose: bool) {
    let fallback = if verbose {
        "wirecheck=debug,wirecheck_compliance=debug,warn"
    } else {
        "wirecheck=info,wirecheck_compliance=warn,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
