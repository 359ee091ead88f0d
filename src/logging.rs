use std::sync::Mutex;

use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter, Layer, Registry};

lazy_static! {
    static ref LOG_INSTALLED: Mutex<bool> = Mutex::new(false);
}

/// Initialize logging for the binaries.  The library itself only emits
/// `trace!`/`debug!` events on its degradation paths (dropped records,
/// promoted roots, canonical fallbacks), so by default only warnings from the
/// tool are shown.  If the environment variable `RUST_LOG` is set to a
/// non-empty value we use it as the filter instead, e.g.
/// `RUST_LOG=category_taxonomy=trace`.
///
/// Calling this more than once is harmless, as is calling it after some other
/// subscriber (a test harness, say) has already been installed.
pub fn init_logging() {
    let mut installed = match LOG_INSTALLED.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if *installed {
        return;
    }

    // An empty RUST_LOG means "unset", not "log everything".
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(rustlog) if !rustlog.is_empty() => EnvFilter::try_from_default_env().ok(),
        _ => None,
    }
    .unwrap_or_else(|| EnvFilter::new("warn"));

    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .compact()
        // Output ends up in logs and piped through other tools, so ANSI isn't
        // helpful and neither is the wall time.
        .with_ansi(false)
        .without_time()
        // stdout is reserved for the JSON results.
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    if Registry::default().with(layer).try_init().is_err() {
        debug!("a global subscriber was already installed");
    }
    *installed = true;
}
