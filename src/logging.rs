use tracing_subscriber::EnvFilter;

/// Install the global stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` and the
/// configured level applies. Returns `false` when a subscriber was already
/// installed, in which case that one stays in place.
pub fn init_logging(config_level: &str, verbose: bool) -> bool {
    let fallback = if verbose { "debug" } else { config_level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "subscriber already installed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_keeps_the_first() {
        init_logging("info", false);
        assert!(!init_logging("debug", true));
    }
}
