use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "BB_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Install a stderr fmt subscriber filtered by `BB_LOG` (default `warn`).
///
/// Returns `false` if a global subscriber is already set.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_refused() {
        init_logging();
        assert!(!init_logging());
    }
}
