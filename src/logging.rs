use tracing_subscriber::EnvFilter;

/// stderr にログを出す（`--json` の stdout を汚さない）
///
/// `RUST_LOG` があればそれを優先する。
pub fn init(verbose: bool) {
    let default_filter = if verbose { "batikscan=debug,info" } else { "batikscan=info,warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
