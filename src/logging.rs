use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for the binaries.
///
/// The host application parses stdout as one JSON line, so all
/// diagnostics go to stderr and the default level is OFF. Setting
/// `MUSICDL_VERBOSE=1` (or an explicit `RUST_LOG`) opts in.
pub fn init_logging() {
    let verbose = std::env::var("MUSICDL_VERBOSE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let default_level = if verbose {
        LevelFilter::from_level(Level::DEBUG)
    } else {
        LevelFilter::OFF
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
        // Filter out noisy dependencies (these parse strings are static and known-valid)
        .add_directive("reqwest=warn".parse().expect("valid directive for reqwest"))
        .add_directive("hyper=warn".parse().expect("valid directive for hyper"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}
