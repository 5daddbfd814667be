//! txlock-cli: the two envelope front-ends
//!
//! Both binaries are thin shells around a testable `run(argv, getenv)`
//! function so argument handling, exit codes, and the environment lookup can
//! be exercised without spawning processes.
//!
//! Exit codes are part of the contract:
//!   0  success
//!   1  argument or usage error (bad flags, bad index, missing mnemonic env)
//!   2  processing error (I/O, derivation, seal/open failure)

pub mod dec;
pub mod enc;

mod io;

/// Install the stderr tracing subscriber. stdout is reserved for envelope
/// and plaintext payloads, so diagnostics must never land there.
pub fn init_logging() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
