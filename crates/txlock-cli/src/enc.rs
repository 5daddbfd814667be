//! txlock-enc: seal a file into a Markdown-safe envelope

use std::ffi::OsString;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use clap::error::ErrorKind;
use clap::Parser;
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use tracing::error;

use txlock_core::{build_path, canonicalize, validate_index};
use txlock_crypto::{build_envelope, derive_sk, seal};

use crate::io::{default_enc_out_path, read_input, write_output};

const DEFAULT_INDEX: &str = "777";

#[derive(Parser, Debug)]
#[command(
    name = "txlock-enc",
    version,
    about = "Seal a file into a txlock envelope (safe to paste into Markdown)",
    long_about = "Derives a per-index key from a BIP-39 mnemonic held in an environment \
                  variable and seals the input with AES-256-GCM into an HTML-comment \
                  envelope."
)]
struct Args {
    /// Input file, or `-` for stdin
    #[arg(long = "in", value_name = "PATH", default_value = "-")]
    input: String,

    /// Output file, or `-` for stdout (default: ./lockfile/lock/<name>.lock)
    #[arg(long = "out", value_name = "PATH")]
    out: Option<String>,

    /// Name of the environment variable holding the mnemonic
    #[arg(long = "mnemonic-env", value_name = "NAME")]
    mnemonic_env: String,

    /// Derivation index, decimal in [0, 2147483647]
    #[arg(long, value_name = "N", default_value = DEFAULT_INDEX)]
    index: String,
}

/// Argument/usage failures print a one-liner so scripts see more than a bare
/// exit code.
fn fail_usage(msg: &str) -> i32 {
    eprintln!("txlock-enc: {msg}");
    1
}

pub fn run<I, T, F>(argv: I, getenv: F) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: Fn(&str) -> Option<String>,
{
    let full_argv = std::iter::once(OsString::from("txlock-enc"))
        .chain(argv.into_iter().map(Into::into));
    let args = match Args::try_parse_from(full_argv) {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return 0;
        }
        Err(err) => {
            let _ = err.print();
            return 1;
        }
    };

    let raw_mnemonic = match getenv(&args.mnemonic_env) {
        Some(value) if !value.is_empty() => SecretString::from(value),
        _ => return fail_usage(&format!("mnemonic env is empty: {}", args.mnemonic_env)),
    };
    let canonical = match canonicalize(raw_mnemonic.expose_secret()) {
        Ok(canonical) => canonical,
        Err(err) => {
            error!("mnemonic rejected: {err}");
            return 2;
        }
    };

    // `--index=` (explicit empty) falls back to the default
    let index = if args.index.is_empty() {
        DEFAULT_INDEX
    } else {
        args.index.as_str()
    };
    if !validate_index(index) {
        return fail_usage(&format!("invalid --index: {index}"));
    }
    let path = match build_path(index) {
        Ok(path) => path,
        Err(_) => return fail_usage(&format!("invalid --index: {index}")),
    };

    let sk = match derive_sk(&canonical, index) {
        Ok(sk) => sk,
        Err(err) => {
            error!("key derivation failed: {err}");
            return 2;
        }
    };
    let plaintext = match read_input(&args.input) {
        Ok(plaintext) => plaintext,
        Err(err) => {
            error!("{err:#}");
            return 2;
        }
    };

    let sealed = match seal(&sk, &path, &plaintext, &mut OsRng) {
        Ok(sealed) => sealed,
        Err(err) => {
            error!("seal failed: {err}");
            return 2;
        }
    };
    let ct_b64 = STANDARD_NO_PAD.encode(&sealed.ciphertext);
    let envelope = build_envelope(&path, &sealed.salt_b64, &sealed.nonce_b64, &ct_b64);

    let out = args
        .out
        .unwrap_or_else(|| default_enc_out_path(&args.input));
    if let Err(err) = write_output(&out, envelope.as_bytes()) {
        error!("{err:#}");
        return 2;
    }
    0
}
