//! txlock-dec: recover plaintext from a txlock envelope
//!
//! The index is a required flag. The envelope carries a `path` field, but it
//! is never trusted for derivation: the key and the AAD path are rebuilt
//! from `--index`, so a tampered envelope path can only fail the tag check.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::Parser;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error};

use txlock_core::{build_path, canonicalize, validate_index};
use txlock_crypto::{derive_sk, open, parse_envelope};

use crate::io::{default_dec_out_path, read_input, write_output};

#[derive(Parser, Debug)]
#[command(
    name = "txlock-dec",
    version,
    about = "Recover the plaintext from a txlock envelope",
    long_about = "Derives the per-index key from a BIP-39 mnemonic held in an environment \
                  variable and opens the envelope's AES-256-GCM ciphertext. The envelope's \
                  own path field is ignored for key derivation."
)]
struct Args {
    /// Input envelope file, or `-` for stdin
    #[arg(long = "in", value_name = "PATH", default_value = "-")]
    input: String,

    /// Output file, or `-` for stdout (default: ./lockfile/<name>.dec.md)
    #[arg(long = "out", value_name = "PATH")]
    out: Option<String>,

    /// Name of the environment variable holding the mnemonic
    #[arg(long = "mnemonic-env", value_name = "NAME")]
    mnemonic_env: String,

    /// Derivation index, decimal in [0, 2147483647]
    #[arg(long, value_name = "N")]
    index: String,
}

fn fail_usage(msg: &str) -> i32 {
    eprintln!("txlock-dec: {msg}");
    1
}

pub fn run<I, T, F>(argv: I, getenv: F) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: Fn(&str) -> Option<String>,
{
    let full_argv = std::iter::once(OsString::from("txlock-dec"))
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
    if !validate_index(&args.index) {
        return fail_usage(&format!("invalid --index: {}", args.index));
    }

    let canonical = match canonicalize(raw_mnemonic.expose_secret()) {
        Ok(canonical) => canonical,
        Err(err) => {
            error!("mnemonic rejected: {err}");
            return 2;
        }
    };
    let raw = match read_input(&args.input) {
        Ok(raw) => raw,
        Err(err) => {
            error!("{err:#}");
            return 2;
        }
    };
    let envelope = match String::from_utf8(raw) {
        Ok(envelope) => envelope,
        Err(_) => {
            error!("envelope is not UTF-8");
            return 2;
        }
    };
    let parsed = match parse_envelope(&envelope) {
        Ok(parsed) => parsed,
        Err(err) => {
            error!("envelope rejected: {err}");
            return 2;
        }
    };

    let sk = match derive_sk(&canonical, &args.index) {
        Ok(sk) => sk,
        Err(err) => {
            error!("key derivation failed: {err}");
            return 2;
        }
    };
    let path = match build_path(&args.index) {
        Ok(path) => path,
        Err(_) => return fail_usage(&format!("invalid --index: {}", args.index)),
    };
    if parsed.path != path {
        debug!(
            envelope_path = %parsed.path,
            derived_path = %path,
            "envelope path differs from derived path; proceeding with derived"
        );
    }

    let plaintext = match open(
        &sk,
        &path,
        &parsed.salt_b64,
        &parsed.nonce_b64,
        &parsed.ciphertext,
    ) {
        Ok(plaintext) => plaintext,
        Err(err) => {
            error!("open failed: {err}");
            return 2;
        }
    };

    let out = args
        .out
        .unwrap_or_else(|| default_dec_out_path(&args.input));
    if let Err(err) = write_output(&out, &plaintext) {
        error!("{err:#}");
        return 2;
    }
    0
}
