//! File/stream selection shared by both front-ends
//!
//! `-` means stdin or stdout. File and stream paths share one error surface
//! so both front-ends fail identically for equivalent problems.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

pub(crate) fn read_input(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("reading stdin")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("reading {path}"))
}

pub(crate) fn write_output(path: &str, data: &[u8]) -> Result<()> {
    if path == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(data).context("writing stdout")?;
        return stdout.flush().context("flushing stdout");
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(path, data).with_context(|| format!("writing {path}"))
}

/// Default output for `txlock-enc`: `./lockfile/lock/<name>.lock`, keeping
/// sealed artifacts physically separate from recovered ones.
pub(crate) fn default_enc_out_path(in_path: &str) -> String {
    let name = base_name(in_path);
    Path::new("lockfile")
        .join("lock")
        .join(format!("{name}.lock"))
        .to_string_lossy()
        .into_owned()
}

/// Default output for `txlock-dec`: `./lockfile/<name>.dec.md`, stripping
/// the sealing suffix when present.
pub(crate) fn default_dec_out_path(in_path: &str) -> String {
    let base = base_name(in_path);
    let name = base
        .strip_suffix(".lock")
        .or_else(|| base.strip_suffix(".txlock"))
        .map(str::to_owned)
        .unwrap_or_else(|| {
            Path::new(&base)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or(base.clone())
        });
    Path::new("lockfile")
        .join(format!("{name}.dec.md"))
        .to_string_lossy()
        .into_owned()
}

fn base_name(in_path: &str) -> String {
    if in_path == "-" {
        return "stdin".to_string();
    }
    Path::new(in_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdin".to_string())
}
