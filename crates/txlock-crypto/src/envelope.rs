//! Envelope serialization: the `<!-- … -->` text frame
//!
//! The builder emits exactly one byte form and the parser accepts exactly
//! that form. Parsing runs as a pipeline of three zero-tolerance gates
//! (frame boundary, header key-value walk, ciphertext lines); each gate
//! returns `Option` so a failure carries no hint about which check tripped,
//! and the public entry point collapses every rejection into `Decrypt`.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

use txlock_core::{TxlockError, TxlockResult};

/// First header line of a v1 envelope, also the first AAD line.
pub const MARKER_V1: &str = "txlock:v1";

/// Fixed wrap width for the base64 ciphertext block.
const WRAP_WIDTH: usize = 76;

/// Structured result of a successful parse.
///
/// `path` is informational only: callers derive the secret key from their
/// own index argument and rebuild the path for the AAD, so an attacker who
/// edits this field gains nothing but a failed tag check.
pub struct ParsedEnvelope {
    pub path: String,
    pub salt_b64: String,
    pub nonce_b64: String,
    pub ciphertext: Vec<u8>,
}

/// Split a base64 string into 76-column lines; empty input yields one empty
/// line so the frame shape is stable.
fn wrap_b64_lines(raw: &str) -> Vec<&str> {
    if raw.is_empty() {
        return vec![""];
    }
    let mut out = Vec::with_capacity(raw.len() / WRAP_WIDTH + 1);
    let mut rest = raw;
    while !rest.is_empty() {
        // base64 is ASCII, so this is a plain 76-byte split; the boundary
        // walk only matters for garbage input, which must not panic here
        let mut end = WRAP_WIDTH.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (line, tail) = rest.split_at(end);
        out.push(line);
        rest = tail;
    }
    out
}

/// Serialize the envelope. Field order is frozen; the trailing newline after
/// `-->` is part of the format.
pub fn build_envelope(path: &str, salt_b64: &str, nonce_b64: &str, ct_b64: &str) -> String {
    let mut out = String::with_capacity(96 + path.len() + salt_b64.len() + ct_b64.len() * 2);
    out.push_str("<!--\n");
    out.push_str(MARKER_V1);
    out.push_str("\nchain:ethereum\npath:");
    out.push_str(path);
    out.push_str("\nkdf:hkdf-sha256\naead:aes-256-gcm\nsalt_b64:");
    out.push_str(salt_b64);
    out.push_str("\nnonce_b64:");
    out.push_str(nonce_b64);
    out.push_str("\nct_b64:\n");
    for line in wrap_b64_lines(ct_b64) {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("-->\n");
    out
}

/// Gate 1: the input must begin with exactly `<!--\n` and end with exactly
/// `-->\n`. No prefix, no suffix, no BOM.
fn extract_body(raw: &str) -> Option<&str> {
    raw.strip_prefix("<!--\n")?.strip_suffix("-->\n")
}

/// Header fields recovered by gate 2. All six keys are required.
struct Header<'a> {
    chain: Option<&'a str>,
    path: Option<&'a str>,
    kdf: Option<&'a str>,
    aead: Option<&'a str>,
    salt_b64: Option<&'a str>,
    nonce_b64: Option<&'a str>,
}

impl<'a> Header<'a> {
    fn empty() -> Self {
        Self {
            chain: None,
            path: None,
            kdf: None,
            aead: None,
            salt_b64: None,
            nonce_b64: None,
        }
    }

    /// Record a key-value pair; rejects unknown and repeated keys.
    fn set(&mut self, key: &'a str, value: &'a str) -> Option<()> {
        let slot = match key {
            "chain" => &mut self.chain,
            "path" => &mut self.path,
            "kdf" => &mut self.kdf,
            "aead" => &mut self.aead,
            "salt_b64" => &mut self.salt_b64,
            "nonce_b64" => &mut self.nonce_b64,
            _ => return None,
        };
        if slot.is_some() {
            return None;
        }
        *slot = Some(value);
        Some(())
    }
}

/// Gate 2: walk the header lines up to the `ct_b64:` marker.
///
/// Each header line must contain exactly one colon and no space or tab, and
/// its key must come from the closed set without repeats. Returns the header
/// plus the raw ciphertext lines (at least one).
fn parse_header(body: &str) -> Option<(Header<'_>, Vec<&str>)> {
    let lines: Vec<&str> = body.split('\n').collect();
    if lines.len() < 9 || lines[0] != MARKER_V1 || *lines.last()? != "" {
        return None;
    }

    let mut header = Header::empty();
    let mut i = 1;
    while i < lines.len() - 1 {
        let line = lines[i];
        if line == "ct_b64:" {
            i += 1;
            break;
        }
        if line.is_empty() || line.contains(' ') || line.contains('\t') {
            return None;
        }
        if line.bytes().filter(|&b| b == b':').count() != 1 {
            return None;
        }
        let (key, value) = line.split_once(':')?;
        header.set(key, value)?;
        i += 1;
    }
    if i >= lines.len() - 1 {
        return None;
    }
    Some((header, lines[i..lines.len() - 1].to_vec()))
}

/// Gate 3: ciphertext lines must be non-empty, padding-free, and drawn from
/// the standard base64 alphabet. Lines are joined with no separator and
/// decoded once.
fn decode_ct_lines(lines: &[&str]) -> Option<Vec<u8>> {
    if lines.is_empty() {
        return None;
    }
    let mut joined = String::with_capacity(lines.iter().map(|l| l.len()).sum());
    for line in lines {
        if line.is_empty() {
            return None;
        }
        let alphabet_only = line
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/');
        if !alphabet_only {
            return None;
        }
        joined.push_str(line);
    }
    STANDARD_NO_PAD.decode(joined).ok()
}

/// Parse a v1 envelope, enforcing all three gates plus the constant-field
/// check. Any deviation collapses into `Decrypt`.
pub fn parse_envelope(raw: &str) -> TxlockResult<ParsedEnvelope> {
    parse_envelope_inner(raw).ok_or(TxlockError::Decrypt)
}

fn parse_envelope_inner(raw: &str) -> Option<ParsedEnvelope> {
    let body = extract_body(raw)?;
    let (header, ct_lines) = parse_header(body)?;

    if header.chain? != "ethereum" || header.kdf? != "hkdf-sha256" || header.aead? != "aes-256-gcm"
    {
        return None;
    }
    let path = header.path?;
    let salt_b64 = header.salt_b64?;
    let nonce_b64 = header.nonce_b64?;

    let ciphertext = decode_ct_lines(&ct_lines)?;
    Some(ParsedEnvelope {
        path: path.to_string(),
        salt_b64: salt_b64.to_string(),
        nonce_b64: nonce_b64.to_string(),
        ciphertext,
    })
}
