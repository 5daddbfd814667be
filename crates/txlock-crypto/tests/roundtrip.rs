//! End-to-end scenarios: derive → seal → frame → parse → open

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use proptest::prelude::*;
use rand_core::{CryptoRng, RngCore};

use txlock_core::{build_path, canonicalize, TxlockError};
use txlock_crypto::{build_envelope, derive_sk, open, parse_envelope, seal, SecretKey};

const FIXTURE_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon \
                                abandon abandon abandon abandon about";

/// Deterministic byte-script RNG, the test-side realization of the injected
/// randomness capability.
struct ScriptedRng {
    bytes: Vec<u8>,
    pos: usize,
}

impl ScriptedRng {
    fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, pos: 0 }
    }

    fn vector() -> Self {
        let mut script: Vec<u8> = (0u8..32).collect();
        script.extend_from_slice(&hex::decode("00112233445566778899aabb").unwrap());
        Self::new(script)
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.try_fill_bytes(dest).expect("rng script exhausted")
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        if self.bytes.len() - self.pos < dest.len() {
            return Err(rand_core::Error::new("rng script exhausted"));
        }
        dest.copy_from_slice(&self.bytes[self.pos..self.pos + dest.len()]);
        self.pos += dest.len();
        Ok(())
    }
}

impl CryptoRng for ScriptedRng {}

fn fixture_sk(index: &str) -> SecretKey {
    let canonical = canonicalize(FIXTURE_MNEMONIC).unwrap();
    derive_sk(&canonical, index).unwrap()
}

#[test]
fn full_pipeline_roundtrip() {
    let sk = fixture_sk("777");
    let path = build_path("777").unwrap();
    let plaintext = b"hello mdlock\n";

    let sealed = seal(&sk, &path, plaintext, &mut ScriptedRng::vector()).unwrap();
    let ct_b64 = STANDARD_NO_PAD.encode(&sealed.ciphertext);
    let envelope = build_envelope(&path, &sealed.salt_b64, &sealed.nonce_b64, &ct_b64);

    let parsed = parse_envelope(&envelope).unwrap();
    assert_eq!(parsed.path, path);
    assert_eq!(parsed.salt_b64, sealed.salt_b64);
    assert_eq!(parsed.nonce_b64, sealed.nonce_b64);
    assert_eq!(parsed.ciphertext, sealed.ciphertext);

    let recovered = open(
        &sk,
        &path,
        &parsed.salt_b64,
        &parsed.nonce_b64,
        &parsed.ciphertext,
    )
    .unwrap();
    assert_eq!(recovered, plaintext);
}

#[test]
fn deterministic_envelope_vector() {
    // fixed SK + fixed randomness must reproduce the frozen field values
    let sk = fixture_sk("777");
    assert_eq!(
        hex::encode(sk.as_bytes()),
        "b1ec885280602151c894fb7c17d076a2469ae59161d3b418c08e2ce0b2f2ef21"
    );

    let path = build_path("777").unwrap();
    let sealed = seal(&sk, &path, b"hello mdlock\n", &mut ScriptedRng::vector()).unwrap();
    assert_eq!(
        sealed.salt_b64,
        "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8"
    );
    assert_eq!(sealed.nonce_b64, "ABEiM0RVZneImaq7");
    assert_eq!(
        STANDARD_NO_PAD.encode(&sealed.ciphertext),
        "hIXlwO1oHMmIR4zci5xu1VN2EFOm8ubLkBQpELE"
    );
}

#[test]
fn aad_binds_the_derivation_path() {
    let sk = fixture_sk("777");
    let sealed = seal(
        &sk,
        &build_path("777").unwrap(),
        b"hello mdlock\n",
        &mut ScriptedRng::vector(),
    )
    .unwrap();

    // same key, same randomness, different path → different ciphertext
    let cross = seal(
        &sk,
        &build_path("778").unwrap(),
        b"hello mdlock\n",
        &mut ScriptedRng::vector(),
    )
    .unwrap();
    assert_ne!(sealed.ciphertext, cross.ciphertext);

    // cross-open under the other path fails
    assert_eq!(
        open(
            &sk,
            &build_path("778").unwrap(),
            &sealed.salt_b64,
            &sealed.nonce_b64,
            &sealed.ciphertext,
        )
        .unwrap_err(),
        TxlockError::Decrypt
    );
}

#[test]
fn wrong_index_key_fails_to_open() {
    let path = build_path("777").unwrap();
    let sealed = seal(
        &fixture_sk("777"),
        &path,
        b"secret",
        &mut ScriptedRng::vector(),
    )
    .unwrap();
    assert_eq!(
        open(
            &fixture_sk("778"),
            &path,
            &sealed.salt_b64,
            &sealed.nonce_b64,
            &sealed.ciphertext,
        )
        .unwrap_err(),
        TxlockError::Decrypt
    );
}

#[test]
fn envelope_single_byte_tamper_rejected() {
    let path = build_path("777").unwrap();
    let sealed = seal(
        &fixture_sk("777"),
        &path,
        b"hello mdlock\n",
        &mut ScriptedRng::vector(),
    )
    .unwrap();
    let envelope = build_envelope(
        &path,
        &sealed.salt_b64,
        &sealed.nonce_b64,
        &STANDARD_NO_PAD.encode(&sealed.ciphertext),
    );

    assert!(parse_envelope(&format!("x{envelope}")).is_err());
    assert!(parse_envelope(&format!("{envelope}x")).is_err());
    assert!(parse_envelope(&envelope.replace("kdf:hkdf-sha256", "kdf: hkdf-sha256")).is_err());
    assert!(parse_envelope(
        &envelope.replace("chain:ethereum\n", "chain:ethereum\nchain:ethereum\n")
    )
    .is_err());
}

#[test]
fn flipped_ct_b64_character_fails_auth() {
    let path = build_path("777").unwrap();
    let sk = fixture_sk("777");
    let sealed = seal(&sk, &path, b"hello mdlock\n", &mut ScriptedRng::vector()).unwrap();
    let ct_b64 = STANDARD_NO_PAD.encode(&sealed.ciphertext);

    // swap the first character for a different alphabet member: still
    // parses (alphabet is intact) but the tag check must fail
    let flipped = if ct_b64.starts_with('A') {
        format!("B{}", &ct_b64[1..])
    } else {
        format!("A{}", &ct_b64[1..])
    };
    let envelope = build_envelope(&path, &sealed.salt_b64, &sealed.nonce_b64, &flipped);
    let parsed = parse_envelope(&envelope).unwrap();
    assert_eq!(
        open(
            &sk,
            &path,
            &parsed.salt_b64,
            &parsed.nonce_b64,
            &parsed.ciphertext,
        )
        .unwrap_err(),
        TxlockError::Decrypt
    );
}

#[test]
fn empty_plaintext_roundtrips() {
    let sk = fixture_sk("0");
    let path = build_path("0").unwrap();
    let sealed = seal(&sk, &path, b"", &mut ScriptedRng::vector()).unwrap();
    // tag-only ciphertext still yields a non-empty ct_b64 block
    assert_eq!(sealed.ciphertext.len(), 16);
    let envelope = build_envelope(
        &path,
        &sealed.salt_b64,
        &sealed.nonce_b64,
        &STANDARD_NO_PAD.encode(&sealed.ciphertext),
    );
    let parsed = parse_envelope(&envelope).unwrap();
    let recovered = open(
        &sk,
        &path,
        &parsed.salt_b64,
        &parsed.nonce_b64,
        &parsed.ciphertext,
    )
    .unwrap();
    assert!(recovered.is_empty());
}

#[test]
fn multi_line_ciphertext_block() {
    // 200 plaintext bytes → 216 ct bytes → 288 base64 chars → 4 lines
    let sk = fixture_sk("777");
    let path = build_path("777").unwrap();
    let plaintext = vec![0x5au8; 200];
    let script: Vec<u8> = (0u8..44).collect();
    let sealed = seal(&sk, &path, &plaintext, &mut ScriptedRng::new(script)).unwrap();
    let envelope = build_envelope(
        &path,
        &sealed.salt_b64,
        &sealed.nonce_b64,
        &STANDARD_NO_PAD.encode(&sealed.ciphertext),
    );

    let ct_lines: Vec<&str> = envelope
        .lines()
        .skip_while(|line| *line != "ct_b64:")
        .skip(1)
        .take_while(|line| *line != "-->")
        .collect();
    assert_eq!(ct_lines.len(), 4);
    assert!(ct_lines[..3].iter().all(|line| line.len() == 76));

    let parsed = parse_envelope(&envelope).unwrap();
    let recovered = open(
        &sk,
        &path,
        &parsed.salt_b64,
        &parsed.nonce_b64,
        &parsed.ciphertext,
    )
    .unwrap();
    assert_eq!(recovered, plaintext);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_plaintext_roundtrips(plaintext in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let sk = SecretKey::from_bytes([0x21; 32]);
        let path = build_path("42").unwrap();
        let script: Vec<u8> = (0u8..44).map(|b| b.wrapping_mul(5).wrapping_add(1)).collect();
        let sealed = seal(&sk, &path, &plaintext, &mut ScriptedRng::new(script)).unwrap();
        let envelope = build_envelope(
            &path,
            &sealed.salt_b64,
            &sealed.nonce_b64,
            &STANDARD_NO_PAD.encode(&sealed.ciphertext),
        );
        let parsed = parse_envelope(&envelope).unwrap();
        let recovered = open(
            &sk,
            &path,
            &parsed.salt_b64,
            &parsed.nonce_b64,
            &parsed.ciphertext,
        )
        .unwrap();
        prop_assert_eq!(recovered, plaintext);
    }
}
