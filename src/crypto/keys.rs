/// Key types and their transport encodings.
///
/// Both keys travel as base64 of a JSON object. The JSON is written with
/// `", "` and `": "` separators and a fixed field order so that encodings
/// stay byte-stable for the display and storage consumers that already hold
/// them.
use std::io;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::matrix::MATRIX_SEED_LEN;
use crate::error::{Result, SigwallError};

/// Version tag carried by both key objects.
pub const KEY_VERSION: &str = "toy-lwe-1";

/// Public half: matrix seed plus `b = A·s + e (mod q)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub version: String,
    pub q: u32,
    pub n: usize,
    pub m: usize,
    /// Seed of the public matrix A (base64 in the encoding).
    #[serde(rename = "A_seed", with = "seed_base64")]
    pub a_seed: [u8; MATRIX_SEED_LEN],
    /// Public vector, every entry in `[0, q)`.
    pub b: Vec<u32>,
}

impl PublicKey {
    pub fn encode(&self) -> Result<String> {
        encode_blob(self)
    }

    /// Decode and check the structure against its own parameters.
    pub fn decode(encoded: &str) -> Result<Self> {
        let key: Self = decode_blob(encoded)?;
        expect_version(&key.version)?;
        if key.b.len() != key.m {
            return Err(SigwallError::Decode(format!(
                "public vector has {} entries, expected m={}",
                key.b.len(),
                key.m
            )));
        }
        if key.b.iter().any(|&v| v >= key.q) {
            return Err(SigwallError::Decode(
                "public vector entry out of range".into(),
            ));
        }
        Ok(key)
    }
}

/// Private half: the secret vector `s`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    pub version: String,
    pub q: u32,
    pub n: usize,
    pub m: usize,
    pub small_bound: u8,
    pub s: Vec<i8>,
}

impl PrivateKey {
    pub fn encode(&self) -> Result<String> {
        encode_blob(self)
    }

    pub fn decode(encoded: &str) -> Result<Self> {
        let key: Self = decode_blob(encoded)?;
        expect_version(&key.version)?;
        if key.s.len() != key.n {
            return Err(SigwallError::Decode(format!(
                "secret vector has {} entries, expected n={}",
                key.s.len(),
                key.n
            )));
        }
        let bound = i16::from(key.small_bound);
        if key.s.iter().any(|&c| i16::from(c).abs() > bound) {
            return Err(SigwallError::Decode(
                "secret coefficient exceeds small bound".into(),
            ));
        }
        Ok(key)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("version", &self.version)
            .field("q", &self.q)
            .field("n", &self.n)
            .field("m", &self.m)
            .field("small_bound", &self.small_bound)
            .field("s", &"<redacted>")
            .finish()
    }
}

fn expect_version(found: &str) -> Result<()> {
    if found != KEY_VERSION {
        return Err(SigwallError::Decode(format!(
            "unsupported key version {found:?}, expected {KEY_VERSION:?}"
        )));
    }
    Ok(())
}

/// JSON formatter emitting `", "` between items and `": "` after keys.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize `value` as spaced JSON.
pub fn to_spaced_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value
        .serialize(&mut ser)
        .map_err(|e| SigwallError::Serialization(e.to_string()))?;
    Ok(buf)
}

fn encode_blob<T: Serialize>(value: &T) -> Result<String> {
    let json = zeroize::Zeroizing::new(to_spaced_json(value)?);
    Ok(STANDARD.encode(json.as_slice()))
}

fn decode_blob<T: DeserializeOwned>(encoded: &str) -> Result<T> {
    let json = zeroize::Zeroizing::new(
        STANDARD
            .decode(encoded.trim())
            .map_err(|e| SigwallError::Decode(format!("invalid base64: {e}")))?,
    );
    serde_json::from_slice(json.as_slice())
        .map_err(|e| SigwallError::Decode(format!("invalid key JSON: {e}")))
}

mod seed_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::crypto::matrix::MATRIX_SEED_LEN;

    pub fn serialize<S>(seed: &[u8; MATRIX_SEED_LEN], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(seed))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; MATRIX_SEED_LEN], D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let bytes = STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)?;
        bytes.try_into().map_err(|v: Vec<u8>| {
            serde::de::Error::custom(format!(
                "A_seed must be {MATRIX_SEED_LEN} bytes, got {}",
                v.len()
            ))
        })
    }
}
