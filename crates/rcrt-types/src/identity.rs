use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Symbols an identifier is drawn from: upper, lower, then digits.
pub const ID_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of every identifier.
pub const ID_LEN: usize = 6;

/// Draws attempted before [`EntryId::generate_with`] gives up.
pub const MAX_ATTEMPTS: usize = 10_000;

/// Opaque key naming one entry in a store.
///
/// Always exactly [`ID_LEN`] ASCII alphanumerics. Once assigned an id never
/// changes; content files are named after it (`<id>.txt`, `<id>.<ext>`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(String);

impl EntryId {
    /// Parse and validate an identifier.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.len() != ID_LEN {
            return Err(TypeError::InvalidId {
                id: s.to_string(),
                reason: format!("expected {ID_LEN} characters, got {}", s.len()),
            });
        }
        if let Some(ch) = s.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(TypeError::InvalidId {
                id: s.to_string(),
                reason: format!("non-alphanumeric character {ch:?}"),
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Generate an identifier absent from `existing`, using the thread RNG.
    pub fn generate(existing: &HashSet<EntryId>) -> Result<Self, TypeError> {
        Self::generate_with(&mut rand::thread_rng(), |id| existing.contains(id))
    }

    /// Generate an identifier for which `taken` returns `false`.
    ///
    /// Each draw is [`ID_LEN`] uniform picks from [`ID_ALPHABET`]. Colliding
    /// draws are rejected; after [`MAX_ATTEMPTS`] rejections the call fails
    /// with [`TypeError::ExhaustedKeyspace`].
    pub fn generate_with<R, F>(rng: &mut R, taken: F) -> Result<Self, TypeError>
    where
        R: Rng,
        F: Fn(&EntryId) -> bool,
    {
        for _ in 0..MAX_ATTEMPTS {
            let candidate: String = (0..ID_LEN)
                .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
                .collect();
            let candidate = Self(candidate);
            if !taken(&candidate) {
                return Ok(candidate);
            }
        }
        Err(TypeError::ExhaustedKeyspace {
            attempts: MAX_ATTEMPTS,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EntryId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl std::str::FromStr for EntryId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
