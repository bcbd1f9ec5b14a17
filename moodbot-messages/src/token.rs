use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of UID bytes folded into a token
pub const UID_BYTES: usize = 5;

/// Identity read from an access card
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(pub u64);

impl Token {
    /// Fold the first five UID bytes (most significant first) into a token.
    /// Shorter UIDs are zero padded on the right.
    pub fn from_uid(uid: &[u8]) -> Self {
        let mut id = 0u64;
        for i in 0..UID_BYTES {
            id = id * 256 + u64::from(uid.get(i).copied().unwrap_or(0));
        }
        Self(id)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Token {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
