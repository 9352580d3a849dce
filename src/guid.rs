// 🔑 GUID - Identity for every business object
//
// "Identity is a VALUE you compare, not a pointer you chase"
//
// A GUID is 128 bits. The engine's text form is 32 lowercase hex digits
// with no dashes; hyphenated UUIDs are accepted on input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// GUID
// ============================================================================

/// Globally unique identifier of a business object. The default is nil.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(Uuid);

impl Guid {
    /// Fresh random identity (v4)
    pub fn new() -> Self {
        Guid(Uuid::new_v4())
    }

    /// The all-zero GUID
    pub fn nil() -> Self {
        Guid(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Guid(Uuid::from_bytes(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl From<Uuid> for Guid {
    fn from(uuid: Uuid) -> Self {
        Guid(uuid)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for Guid {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Guid)
    }
}

// ============================================================================
// TESTS
// ============================================================================
