//! Canonical identifiers.
//!
//! The backend is inconsistent about identifier encoding: some endpoints
//! return `"id": 12`, others `"id": "12"`, and the session store can only
//! hold strings. Every identifier is an `i64` inside the crate. Conversion
//! happens only at the boundary: serde decoding accepts either form, encoding
//! always emits a JSON number, and [`FromStr`] parses the stored string form.
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid identifier: {0:?}")]
pub struct InvalidId(pub String);

/// Wire form of an identifier before coercion.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn coerce(self) -> Result<i64, InvalidId> {
        match self {
            RawId::Number(n) => Ok(n),
            RawId::Text(s) => s.trim().parse().map_err(|_| InvalidId(s)),
        }
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = RawId::deserialize(deserializer)?;
                raw.coerce().map($name).map_err(de::Error::custom)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse()
                    .map($name)
                    .map_err(|_| InvalidId(s.to_owned()))
            }
        }
    };
}

define_id!(
    /// Identifies an account. Stored in the session under `userId`.
    UserId
);
define_id!(CategoryId);
define_id!(ArticleId);
