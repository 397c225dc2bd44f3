//! Uniform result envelope returned by every coordinator operation.
//!
//! In Rust the envelope is a tagged union; on the wire it keeps the
//! `{success, payload, message}` shape callers consume.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Message attached to successful envelopes on the wire.
pub const SUCCESS_MESSAGE: &str = "OK";

const UNKNOWN_FAILURE: &str = "Unknown error";

/// Outcome of a coordinator operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEnvelope<T> {
    Success(T),
    /// Always carries a non-empty diagnostic.
    Failure(String),
}

impl<T> ResultEnvelope<T> {
    pub fn success(payload: T) -> Self {
        Self::Success(payload)
    }

    /// Failure envelope; an empty message is replaced by a generic one.
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Failure(UNKNOWN_FAILURE.to_string())
        } else {
            Self::Failure(message)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure(_) => None,
        }
    }

    pub fn into_payload(self) -> Option<T> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure(_) => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(_) => SUCCESS_MESSAGE,
            Self::Failure(message) => message,
        }
    }
}

impl<T, E: Display> From<Result<T, E>> for ResultEnvelope<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct WireRef<'a, T> {
    success: bool,
    payload: Option<&'a T>,
    message: &'a str,
}

#[derive(Deserialize)]
struct WireOwned<T> {
    success: bool,
    #[serde(default = "Option::default")]
    payload: Option<T>,
    #[serde(default)]
    message: String,
}

impl<T: Serialize> Serialize for ResultEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireRef {
            success: self.is_success(),
            payload: self.payload(),
            message: self.message(),
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ResultEnvelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireOwned::<T>::deserialize(deserializer)?;
        match (wire.success, wire.payload) {
            (true, Some(payload)) => Ok(Self::Success(payload)),
            (true, None) => Err(de::Error::custom("successful envelope without payload")),
            (false, _) => Ok(Self::failure(wire.message)),
        }
    }
}
