//! Encoding of human-readable messages for the ABI.

use serde::{Deserialize, Serialize};

use super::symbol::WireSymbol;
use super::version::AbiVersion;
use crate::event::{Message, Symbol};

/// One human-readable message in wire form.
///
/// Serializes to a JSON object with exactly two fields, `symbol` and `text`. The ABI version the message was
/// encoded under is kept alongside but not serialized; the surrounding stream carries it, so a decoded message does
/// not know its version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedMessage {
    pub symbol: WireSymbol,
    /// Unformatted text: the concise rendering when there is one, the full rendering otherwise.
    pub text: String,
    #[serde(skip)]
    version: Option<AbiVersion>,
}

impl EncodedMessage {
    /// Encode `message` under `version`.
    ///
    /// The result owns its text and keeps no reference to `message`.
    pub fn encode(message: &Message, version: AbiVersion) -> Self {
        let symbol = WireSymbol::encode(message.symbol.unwrap_or(Symbol::Default), version);
        let text = message
            .concise_string_value
            .clone()
            .unwrap_or_else(|| message.string_value.clone());
        Self {
            symbol,
            text,
            version: Some(version),
        }
    }

    /// The version this message was encoded under, or `None` if it was decoded from the wire.
    pub fn version(&self) -> Option<AbiVersion> {
        self.version
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
