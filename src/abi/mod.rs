//! Versioned wire encoding of test outcomes.
//!
//! ## Modules
//!
//! - `version` - Supported ABI versions and negotiation
//! - `symbol` - Internal [`Symbol`](crate::event::Symbol) to [`WireSymbol`]
//! - `message` - Internal [`Message`](crate::event::Message) to [`EncodedMessage`]
//!
//! Encoding is pure and infallible; encoders can be shared across reporting threads freely.

pub mod message;
pub mod symbol;
pub mod version;

pub use message::EncodedMessage;
pub use symbol::WireSymbol;
pub use version::AbiVersion;

use crate::event::{Message, Symbol};

/// Encodes outcomes under one ABI version chosen at the start of a reporting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Encoder {
    version: AbiVersion,
}

impl Encoder {
    pub fn new(version: AbiVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> AbiVersion {
        self.version
    }

    pub fn symbol(&self, symbol: Symbol) -> WireSymbol {
        WireSymbol::encode(symbol, self.version)
    }

    pub fn message(&self, message: &Message) -> EncodedMessage {
        EncodedMessage::encode(message, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoder_uses_session_version() {
        let encoder = Encoder::new(AbiVersion::V0);
        let encoded = encoder.message(&Message::new(Some(Symbol::Skip), "skipped: slow"));
        assert_eq!(encoded.version(), Some(AbiVersion::V0));
        assert_eq!(encoder.symbol(Symbol::Skip), encoded.symbol);
    }
}
