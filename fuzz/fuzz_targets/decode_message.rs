#![no_main]

use libfuzzer_sys::fuzz_target;
use testscan::{AbiVersion, EncodedMessage, WireSymbol};

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary wire input must never panic
    if let Ok(message) = serde_json::from_slice::<EncodedMessage>(data) {
        // Anything that decodes re-encodes to a known token
        assert!(WireSymbol::from_token(message.symbol.as_str()).is_some());
        let _ = message.to_json();
    }

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = s.parse::<AbiVersion>();
    }
});
