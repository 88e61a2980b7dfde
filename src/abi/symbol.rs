//! Encoding of internal outcome symbols into wire tokens.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use testscan_core::WireToken;
use testscan_core::abi;

use super::version::AbiVersion;
use crate::event::Symbol;

/// An outcome kind as it appears on the wire.
///
/// Serializes as a bare string (`"pass"`, `"_attachment"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WireSymbol(WireToken);

impl WireSymbol {
    /// Encode an internal symbol for the given ABI version.
    ///
    /// Total over every [`Symbol`] for every [`AbiVersion`]. The known-issue count only decides between `pass` and
    /// `passWithKnownIssue`; the count itself is not carried by the symbol.
    pub fn encode(symbol: Symbol, version: AbiVersion) -> Self {
        // Every supported version shares the v0 mapping. A version that introduces a token adds its arm here,
        // guarded by `version`, without touching the existing arms.
        let token = match symbol {
            Symbol::Default => WireToken::Default,
            Symbol::Skip => WireToken::Skip,
            Symbol::Pass { known_issue_count } if known_issue_count > 0 => WireToken::PassWithKnownIssue,
            Symbol::Pass { .. } => WireToken::Pass,
            Symbol::PassWithWarnings => WireToken::PassWithWarnings,
            Symbol::Fail => WireToken::Fail,
            Symbol::Difference => WireToken::Difference,
            Symbol::Warning => WireToken::Warning,
            Symbol::Details => WireToken::Details,
            Symbol::Attachment => WireToken::Attachment,
        };
        debug_assert!(
            abi::is_available_in(token, version.version_number()),
            "wire token `{}` is not available in ABI {version}",
            abi::as_str(token)
        );
        Self(token)
    }

    /// Resolve a wire spelling. Returns `None` for tokens this library does not know.
    pub fn from_token(token: &str) -> Option<Self> {
        abi::from_str(token).map(Self)
    }

    pub fn token(self) -> WireToken {
        self.0
    }

    pub fn as_str(self) -> &'static str {
        abi::as_str(self.0)
    }

    /// Check whether this symbol may be emitted under `version`.
    pub fn is_available_in(self, version: AbiVersion) -> bool {
        abi::is_available_in(self.0, version.version_number())
    }
}

impl fmt::Display for WireSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WireSymbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WireSymbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        WireSymbol::from_token(&token).ok_or_else(|| de::Error::custom(format!("unrecognized wire symbol `{token}`")))
    }
}
