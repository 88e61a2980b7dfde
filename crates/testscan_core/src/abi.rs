//! Wire token vocabulary for the reporting ABI.
//!
//! Each outcome kind that reaches an external consumer is spelled as one of the tokens below. The spellings are a
//! public contract: once a token has shipped under some ABI version it keeps its meaning forever, and new tokens
//! are only ever *added* under a newer version.
//!
//! ## Notes
//!
//! - Tokens with a leading underscore (`_passWithWarnings`, `_attachment`) are namespaced wire names. They are
//!   deliberately different from the plain display names and must not be "cleaned up".
//! - The registry is the single source of truth for spellings; callers resolve through [`as_str`] and
//!   [`from_str`] instead of comparing strings.

/// Numeric identity of an ABI version as negotiated with a host.
pub type AbiVersionNumber = i32;

/// The oldest ABI version number that is still supported.
pub const ABI_V0: AbiVersionNumber = 0;

/// The ABI version number used when a host does not ask for anything specific.
pub const ABI_V1: AbiVersionNumber = 1;

/// Stable identifier for every wire token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WireToken {
    Default,
    Skip,
    Pass,
    PassWithWarnings,
    PassWithKnownIssue,
    Fail,
    Difference,
    Warning,
    Details,
    Attachment,
}

/// Metadata entry for a wire token.
#[derive(Debug, Clone, Copy)]
pub struct WireTokenInfo {
    pub id: WireToken,
    /// Exact spelling emitted on the wire.
    pub canonical: &'static str,
    pub description: &'static str,
    /// First ABI version that may emit this token.
    pub since: AbiVersionNumber,
}

/// Registry of wire tokens, in declaration order.
pub const WIRE_TOKENS: &[WireTokenInfo] = &[
    info(WireToken::Default, "default", "No specific outcome; plain informational output.", ABI_V0),
    info(WireToken::Skip, "skip", "A test or suite was skipped.", ABI_V0),
    info(WireToken::Pass, "pass", "A test passed with no known issues.", ABI_V0),
    info(
        WireToken::PassWithWarnings,
        "_passWithWarnings",
        "A test passed but recorded warnings.",
        ABI_V0,
    ),
    info(
        WireToken::PassWithKnownIssue,
        "passWithKnownIssue",
        "A test passed while recording one or more known issues.",
        ABI_V0,
    ),
    info(WireToken::Fail, "fail", "A test or expectation failed.", ABI_V0),
    info(WireToken::Difference, "difference", "A difference between two values.", ABI_V0),
    info(WireToken::Warning, "warning", "A non-fatal warning.", ABI_V0),
    info(WireToken::Details, "details", "Additional details attached to another message.", ABI_V0),
    info(WireToken::Attachment, "_attachment", "An attachment was recorded.", ABI_V0),
];

/// Resolve a wire spelling to its token id.
pub fn from_str(token: &str) -> Option<WireToken> {
    WIRE_TOKENS.iter().find(|t| t.canonical == token).map(|t| t.id)
}

/// Return the wire spelling for a token.
pub fn as_str(id: WireToken) -> &'static str {
    info_for(id).canonical
}

/// Return the metadata entry for a token.
pub fn info_for(id: WireToken) -> &'static WireTokenInfo {
    // `WIRE_TOKENS` lists every variant in declaration order; the guardrail tests pin this.
    &WIRE_TOKENS[id as usize]
}

/// Check whether a token may be emitted under the given ABI version.
pub fn is_available_in(id: WireToken, version: AbiVersionNumber) -> bool {
    info_for(id).since <= version
}

const fn info(
    id: WireToken,
    canonical: &'static str,
    description: &'static str,
    since: AbiVersionNumber,
) -> WireTokenInfo {
    WireTokenInfo {
        id,
        canonical,
        description,
        since,
    }
}
