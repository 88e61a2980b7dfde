//! Internal outcome vocabulary produced by the runner.
//!
//! [`Symbol`] is the rich, in-process representation of an outcome kind. [`Message`] is one line of human-readable
//! output as produced by the output recorder (an external collaborator that decides what "concise" and "full" text
//! mean). Neither type is part of the wire format; see [`crate::abi`] for that.

/// Outcome kind attached to a human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Plain output with no particular outcome.
    Default,
    Skip,
    /// A passing result. `known_issue_count` counts issues that were pre-declared as expected.
    Pass { known_issue_count: usize },
    PassWithWarnings,
    Fail,
    /// A difference between an expected and an actual value.
    Difference,
    Warning,
    Details,
    Attachment,
}

impl Symbol {
    /// A pass with no known issues.
    pub const PASS: Symbol = Symbol::Pass { known_issue_count: 0 };

    /// Every kind of symbol, with `Pass` represented once with and once without known issues.
    pub const REPRESENTATIVES: &'static [Symbol] = &[
        Symbol::Default,
        Symbol::Skip,
        Symbol::PASS,
        Symbol::Pass { known_issue_count: 1 },
        Symbol::PassWithWarnings,
        Symbol::Fail,
        Symbol::Difference,
        Symbol::Warning,
        Symbol::Details,
        Symbol::Attachment,
    ];
}

/// One message from the human-readable output recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// `None` when the recorder did not assign an outcome kind.
    pub symbol: Option<Symbol>,
    /// Full rendering of the message.
    pub string_value: String,
    /// Shorter rendering, when the recorder has one.
    pub concise_string_value: Option<String>,
}

impl Message {
    pub fn new(symbol: Option<Symbol>, string_value: impl Into<String>) -> Self {
        Self {
            symbol,
            string_value: string_value.into(),
            concise_string_value: None,
        }
    }

    /// Attach a concise rendering.
    pub fn with_concise(mut self, concise: impl Into<String>) -> Self {
        self.concise_string_value = Some(concise.into());
        self
    }
}
