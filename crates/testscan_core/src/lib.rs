//! Provide the vocabulary shared between test code generators and the testscan runtime.
//!
//! Two halves of the system must agree on a handful of spellings without ever linking against each other's
//! internals:
//! - the code generator that emits container types (it embeds a marker substring in every type name), and
//! - the discovery engine that finds those types at runtime by searching for the same substring.
//!
//! The same applies to the ABI wire tokens: external decoders (IDEs, CI log processors) only ever see the string
//! spellings, so those spellings live in one registry with the ABI version that introduced each of them.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, no dependencies.
//! - Registries are `const` tables so they can be checked by guardrail tests.

pub mod abi;
pub mod markers;

pub use abi::{AbiVersionNumber, WIRE_TOKENS, WireToken, WireTokenInfo};
pub use markers::{EXIT_TEST_CONTAINER_MARKER, TEST_CONTAINER_MARKER};
