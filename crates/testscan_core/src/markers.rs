//! Marker substrings embedded in the names of generated container types.
//!
//! Discovery treats a type whose name contains one of these markers as a *candidate* container. The marker is a
//! heuristic filter only; the runtime still probes the type's capability before invoking anything.
//!
//! ## Notes
//!
//! - Code generators and the scanner must use these exact strings. Changing one is a breaking change for every
//!   binary built against an older generator.
//! - The markers contain a non-ASCII character so they cannot collide with identifiers a user would plausibly write.

/// Appears in the name of every generated type that yields a list of tests.
pub const TEST_CONTAINER_MARKER: &str = "__🟠$test_container__";

/// Appears in the name of every generated type that holds a single exit test.
pub const EXIT_TEST_CONTAINER_MARKER: &str = "__🟠$exit_test_body__";
