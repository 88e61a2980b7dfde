//! Test discovery and outcome reporting core.
//!
//! testscan finds tests that were compiled into a program without any explicit registration call, and encodes
//! human-readable test outcomes in a stable, versioned wire format for IDEs and CI log processors.
//!
//! - [`discovery`] scans the loaded images of the running process for type-metadata records, filters them by a
//!   marker substring and probes each candidate before invoking it.
//! - [`abi`] maps the internal [`event::Symbol`] / [`event::Message`] representation onto wire tokens and text.
//!
//! ## Panic Policy
//!
//! - **Library code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. `unwrap`/`expect` are denied.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Registering containers
//!
//! Code generators emit a `static` container, a [`TypeDescriptor`] naming it, and a [`MetadataRecord`] placed in
//! the [`TYPE_METADATA`] section:
//!
//! ```ignore
//! use testscan::discovery::{Capability, MetadataRecord, TestListFn, TypeDescriptor, TYPE_METADATA};
//! use testscan::linkme::distributed_slice;
//!
//! static MATH: TestListFn = TestListFn(math_tests);
//! static MATH_TYPE: TypeDescriptor =
//!     TypeDescriptor::new("math::__🟠$test_container__math", Capability::TestList(&MATH));
//!
//! #[distributed_slice(TYPE_METADATA)]
//! #[linkme(crate = testscan::linkme)]
//! static MATH_RECORD: MetadataRecord = MetadataRecord::new(&MATH_TYPE);
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod abi;
pub mod config;
pub mod definition;
pub mod discovery;
pub mod error;
pub mod event;

pub use abi::{AbiVersion, EncodedMessage, Encoder, WireSymbol};
pub use config::DiscoveryConfig;
pub use definition::{
    BoxError, BoxFuture, ExitTest, ExitTestId, SourceLocation, Test, TestBody, TestId, body, sort_by_source_location,
    sync_body,
};
pub use discovery::{
    Capability, Discovery, ExitTestContainer, ExitTestFn, MetadataRecord, TestContainer, TestListFn, TypeDescriptor,
};
pub use error::{AbiError, DiscoveryError};
pub use event::{Message, Symbol};
pub use testscan_core::{EXIT_TEST_CONTAINER_MARKER, TEST_CONTAINER_MARKER};

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "illumos",
    target_os = "windows",
    target_vendor = "apple",
))]
pub use discovery::TYPE_METADATA;

/// Re-exported so generated code can register records without its own `linkme` dependency.
#[doc(hidden)]
pub use linkme;
