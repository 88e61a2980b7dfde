//! Error types for discovery and ABI version negotiation.
//!
//! Only genuine defects surface here. Unreadable metadata records, images without a metadata section and types
//! that merely look like containers are not errors: discovery skips them and logs at trace/debug level.

use thiserror::Error;

use crate::definition::BoxError;
use testscan_core::AbiVersionNumber;

/// Errors raised while enumerating discovered containers.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A matched container's test accessor returned an error.
    #[error("test container `{type_name}` failed to produce its tests: {source}")]
    ContainerFailed {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },

    /// A matched container's test accessor panicked.
    #[error("test container `{type_name}` panicked while producing its tests")]
    ContainerPanicked { type_name: &'static str },

    /// The task driving a container was cancelled by the runtime.
    #[error("test container task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Errors raised while selecting an ABI version from host input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AbiError {
    #[error("invalid ABI version `{0}`")]
    InvalidVersion(String),

    #[error("unsupported ABI version {0}")]
    UnsupportedVersion(AbiVersionNumber),
}
