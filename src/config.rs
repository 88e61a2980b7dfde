//! Discovery configuration.
//!
//! The defaults match what the code generator emits. Overriding the markers is only useful when scanning binaries
//! produced by a different generator, or in tests that want to isolate their own fixtures.

use testscan_core::{EXIT_TEST_CONTAINER_MARKER, TEST_CONTAINER_MARKER};

use crate::discovery::SectionKind;

/// Discovery configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Substring identifying test-list containers
    pub test_container_marker: String,
    /// Substring identifying exit-test containers
    pub exit_test_marker: String,
    /// Which section of each image holds type metadata records
    pub section_kind: SectionKind,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            test_container_marker: TEST_CONTAINER_MARKER.to_string(),
            exit_test_marker: EXIT_TEST_CONTAINER_MARKER.to_string(),
            section_kind: SectionKind::TypeMetadata,
        }
    }
}

impl DiscoveryConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the test container marker
    pub fn with_test_container_marker(mut self, marker: impl Into<String>) -> Self {
        self.test_container_marker = marker.into();
        self
    }

    /// Set the exit test marker
    pub fn with_exit_test_marker(mut self, marker: impl Into<String>) -> Self {
        self.exit_test_marker = marker.into();
        self
    }

    /// Set the section kind to scan
    pub fn with_section_kind(mut self, kind: SectionKind) -> Self {
        self.section_kind = kind;
        self
    }
}
