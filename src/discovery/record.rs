//! Type metadata records and the type descriptions they point at.
//!
//! A [`MetadataRecord`] is the fixed-size unit stored in an image's type-metadata section. Code generators emit one
//! record per generated type. Resolving a record yields a [`TypeDescriptor`]: the type's name plus the capability
//! the type provides, if any.
//!
//! ## Notes
//!
//! - Records are read-only and `'static`; they live as long as the image that contains them.
//! - A record that does not carry the expected magic value or layout is *unreadable*. Discovery skips it; it is
//!   never an error.

use std::fmt;

use thiserror::Error;

use super::container::{ExitTestContainer, TestContainer};

/// Magic value stamped into every well-formed record (`"TSMD"`).
pub const RECORD_MAGIC: u32 = 0x5453_4d44;

/// Record layout understood by this version of the scanner.
pub const RECORD_LAYOUT: u32 = 1;

/// Size in bytes of one record; the stride used when walking a section.
pub const RECORD_BYTE_COUNT: usize = std::mem::size_of::<MetadataRecord>();

/// One entry of a type-metadata section.
#[repr(C)]
pub struct MetadataRecord {
    magic: u32,
    layout: u32,
    descriptor: Option<&'static TypeDescriptor>,
}

/// Why a record could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordFault {
    #[error("bad magic value {0:#010x}")]
    BadMagic(u32),
    #[error("unsupported record layout {0}")]
    UnsupportedLayout(u32),
    #[error("record does not reference a type")]
    MissingDescriptor,
}

impl MetadataRecord {
    /// Create a well-formed record referring to `descriptor`.
    pub const fn new(descriptor: &'static TypeDescriptor) -> Self {
        Self {
            magic: RECORD_MAGIC,
            layout: RECORD_LAYOUT,
            descriptor: Some(descriptor),
        }
    }

    /// Create a record from raw field values, well-formed or not.
    ///
    /// Generators never need this; it exists so scanners can be exercised against damaged sections.
    #[doc(hidden)]
    pub const fn from_raw_parts(magic: u32, layout: u32, descriptor: Option<&'static TypeDescriptor>) -> Self {
        Self {
            magic,
            layout,
            descriptor,
        }
    }

    /// Resolve the type description this record refers to.
    pub fn resolve(&self) -> Result<&'static TypeDescriptor, RecordFault> {
        if self.magic != RECORD_MAGIC {
            return Err(RecordFault::BadMagic(self.magic));
        }
        if self.layout != RECORD_LAYOUT {
            return Err(RecordFault::UnsupportedLayout(self.layout));
        }
        self.descriptor.ok_or(RecordFault::MissingDescriptor)
    }
}

impl fmt::Debug for MetadataRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataRecord")
            .field("magic", &format_args!("{:#010x}", self.magic))
            .field("layout", &self.layout)
            .field("type", &self.descriptor.map(TypeDescriptor::name))
            .finish()
    }
}

/// What a described type can do.
///
/// A type name containing a container marker only makes the type a *candidate*; this is what discovery checks
/// before invoking anything.
#[derive(Clone, Copy)]
pub enum Capability {
    /// An ordinary type with no discovery capability.
    None,
    TestList(&'static dyn TestContainer),
    ExitTest(&'static dyn ExitTestContainer),
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::None => f.write_str("None"),
            Capability::TestList(_) => f.write_str("TestList"),
            Capability::ExitTest(container) => f.debug_tuple("ExitTest").field(&container.id()).finish(),
        }
    }
}

/// A type description referenced by a metadata record.
#[derive(Debug)]
pub struct TypeDescriptor {
    name: &'static str,
    capability: Capability,
}

impl TypeDescriptor {
    pub const fn new(name: &'static str, capability: Capability) -> Self {
        Self { name, capability }
    }

    /// Fully qualified type name, including any marker substring.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Probe for the test-list capability.
    pub fn as_test_container(&self) -> Option<&'static dyn TestContainer> {
        match self.capability {
            Capability::TestList(container) => Some(container),
            _ => None,
        }
    }

    /// Probe for the exit-test capability.
    pub fn as_exit_test_container(&self) -> Option<&'static dyn ExitTestContainer> {
        match self.capability {
            Capability::ExitTest(container) => Some(container),
            _ => None,
        }
    }
}
