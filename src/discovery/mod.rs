//! Runtime discovery of generated test containers.
//!
//! ## Modules
//!
//! - `image` - Enumerate loaded images and their type-metadata sections
//! - `record` - Metadata records and the type descriptions they reference
//! - `container` - Capabilities implemented by generated container types
//! - `engine` - Name filtering, capability probing and container invocation
//!
//! ## Design
//!
//! Generated code registers a [`MetadataRecord`] per type in the `TYPE_METADATA` link section; no explicit
//! registration call is ever made. Discovery finds candidates by name, then probes their [`Capability`] before
//! invoking them, so a name match alone is never trusted.

pub mod container;
pub mod engine;
pub mod image;
pub mod record;

pub use container::{ExitTestContainer, ExitTestFn, TestContainer, TestListFn};
pub use engine::{Discovery, TypeScan};
pub use image::{ImageId, ImageRange, ImageSource, LoadedImage, ProcessImages, SectionKind, SectionScanner, StaticImages};
pub use record::{Capability, MetadataRecord, RECORD_BYTE_COUNT, RecordFault, TypeDescriptor};

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
pub use image::TYPE_METADATA;
