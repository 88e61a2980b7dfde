//! Enumerate loaded code images and their type-metadata sections.
//!
//! An [`ImageSource`] reports the images currently loaded in the process. [`SectionScanner`] turns a snapshot of
//! those images into [`ImageRange`]s, one per image that actually has the requested section.
//!
//! ## Notes
//!
//! - Every call takes a fresh snapshot. Images can be loaded and unloaded between calls, so ranges are never cached.
//! - A platform that cannot report metadata yields an empty snapshot; discovery then finds no tests instead of
//!   failing.
//! - Scanning mutates nothing, so any number of threads may scan at the same time.

use std::collections::HashSet;

use super::record::{MetadataRecord, RECORD_BYTE_COUNT};

/// Kind of section to look up in each image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Records describing types emitted by the compiler/code generator.
    TypeMetadata,
}

/// Identity of a loaded image within a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub usize);

/// One loaded image as reported by an [`ImageSource`].
#[derive(Debug, Clone, Copy)]
pub struct LoadedImage {
    pub id: ImageId,
    type_metadata: Option<&'static [MetadataRecord]>,
}

impl LoadedImage {
    pub const fn new(id: ImageId, type_metadata: Option<&'static [MetadataRecord]>) -> Self {
        Self { id, type_metadata }
    }

    /// Records of the given section, if the image has one.
    pub fn section(&self, kind: SectionKind) -> Option<&'static [MetadataRecord]> {
        match kind {
            SectionKind::TypeMetadata => self.type_metadata,
        }
    }
}

/// A contiguous span of records inside one loaded image.
#[derive(Debug, Clone, Copy)]
pub struct ImageRange {
    pub image: ImageId,
    pub kind: SectionKind,
    records: &'static [MetadataRecord],
}

impl ImageRange {
    /// Address of the first record.
    pub fn base(&self) -> usize {
        self.records.as_ptr() as usize
    }

    /// Length of the range in bytes.
    pub fn len(&self) -> usize {
        self.records.len() * RECORD_BYTE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &'static [MetadataRecord] {
        self.records
    }
}

/// Reports the images currently loaded.
pub trait ImageSource: Send + Sync {
    /// Take a snapshot of the loaded images.
    fn snapshot(&self) -> Vec<LoadedImage>;
}

impl<S: ImageSource + ?Sized> ImageSource for std::sync::Arc<S> {
    fn snapshot(&self) -> Vec<LoadedImage> {
        (**self).snapshot()
    }
}

/// The images of the running process.
///
/// Generated code places its records in the [`TYPE_METADATA`] link section, which the linker gathers from every
/// object in the final binary into one contiguous slice.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessImages;

impl ImageSource for ProcessImages {
    fn snapshot(&self) -> Vec<LoadedImage> {
        process::snapshot()
    }
}

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
mod process {
    use linkme::distributed_slice;

    use super::{ImageId, LoadedImage};
    use crate::discovery::record::MetadataRecord;

    /// Type-metadata section of the main executable.
    #[distributed_slice]
    pub static TYPE_METADATA: [MetadataRecord] = [..];

    pub(super) fn snapshot() -> Vec<LoadedImage> {
        let records: &'static [MetadataRecord] = &TYPE_METADATA;
        let section = if records.is_empty() { None } else { Some(records) };
        vec![LoadedImage::new(ImageId(0), section)]
    }
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "illumos",
    target_os = "windows",
    target_vendor = "apple",
)))]
mod process {
    use super::LoadedImage;

    pub(super) fn snapshot() -> Vec<LoadedImage> {
        Vec::new()
    }
}

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
pub use process::TYPE_METADATA;

/// A fixed list of images, for embedders that load code themselves and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticImages(pub Vec<LoadedImage>);

impl ImageSource for StaticImages {
    fn snapshot(&self) -> Vec<LoadedImage> {
        self.0.clone()
    }
}

/// Produces [`ImageRange`]s from an [`ImageSource`].
#[derive(Debug, Clone, Default)]
pub struct SectionScanner<S> {
    source: S,
}

impl<S: ImageSource> SectionScanner<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Collect the ranges of `kind` in every currently loaded image.
    ///
    /// ## Returns
    /// - One range per image that has a non-empty section of `kind`, in image order. Images are visited once even
    ///   if the source reports them twice.
    #[tracing::instrument(level = "trace", skip_all, fields(kind = ?kind))]
    pub fn all_sections(&self, kind: SectionKind) -> Vec<ImageRange> {
        let mut seen = HashSet::new();
        let mut ranges = Vec::new();

        for image in self.source.snapshot() {
            if !seen.insert(image.id) {
                tracing::trace!(image = image.id.0, "image reported twice; ignoring duplicate");
                continue;
            }
            match image.section(kind) {
                Some(records) if !records.is_empty() => ranges.push(ImageRange {
                    image: image.id,
                    kind,
                    records,
                }),
                _ => tracing::trace!(image = image.id.0, "image has no section of the requested kind"),
            }
        }

        ranges
    }
}
