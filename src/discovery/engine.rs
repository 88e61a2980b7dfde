//! Container discovery engine.
//!
//! Discovery walks the type-metadata records of every loaded image, keeps the types whose names contain a marker
//! substring, and then probes each candidate for the expected capability before using it.
//!
//! ## Failure policy
//!
//! - Unreadable records are skipped (`trace`).
//! - A type whose name matches a marker but which does not provide the capability is skipped (`debug`). Unrelated
//!   user types that happen to contain a marker must never break discovery.
//! - A real container whose test accessor fails is a defect in the discovered code; the error reaches the caller.

use std::collections::HashMap;

use tokio::task::JoinSet;
use tracing::{debug, trace};

use super::container::TestContainer;
use super::image::{ImageSource, ProcessImages, SectionKind, SectionScanner};
use super::record::TypeDescriptor;
use crate::config::DiscoveryConfig;
use crate::definition::{ExitTest, ExitTestId, Test};
use crate::error::DiscoveryError;

/// Discovers test containers and exit tests in loaded images.
///
/// `Discovery` holds no scan state. Every query takes a fresh snapshot of the images, so one value can be shared by
/// any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct Discovery<S = ProcessImages> {
    scanner: SectionScanner<S>,
    config: DiscoveryConfig,
}

impl Discovery<ProcessImages> {
    /// Discovery over the current process with the default markers.
    pub fn new() -> Self {
        Self::with_source(ProcessImages, DiscoveryConfig::default())
    }
}

impl Default for Discovery<ProcessImages> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ImageSource> Discovery<S> {
    pub fn with_source(source: S, config: DiscoveryConfig) -> Self {
        Self {
            scanner: SectionScanner::new(source),
            config,
        }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// All types whose names contain `marker`.
    ///
    /// The returned [`TypeScan`] is lazy and restartable: each call to [`TypeScan::iter`] scans the images again.
    pub fn types_with_names_containing<'a>(&'a self, marker: &'a str) -> TypeScan<'a, S> {
        TypeScan {
            scanner: &self.scanner,
            kind: self.config.section_kind,
            marker,
        }
    }

    /// Candidate test containers that passed the capability probe.
    pub fn test_containers(&self) -> impl Iterator<Item = (&'static TypeDescriptor, &'static dyn TestContainer)> + '_ {
        self.types_with_names_containing(&self.config.test_container_marker)
            .iter()
            .filter_map(|descriptor| match descriptor.as_test_container() {
                Some(container) => Some((descriptor, container)),
                None => {
                    debug!(
                        type_name = descriptor.name(),
                        "type name contains the test container marker but the type is not a test container; skipping"
                    );
                    None
                }
            })
    }

    /// Invoke every discovered test container and collect their tests.
    ///
    /// ## Returns
    /// - The concatenation of every container's tests. Containers run concurrently and their results are merged as
    ///   they complete, so the order is unspecified; sort downstream if it matters.
    ///
    /// ## Errors
    /// - [`DiscoveryError::ContainerFailed`] / [`DiscoveryError::ContainerPanicked`] when a container's accessor
    ///   fails. Containers still running at that point are cancelled.
    #[tracing::instrument(skip_all)]
    pub async fn all_tests(&self) -> Result<Vec<Test>, DiscoveryError> {
        let mut tasks = JoinSet::new();
        let mut type_names = HashMap::new();

        for (descriptor, container) in self.test_containers() {
            // The accessor itself runs inside the task so a panic while building its future is caught too.
            let handle = tasks.spawn(async move { container.tests().await });
            type_names.insert(handle.id(), descriptor.name());
        }
        debug!(containers = type_names.len(), "invoking test containers");

        let type_name = |id: tokio::task::Id| type_names.get(&id).copied().unwrap_or("<unknown>");
        let mut tests = Vec::new();
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, Ok(batch))) => tests.extend(batch),
                Ok((id, Err(source))) => {
                    return Err(DiscoveryError::ContainerFailed {
                        type_name: type_name(id),
                        source,
                    });
                }
                Err(err) if err.is_panic() => {
                    return Err(DiscoveryError::ContainerPanicked {
                        type_name: type_name(err.id()),
                    });
                }
                Err(err) => return Err(DiscoveryError::Join(err)),
            }
        }

        debug!(tests = tests.len(), "test containers finished");
        Ok(tests)
    }

    /// Every discovered exit test, in scan order.
    pub fn exit_tests(&self) -> impl Iterator<Item = ExitTest> + '_ {
        self.types_with_names_containing(&self.config.exit_test_marker)
            .iter()
            .filter_map(|descriptor| match descriptor.as_exit_test_container() {
                Some(container) => Some(ExitTest {
                    id: container.id(),
                    body: container.body(),
                }),
                None => {
                    debug!(
                        type_name = descriptor.name(),
                        "type name contains the exit test marker but the type is not an exit test container; skipping"
                    );
                    None
                }
            })
    }

    /// Find the exit test with the given identifier.
    ///
    /// Identifiers are expected to be unique. Duplicates are not detected here; the first one in scan order wins.
    pub fn find_exit_test(&self, id: ExitTestId) -> Option<ExitTest> {
        self.exit_tests().find(|exit_test| exit_test.id == id)
    }
}

/// A lazy, restartable scan for types whose names contain a marker.
pub struct TypeScan<'a, S> {
    scanner: &'a SectionScanner<S>,
    kind: SectionKind,
    marker: &'a str,
}

impl<'a, S: ImageSource> TypeScan<'a, S> {
    /// Scan the images, yielding matching type descriptions in image-load order, then record order.
    pub fn iter(&self) -> impl Iterator<Item = &'static TypeDescriptor> + use<'a, S> {
        let marker = self.marker;
        self.scanner
            .all_sections(self.kind)
            .into_iter()
            .flat_map(|range| {
                let image = range.image;
                range
                    .records()
                    .iter()
                    .enumerate()
                    .filter_map(move |(index, record)| match record.resolve() {
                        Ok(descriptor) => Some(descriptor),
                        Err(fault) => {
                            trace!(image = image.0, index, %fault, "skipping unreadable metadata record");
                            None
                        }
                    })
            })
            .filter(move |descriptor| descriptor.name().contains(marker))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;
    use std::time::Duration;

    use tokio::sync::Notify;

    use super::*;
    use crate::definition::{BoxError, BoxFuture, SourceLocation, sync_body};
    use crate::discovery::container::{ExitTestFn, TestListFn};
    use crate::discovery::image::{ImageId, LoadedImage, StaticImages};
    use crate::discovery::record::{Capability, MetadataRecord, RECORD_LAYOUT, RECORD_MAGIC};

    fn arithmetic_tests() -> BoxFuture<'static, Result<Vec<Test>, BoxError>> {
        Box::pin(async {
            Ok::<_, BoxError>(vec![
                Test::new("arith", "adds", SourceLocation::new("arith.rs", 3, 1), sync_body(|| Ok(()))),
                Test::new("arith", "subtracts", SourceLocation::new("arith.rs", 9, 1), sync_body(|| Ok(()))),
            ])
        })
    }

    fn string_tests() -> BoxFuture<'static, Result<Vec<Test>, BoxError>> {
        Box::pin(async {
            tokio::task::yield_now().await;
            Ok::<_, BoxError>(vec![Test::suite("strings", "Strings", SourceLocation::new("strings.rs", 1, 1))])
        })
    }

    fn broken_tests() -> BoxFuture<'static, Result<Vec<Test>, BoxError>> {
        Box::pin(async { Err::<Vec<Test>, BoxError>("fixture file missing".into()) })
    }

    fn panicking_tests() -> BoxFuture<'static, Result<Vec<Test>, BoxError>> {
        fn explode() -> Result<Vec<Test>, BoxError> {
            panic!("container bug")
        }
        Box::pin(async { explode() })
    }

    fn eager_panicking_tests() -> BoxFuture<'static, Result<Vec<Test>, BoxError>> {
        panic!("generator bug before the future is built")
    }

    static PING: LazyLock<Notify> = LazyLock::new(Notify::new);
    static PONG: LazyLock<Notify> = LazyLock::new(Notify::new);

    // Each half signals the other and then waits for it, so neither finishes unless both run at once.
    fn ping_tests() -> BoxFuture<'static, Result<Vec<Test>, BoxError>> {
        Box::pin(async {
            PONG.notify_one();
            PING.notified().await;
            Ok::<_, BoxError>(vec![Test::suite("ping", "Ping", SourceLocation::new("ping.rs", 1, 1))])
        })
    }

    fn pong_tests() -> BoxFuture<'static, Result<Vec<Test>, BoxError>> {
        Box::pin(async {
            PING.notify_one();
            PONG.notified().await;
            Ok::<_, BoxError>(vec![Test::suite("pong", "Pong", SourceLocation::new("pong.rs", 1, 1))])
        })
    }

    fn exit_body() -> BoxFuture<'static, Result<(), BoxError>> {
        Box::pin(async { Ok::<_, BoxError>(()) })
    }

    static ARITH: TestListFn = TestListFn(arithmetic_tests);
    static STRINGS: TestListFn = TestListFn(string_tests);
    static BROKEN: TestListFn = TestListFn(broken_tests);
    static PANICKING: TestListFn = TestListFn(panicking_tests);
    static EAGER_PANICKING: TestListFn = TestListFn(eager_panicking_tests);
    static PING_CONTAINER: TestListFn = TestListFn(ping_tests);
    static PONG_CONTAINER: TestListFn = TestListFn(pong_tests);
    static EXIT: ExitTestFn = ExitTestFn::new(ExitTestId::from_parts(1, 2), exit_body);

    static ARITH_TYPE: TypeDescriptor =
        TypeDescriptor::new("arith::__🟠$test_container__arith", Capability::TestList(&ARITH));
    static STRINGS_TYPE: TypeDescriptor =
        TypeDescriptor::new("strings::__🟠$test_container__strings", Capability::TestList(&STRINGS));
    static BROKEN_TYPE: TypeDescriptor =
        TypeDescriptor::new("broken::__🟠$test_container__broken", Capability::TestList(&BROKEN));
    static PANICKING_TYPE: TypeDescriptor =
        TypeDescriptor::new("buggy::__🟠$test_container__buggy", Capability::TestList(&PANICKING));
    static EAGER_PANICKING_TYPE: TypeDescriptor =
        TypeDescriptor::new("eager::__🟠$test_container__eager", Capability::TestList(&EAGER_PANICKING));
    static PING_TYPE: TypeDescriptor =
        TypeDescriptor::new("ping::__🟠$test_container__ping", Capability::TestList(&PING_CONTAINER));
    static PONG_TYPE: TypeDescriptor =
        TypeDescriptor::new("pong::__🟠$test_container__pong", Capability::TestList(&PONG_CONTAINER));
    static IMPOSTOR_TYPE: TypeDescriptor =
        TypeDescriptor::new("user::Looks__🟠$test_container__Alike", Capability::None);
    static EXIT_TYPE: TypeDescriptor =
        TypeDescriptor::new("arith::__🟠$exit_test_body__0", Capability::ExitTest(&EXIT));
    static PLAIN_TYPE: TypeDescriptor = TypeDescriptor::new("arith::Helper", Capability::None);

    static MAIN_IMAGE: [MetadataRecord; 5] = [
        MetadataRecord::new(&PLAIN_TYPE),
        MetadataRecord::new(&ARITH_TYPE),
        MetadataRecord::from_raw_parts(0, 0, None),
        MetadataRecord::new(&IMPOSTOR_TYPE),
        MetadataRecord::new(&EXIT_TYPE),
    ];
    static PLUGIN_IMAGE: [MetadataRecord; 2] = [
        MetadataRecord::from_raw_parts(RECORD_MAGIC, RECORD_LAYOUT + 7, Some(&BROKEN_TYPE)),
        MetadataRecord::new(&STRINGS_TYPE),
    ];
    static BROKEN_IMAGE: [MetadataRecord; 1] = [MetadataRecord::new(&BROKEN_TYPE)];
    static PANICKING_IMAGE: [MetadataRecord; 1] = [MetadataRecord::new(&PANICKING_TYPE)];
    static EAGER_PANICKING_IMAGE: [MetadataRecord; 2] = [
        MetadataRecord::new(&ARITH_TYPE),
        MetadataRecord::new(&EAGER_PANICKING_TYPE),
    ];
    static HANDSHAKE_IMAGE: [MetadataRecord; 2] = [MetadataRecord::new(&PING_TYPE), MetadataRecord::new(&PONG_TYPE)];

    fn discovery(images: Vec<LoadedImage>) -> Discovery<StaticImages> {
        Discovery::with_source(StaticImages(images), DiscoveryConfig::default())
    }

    fn healthy() -> Discovery<StaticImages> {
        discovery(vec![
            LoadedImage::new(ImageId(0), Some(&MAIN_IMAGE)),
            LoadedImage::new(ImageId(1), None),
            LoadedImage::new(ImageId(2), Some(&PLUGIN_IMAGE)),
        ])
    }

    fn sorted_ids(tests: &[Test]) -> Vec<String> {
        let mut ids: Vec<_> = tests.iter().map(|t| t.id().to_string()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_name_filter_skips_unreadable_records() {
        let discovery = healthy();
        let scan = discovery.types_with_names_containing(testscan_core::TEST_CONTAINER_MARKER);
        let names: Vec<_> = scan.iter().map(TypeDescriptor::name).collect();
        assert_eq!(
            names,
            [
                "arith::__🟠$test_container__arith",
                "user::Looks__🟠$test_container__Alike",
                "strings::__🟠$test_container__strings",
            ]
        );
    }

    #[test]
    fn test_scan_is_restartable() {
        let discovery = healthy();
        let scan = discovery.types_with_names_containing("::");
        let first: Vec<_> = scan.iter().map(TypeDescriptor::name).collect();
        let second: Vec<_> = scan.iter().map(TypeDescriptor::name).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_capability_probe_skips_impostors() {
        let discovery = healthy();
        let names: Vec<_> = discovery.test_containers().map(|(d, _)| d.name()).collect();
        assert_eq!(
            names,
            ["arith::__🟠$test_container__arith", "strings::__🟠$test_container__strings"]
        );
    }

    #[tokio::test]
    async fn test_all_tests_merges_containers() {
        let tests = healthy().all_tests().await.unwrap();
        assert_eq!(
            sorted_ids(&tests),
            ["arith::adds", "arith::subtracts", "strings::Strings"]
        );
    }

    #[tokio::test]
    async fn test_all_tests_is_idempotent() {
        let discovery = healthy();
        let first = discovery.all_tests().await.unwrap();
        let second = discovery.all_tests().await.unwrap();
        assert_eq!(sorted_ids(&first), sorted_ids(&second));
    }

    #[tokio::test]
    async fn test_container_failure_propagates() {
        let discovery = discovery(vec![
            LoadedImage::new(ImageId(0), Some(&MAIN_IMAGE)),
            LoadedImage::new(ImageId(1), Some(&BROKEN_IMAGE)),
        ]);

        match discovery.all_tests().await {
            Err(DiscoveryError::ContainerFailed { type_name, source }) => {
                assert_eq!(type_name, "broken::__🟠$test_container__broken");
                assert_eq!(source.to_string(), "fixture file missing");
            }
            other => panic!("expected container failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_container_panic_is_reported() {
        let discovery = discovery(vec![LoadedImage::new(ImageId(0), Some(&PANICKING_IMAGE))]);

        match discovery.all_tests().await {
            Err(DiscoveryError::ContainerPanicked { type_name }) => {
                assert_eq!(type_name, "buggy::__🟠$test_container__buggy");
            }
            other => panic!("expected container panic, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_accessor_panic_before_future_is_reported() {
        let discovery = discovery(vec![LoadedImage::new(ImageId(0), Some(&EAGER_PANICKING_IMAGE))]);

        match discovery.all_tests().await {
            Err(DiscoveryError::ContainerPanicked { type_name }) => {
                assert_eq!(type_name, "eager::__🟠$test_container__eager");
            }
            other => panic!("expected container panic, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_suspended_container_does_not_block_others() {
        let discovery = discovery(vec![LoadedImage::new(ImageId(0), Some(&HANDSHAKE_IMAGE))]);

        let tests = tokio::time::timeout(Duration::from_secs(5), discovery.all_tests())
            .await
            .expect("containers were not invoked concurrently")
            .unwrap();
        assert_eq!(sorted_ids(&tests), ["ping::Ping", "pong::Pong"]);
    }

    #[tokio::test]
    async fn test_no_images_means_no_tests() {
        let tests = discovery(Vec::new()).all_tests().await.unwrap();
        assert!(tests.is_empty());
        assert_eq!(discovery(Vec::new()).exit_tests().count(), 0);
    }

    #[tokio::test]
    async fn test_exit_tests_are_found_by_id() {
        let discovery = healthy();
        let ids: Vec<_> = discovery.exit_tests().map(|t| t.id).collect();
        assert_eq!(ids, [ExitTestId::from_parts(1, 2)]);

        let exit_test = discovery.find_exit_test(ExitTestId::from_parts(1, 2)).unwrap();
        assert!((exit_test.body)().await.is_ok());
        assert!(discovery.find_exit_test(ExitTestId(0)).is_none());
    }

    #[test]
    fn test_custom_marker_narrows_scan() {
        let config = DiscoveryConfig::new().with_test_container_marker("strings::");
        let discovery = Discovery::with_source(
            StaticImages(vec![
                LoadedImage::new(ImageId(0), Some(&MAIN_IMAGE)),
                LoadedImage::new(ImageId(1), Some(&PLUGIN_IMAGE)),
            ]),
            config,
        );
        let names: Vec<_> = discovery.test_containers().map(|(d, _)| d.name()).collect();
        assert_eq!(names, ["strings::__🟠$test_container__strings"]);
    }
}
