//! Test definitions recovered by discovery.
//!
//! Containers hand back [`Test`] values and [`ExitTest`] descriptors. Both are plain data plus a shareable body;
//! the scheduler/runner that consumes them lives outside this crate.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed, sendable future, used wherever a container or a body has to be invoked through a trait object.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type produced by test bodies and container accessors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The async body of a test or exit test.
pub type TestBody = Arc<dyn Fn() -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

/// Wrap an async function as a [`TestBody`].
pub fn body<F, Fut>(f: F) -> TestBody
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    Arc::new(move || -> BoxFuture<'static, Result<(), BoxError>> { Box::pin(f()) })
}

/// Wrap a synchronous function as a [`TestBody`].
pub fn sync_body<F>(f: F) -> TestBody
where
    F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
{
    let f = Arc::new(f);
    Arc::new(move || -> BoxFuture<'static, Result<(), BoxError>> {
        let f = Arc::clone(&f);
        Box::pin(async move { f() })
    })
}

/// Where a test was declared.
///
/// Ordered by file, then line, then column so the catalog can sort tests by declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Fully qualified identity of a test (`module_path::name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TestId(String);

impl TestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A test or suite definition produced by a test-list container.
#[derive(Clone)]
pub struct Test {
    pub name: String,
    pub display_name: Option<String>,
    pub module_path: String,
    pub source_location: SourceLocation,
    /// `None` for suites, which group tests but have no body of their own.
    pub body: Option<TestBody>,
}

impl Test {
    /// Create a test function definition.
    pub fn new(
        module_path: impl Into<String>,
        name: impl Into<String>,
        source_location: SourceLocation,
        body: TestBody,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            module_path: module_path.into(),
            source_location,
            body: Some(body),
        }
    }

    /// Create a suite definition.
    pub fn suite(module_path: impl Into<String>, name: impl Into<String>, source_location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            module_path: module_path.into(),
            source_location,
            body: None,
        }
    }

    /// Set a human-readable display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn id(&self) -> TestId {
        if self.module_path.is_empty() {
            TestId(self.name.clone())
        } else {
            TestId(format!("{}::{}", self.module_path, self.name))
        }
    }

    pub fn is_suite(&self) -> bool {
        self.body.is_none()
    }

    /// Run the test body. Suites complete immediately.
    pub async fn run(&self) -> Result<(), BoxError> {
        match &self.body {
            Some(body) => body().await,
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Test")
            .field("id", &self.id())
            .field("display_name", &self.display_name)
            .field("source_location", &self.source_location)
            .field("is_suite", &self.is_suite())
            .finish()
    }
}

/// Sort tests by where they were declared.
///
/// Discovery returns tests in scan order, which is not stable across loaders; catalogs that want a
/// deterministic order call this after materializing the results.
pub fn sort_by_source_location(tests: &mut [Test]) {
    tests.sort_by(|a, b| {
        a.source_location
            .cmp(&b.source_location)
            .then_with(|| a.id().cmp(&b.id()))
    });
}

/// 128-bit identifier of an exit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExitTestId(pub u128);

impl ExitTestId {
    /// Build an identifier from its high and low 64-bit halves, as emitted by code generators.
    pub const fn from_parts(high: u64, low: u64) -> Self {
        Self(((high as u128) << 64) | low as u128)
    }

    pub const fn parts(self) -> (u64, u64) {
        ((self.0 >> 64) as u64, self.0 as u64)
    }
}

impl fmt::Display for ExitTestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// An exit test: an identifier used as a lookup key plus the body expected to terminate the process.
#[derive(Clone)]
pub struct ExitTest {
    pub id: ExitTestId,
    pub body: TestBody,
}

impl fmt::Debug for ExitTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExitTest").field("id", &self.id).finish_non_exhaustive()
    }
}
