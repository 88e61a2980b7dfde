//! Container capabilities implemented by generated types.
//!
//! Generated code implements one of two traits:
//! - [`TestContainer`]: an async accessor returning the tests declared in one scope.
//! - [`ExitTestContainer`]: a fixed 128-bit identifier and the body of one exit test.
//!
//! [`TestListFn`] and [`ExitTestFn`] are the `const`-constructible implementations a generator emits into
//! `static` items next to their metadata records.

use std::sync::Arc;

use crate::definition::{BoxError, BoxFuture, ExitTestId, Test, TestBody};

/// A type that contains tests.
pub trait TestContainer: Send + Sync {
    /// Produce the tests declared by this container.
    ///
    /// The accessor may suspend (for example to perform its own discovery). An error means the container is
    /// defective and is propagated to the caller of discovery.
    fn tests(&self) -> BoxFuture<'static, Result<Vec<Test>, BoxError>>;
}

/// A type that contains one exit test.
pub trait ExitTestContainer: Send + Sync {
    fn id(&self) -> ExitTestId;

    fn body(&self) -> TestBody;
}

/// Async accessor returning a container's tests.
pub type TestListAccessor = fn() -> BoxFuture<'static, Result<Vec<Test>, BoxError>>;

/// Body of an exit test as emitted by a generator.
pub type ExitTestBodyFn = fn() -> BoxFuture<'static, Result<(), BoxError>>;

/// A [`TestContainer`] backed by a plain function.
pub struct TestListFn(pub TestListAccessor);

impl TestContainer for TestListFn {
    fn tests(&self) -> BoxFuture<'static, Result<Vec<Test>, BoxError>> {
        (self.0)()
    }
}

/// An [`ExitTestContainer`] backed by an identifier and a plain function.
pub struct ExitTestFn {
    pub id: ExitTestId,
    pub body: ExitTestBodyFn,
}

impl ExitTestFn {
    pub const fn new(id: ExitTestId, body: ExitTestBodyFn) -> Self {
        Self { id, body }
    }
}

impl ExitTestContainer for ExitTestFn {
    fn id(&self) -> ExitTestId {
        self.id
    }

    fn body(&self) -> TestBody {
        Arc::new(self.body)
    }
}
