use crate::{DynSvc, InjectResult, Resolver, RuntimeValues, Svc};
use futures::future::{BoxFuture, FutureExt};
use std::{
    fmt::{Debug, Formatter},
    future::Future,
};

/// A factory for creating values of a binding. Every async closure taking a
/// [`Resolver`] and the caller's [`RuntimeValues`] is automatically a
/// factory.
///
/// The resolver passed to the factory is scoped to the binding being
/// resolved, so anything the factory makes through it is checked for cycles
/// and sees the same local values as the original caller.
///
/// ## Example
///
/// ```
/// use runtime_container::{service, Container, Resolver, RuntimeValues};
/// use futures::executor::block_on;
///
/// let container = Container::new();
/// container
///     .bind("greeting", |_: Resolver, _: RuntimeValues| async {
///         Ok(service(String::from("hello")))
///     })
///     .unwrap();
///
/// let greeting = block_on(container.make_as::<String>("greeting")).unwrap();
/// assert_eq!("hello", greeting.as_str());
/// ```
pub trait Factory: Send + Sync + 'static {
    /// Invokes this factory, creating a new value.
    fn invoke(
        &self,
        resolver: Resolver,
        runtime: RuntimeValues,
    ) -> BoxFuture<'static, InjectResult<DynSvc>>;
}

impl<F, Fut> Factory for F
where
    F: Fn(Resolver, RuntimeValues) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InjectResult<DynSvc>> + Send + 'static,
{
    fn invoke(
        &self,
        resolver: Resolver,
        runtime: RuntimeValues,
    ) -> BoxFuture<'static, InjectResult<DynSvc>> {
        self(resolver, runtime).boxed()
    }
}

/// A registered factory plus its lifetime.
#[derive(Clone)]
pub struct Binding {
    factory: Svc<dyn Factory>,
    singleton: bool,
}

impl Binding {
    /// Creates a binding that invokes its factory on every resolution.
    pub fn transient<F, Fut>(factory: F) -> Self
    where
        F: Fn(Resolver, RuntimeValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InjectResult<DynSvc>> + Send + 'static,
    {
        Binding::from_factory(factory, false)
    }

    /// Creates a binding whose value is built once and cached.
    pub fn singleton<F, Fut>(factory: F) -> Self
    where
        F: Fn(Resolver, RuntimeValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InjectResult<DynSvc>> + Send + 'static,
    {
        Binding::from_factory(factory, true)
    }

    /// Creates a binding from any [`Factory`].
    pub fn from_factory<F: Factory>(factory: F, singleton: bool) -> Self {
        Binding {
            factory: Svc::new(factory),
            singleton,
        }
    }

    /// Whether the value of this binding is cached after the first build.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    pub(crate) fn invoke(
        &self,
        resolver: Resolver,
        runtime: RuntimeValues,
    ) -> BoxFuture<'static, InjectResult<DynSvc>> {
        self.factory.invoke(resolver, runtime)
    }
}

impl Debug for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("singleton", &self.singleton)
            .finish()
    }
}

/// A callback run after a binding is freshly constructed, before the value
/// is handed to the caller. Every async closure taking the value and a
/// [`Resolver`] is automatically a hook.
///
/// A hook that fails fails the resolution it was run for.
pub trait Hook: Send + Sync + 'static {
    /// Runs the hook for a newly constructed value.
    fn call(
        &self,
        value: DynSvc,
        resolver: Resolver,
    ) -> BoxFuture<'static, InjectResult<()>>;
}

impl<F, Fut> Hook for F
where
    F: Fn(DynSvc, Resolver) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InjectResult<()>> + Send + 'static,
{
    fn call(
        &self,
        value: DynSvc,
        resolver: Resolver,
    ) -> BoxFuture<'static, InjectResult<()>> {
        self(value, resolver).boxed()
    }
}
