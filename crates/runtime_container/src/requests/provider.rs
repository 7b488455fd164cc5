use crate::{
    Arguments, BindingKey, ClassKey, InjectError, InjectResult, Resolver,
    RuntimeValues,
};
use futures::future::try_join_all;
use std::sync::Arc;

/// A request for the arguments of a constructor or method.
///
/// Classes receive this in [`Class::provide_dependencies`](crate::Class::provide_dependencies).
/// Most classes leave dependency resolution to
/// [`DependencyRequest::resolve_default`], but a class can inspect the
/// request, adjust it or build its arguments by hand instead.
///
/// ## Example
///
/// ```
/// use runtime_container::{
///     Arguments, Class, Container, DependencyRequest, InjectResult,
///     RuntimeValues, Svc,
/// };
/// use futures::{executor::block_on, future::BoxFuture, FutureExt};
///
/// struct Greeting(String);
///
/// impl Class for Greeting {
///     const ARITY: usize = 1;
///
///     fn construct(args: Arguments) -> InjectResult<Self> {
///         let name: Svc<String> = args.get(0)?;
///         Ok(Greeting(format!("hello, {}", name)))
///     }
///
///     fn provide_dependencies(
///         request: DependencyRequest,
///     ) -> BoxFuture<'static, InjectResult<Arguments>> {
///         // Fill in a name when the caller didn't supply one
///         let request = if request.runtime().get(0).is_none() {
///             request.with_runtime(RuntimeValues::new().with(String::from("world")))
///         } else {
///             request
///         };
///         request.resolve_default().boxed()
///     }
/// }
///
/// let container = Container::new();
/// let greeting: Svc<Greeting> =
///     block_on(container.make_class::<Greeting>()).unwrap();
/// assert_eq!("hello, world", greeting.0);
/// ```
pub struct DependencyRequest {
    class: ClassKey,
    member: Arc<str>,
    declared: Vec<BindingKey>,
    resolver: Resolver,
    runtime: RuntimeValues,
}

impl DependencyRequest {
    pub(crate) fn new(
        class: ClassKey,
        member: Arc<str>,
        declared: Vec<BindingKey>,
        resolver: Resolver,
        runtime: RuntimeValues,
    ) -> Self {
        DependencyRequest {
            class,
            member,
            declared,
            resolver,
            runtime,
        }
    }

    /// The class whose constructor or method is being called.
    #[must_use]
    pub fn class(&self) -> &ClassKey {
        &self.class
    }

    /// The member being called. This is
    /// [`CONSTRUCTOR`](crate::CONSTRUCTOR) for the constructor.
    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }

    /// The dependency keys declared for the member, in order.
    #[must_use]
    pub fn declared(&self) -> &[BindingKey] {
        &self.declared
    }

    /// The resolver dependencies are resolved through.
    #[must_use]
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// The values supplied by the caller.
    #[must_use]
    pub fn runtime(&self) -> &RuntimeValues {
        &self.runtime
    }

    /// Replaces the values supplied by the caller.
    #[must_use]
    pub fn with_runtime(self, runtime: RuntimeValues) -> Self {
        DependencyRequest { runtime, ..self }
    }

    /// Resolves the arguments using the declared dependencies.
    ///
    /// The argument list is as long as the longer of the runtime values and
    /// the declared dependencies. Each slot uses the runtime value if one
    /// was supplied, otherwise the declared dependency is resolved on behalf
    /// of the class. Slots with neither are left empty. Primitive classes
    /// can't be resolved and fail with [`InjectError::InvalidDependency`].
    ///
    /// Every slot is resolved concurrently, and the first failure is
    /// returned.
    pub async fn resolve_default(self) -> InjectResult<Arguments> {
        let DependencyRequest {
            class,
            member,
            declared,
            resolver,
            runtime,
        } = self;

        let supplied = runtime.into_inner();
        let len = supplied.len().max(declared.len());
        let slots = (0..len).map(|index| {
            let value = supplied.get(index).cloned().flatten();
            let key = declared.get(index).cloned();
            let resolver = resolver.clone();
            let member = member.clone();
            async move {
                if let Some(value) = value {
                    return Ok(Some(value));
                }

                let key = match key {
                    Some(key) => key,
                    None => return Ok(None),
                };

                if let BindingKey::Class(dependency) = &key {
                    if dependency.is_primitive() {
                        return Err(InjectError::InvalidDependency {
                            dependency: format!(
                                "{} (argument {} of {}::{})",
                                dependency.name(),
                                index,
                                class.name(),
                                member,
                            ),
                            reason: "primitive types cannot be injected",
                        });
                    }
                }

                resolver
                    .resolve_for(Some(class), key, RuntimeValues::new())
                    .await
                    .map(Some)
            }
        });

        let values = try_join_all(slots).await?;
        Ok(Arguments::new(class.name(), member, values))
    }
}
