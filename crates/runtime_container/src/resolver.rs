use crate::{
    binding_key, Binding, BindingKey, Class, ClassKey, ContainerState,
    DependencyRequest, DynSvc, InjectError, InjectResult, IntoBindingKey,
    MapContainer, MapContainerEx, PendingBuild, RequestInfo, ResolveEvent,
    Resolution, RuntimeValues, Service, Svc, CONSTRUCTOR, RESOLVE_EVENT,
};
use futures::future::{BoxFuture, FutureExt};
use std::{collections::HashMap, sync::Arc};
use tracing::{trace, warn};

/// Resolves binding keys into values.
///
/// A resolver shares every registration of the [`Container`](crate::Container)
/// it was created from, but values bound with [`Resolver::bind_value`] are
/// only visible to this resolver and its clones. Those local values outrank
/// everything else, which makes a resolver a natural scope for a single
/// request or operation.
///
/// Values are looked up in this order:
///
/// 1. A value bound on the resolver.
/// 2. A swap for the class.
/// 3. A contextual binding, if the key is a dependency of a class.
/// 4. A value bound on the container.
/// 5. A cached singleton, a singleton being built, or a binding.
/// 6. Constructing the class.
///
/// Strings and symbols are looked up under their alias target if nothing is
/// registered under the key itself.
///
/// ## Example
///
/// ```
/// use runtime_container::{service, Container, Resolver, RuntimeValues, Svc};
/// use futures::executor::block_on;
///
/// struct User(&'static str);
///
/// let container = Container::new();
/// container
///     .bind("greeting", |resolver: Resolver, _: RuntimeValues| async move {
///         let user: Svc<User> = resolver.make_as("user").await?;
///         Ok(service(format!("hello, {}", user.0)))
///     })
///     .unwrap();
///
/// let resolver = container.create_resolver();
/// resolver.bind_value("user", service(User("ada"))).unwrap();
///
/// let greeting: Svc<String> = block_on(resolver.make_as("greeting")).unwrap();
/// assert_eq!("hello, ada", greeting.as_str());
/// assert!(!container.has_binding("user"));
/// ```
#[derive(Clone)]
pub struct Resolver {
    state: Svc<ContainerState>,
    local: MapContainer<HashMap<BindingKey, DynSvc>>,
    info: RequestInfo,
}

enum Step {
    Done(DynSvc),
    Join(PendingBuild, Option<JoinGuard>),
    Invoke {
        key: BindingKey,
        binding: Binding,
        resolver: Resolver,
    },
    Construct(ClassKey),
}

/// Keeps the builds waiting on a joined singleton build recorded for as long
/// as the join is awaited.
struct JoinGuard {
    state: Svc<ContainerState>,
    key: BindingKey,
    waiters: Vec<BindingKey>,
}

impl Drop for JoinGuard {
    fn drop(&mut self) {
        self.state.registry.with_inner_mut(|registry| {
            registry.leave_build(&self.waiters, &self.key);
        });
    }
}

impl Resolver {
    pub(crate) fn new(state: Svc<ContainerState>) -> Self {
        Resolver {
            state,
            local: MapContainerEx::new(HashMap::new()),
            info: RequestInfo::new(),
        }
    }

    fn scoped(&self, info: RequestInfo) -> Self {
        Resolver {
            state: self.state.clone(),
            local: self.local.clone(),
            info,
        }
    }

    /// Information about the resolution this resolver is part of.
    #[must_use]
    pub fn request_info(&self) -> &RequestInfo {
        &self.info
    }

    /// Binds a value on this resolver only. It outranks every registration
    /// on the container for the same key.
    pub fn bind_value<K: IntoBindingKey>(
        &self,
        key: K,
        value: DynSvc,
    ) -> InjectResult<()> {
        let key = binding_key(key)?;
        trace!(%key, "bound resolver value");
        self.local.with_inner_mut(|local| local.insert(key, value));
        Ok(())
    }

    /// Resolves a key.
    ///
    /// Anything that isn't a string, symbol or class fails with
    /// [`InjectError::CannotConstructValue`].
    pub fn make<K: IntoBindingKey>(
        &self,
        key: K,
    ) -> BoxFuture<'static, InjectResult<DynSvc>> {
        self.make_with(key, RuntimeValues::new())
    }

    /// Resolves a key, passing runtime values to its factory or constructor.
    pub fn make_with<K: IntoBindingKey>(
        &self,
        key: K,
        runtime: RuntimeValues,
    ) -> BoxFuture<'static, InjectResult<DynSvc>> {
        match key.into_binding_key() {
            Ok(key) => self.resolve_for(None, key, runtime),
            Err(rejected) => {
                let error = InjectError::CannotConstructValue {
                    value: rejected.into_description(),
                };
                async move { Err(error) }.boxed()
            }
        }
    }

    /// Resolves a key and downcasts the value. Fails with
    /// [`InjectError::InvalidType`] if the value is of another type, which
    /// can happen when a class is swapped for a test double.
    pub fn make_as<T: Service>(
        &self,
        key: impl IntoBindingKey,
    ) -> BoxFuture<'static, InjectResult<Svc<T>>> {
        let key = match key.into_binding_key() {
            Ok(key) => key,
            Err(rejected) => {
                let error = InjectError::CannotConstructValue {
                    value: rejected.into_description(),
                };
                return async move { Err(error) }.boxed();
            }
        };

        let value = self.resolve_for(None, key.clone(), RuntimeValues::new());
        async move {
            value.await?.downcast_arc::<T>().map_err(|_| {
                InjectError::InvalidType {
                    key,
                    expected: std::any::type_name::<T>(),
                }
            })
        }
        .boxed()
    }

    /// Resolves a class.
    pub fn make_class<T: Class>(
        &self,
    ) -> BoxFuture<'static, InjectResult<Svc<T>>> {
        self.make_as::<T>(BindingKey::class::<T>())
    }

    /// Resolves a key as a dependency of `parent`. Contextual bindings
    /// registered for the parent apply.
    pub fn resolve_for(
        &self,
        parent: Option<ClassKey>,
        key: BindingKey,
        runtime: RuntimeValues,
    ) -> BoxFuture<'static, InjectResult<DynSvc>> {
        self.clone().resolve(parent, key, runtime).boxed()
    }

    /// Calls a method on a class, injecting the dependencies declared for
    /// that method. Runtime values fill their slots first.
    pub fn call<T: Class>(
        &self,
        target: &Svc<T>,
        method: &str,
        runtime: RuntimeValues,
    ) -> BoxFuture<'static, InjectResult<DynSvc>> {
        let target: DynSvc = target.clone();
        self.call_dyn(target, ClassKey::of::<T>(), method, runtime)
    }

    /// Calls a method on an untyped target of the given class. Fails with
    /// [`InjectError::MethodNotFound`] if the class has no such method.
    pub fn call_dyn(
        &self,
        target: DynSvc,
        class: ClassKey,
        method: &str,
        runtime: RuntimeValues,
    ) -> BoxFuture<'static, InjectResult<DynSvc>> {
        let resolver = self.clone();
        let method: Arc<str> = Arc::from(method);
        async move {
            let not_found = || InjectError::MethodNotFound {
                class,
                method: method.to_string(),
            };
            if !class.has_method(&method) {
                return Err(not_found());
            }

            trace!(%class, %method, "calling method");
            let declared = resolver.state.injections.declared(&class, &method);
            let request = DependencyRequest::new(
                class,
                method.clone(),
                declared,
                resolver.scoped(resolver.info.with_parent(Some(class))),
                runtime,
            );
            let args = class.provide(request).await?;
            match class.invoke(target, &method, args)? {
                Some(call) => call.await,
                None => Err(not_found()),
            }
        }
        .boxed()
    }

    async fn resolve(
        self,
        parent: Option<ClassKey>,
        key: BindingKey,
        runtime: RuntimeValues,
    ) -> InjectResult<DynSvc> {
        let info = self.info.with_request(key.clone())?.with_parent(parent);

        if let Some(value) = self.local_value(&key) {
            trace!(%key, "resolved resolver value");
            return Ok(value);
        }

        let step = self.state.registry.with_inner_mut(|registry| {
            let step = match registry.lookup(parent.as_ref(), &key) {
                Resolution::Swap(binding) => {
                    trace!(%key, "resolving swap");
                    Step::Invoke {
                        key: key.clone(),
                        binding,
                        resolver: self.scoped(info.clone()),
                    }
                }
                Resolution::Contextual(binding) => {
                    trace!(%key, ?parent, "resolving contextual binding");
                    Step::Invoke {
                        key: key.clone(),
                        binding,
                        resolver: self.scoped(info.clone()),
                    }
                }
                Resolution::Value(value) => {
                    trace!(%key, "resolved container value");
                    Step::Done(value)
                }
                Resolution::Cached(value) => {
                    trace!(%key, "resolved cached singleton");
                    Step::Done(value)
                }
                Resolution::Pending { key: bound, build } => {
                    let info = if bound == key {
                        info.clone()
                    } else {
                        info.with_request(bound.clone())?
                    };
                    let waiters = registry
                        .join_build(info.path(), &bound)
                        .map_err(|chain| {
                            let mut cycle = info.path().to_vec();
                            cycle.extend(chain.into_iter().skip(1));
                            let key = cycle
                                .last()
                                .cloned()
                                .unwrap_or_else(|| bound.clone());
                            InjectError::CycleDetected { key, cycle }
                        })?;

                    trace!(%key, %bound, "joining singleton build");
                    let guard = (!waiters.is_empty()).then(|| JoinGuard {
                        state: self.state.clone(),
                        key: bound,
                        waiters,
                    });
                    Step::Join(build, guard)
                }
                Resolution::Binding { key: bound, binding } => {
                    let info = if bound == key {
                        info.clone()
                    } else {
                        info.with_request(bound.clone())?
                    };
                    let resolver = self.scoped(info);

                    if binding.is_singleton() {
                        trace!(%key, %bound, "building singleton");
                        let id = registry.reserve_build();
                        let build = resolver
                            .clone()
                            .build_singleton(
                                bound.clone(),
                                id,
                                binding,
                                runtime.clone(),
                            )
                            .boxed()
                            .shared();
                        registry.begin_build(bound, id, build.clone());
                        Step::Join(build, None)
                    } else {
                        trace!(%key, %bound, "resolving binding");
                        Step::Invoke {
                            key: bound,
                            binding,
                            resolver,
                        }
                    }
                }
                Resolution::Construct(class) => Step::Construct(class),
                Resolution::Missing => {
                    return Err(InjectError::MissingBinding {
                        key: key.clone(),
                    })
                }
            };
            Ok(step)
        })?;

        match step {
            Step::Done(value) => Ok(value),
            Step::Join(build, guard) => {
                let result = build.await;
                drop(guard);
                result
            }
            Step::Invoke {
                key,
                binding,
                resolver,
            } => {
                let value = binding.invoke(resolver.clone(), runtime).await?;
                resolver.finish(&key, value).await
            }
            Step::Construct(class) => {
                trace!(%key, %class, "constructing class");
                let resolver = self.scoped(info);
                let value = resolver.construct(class, runtime).await?;
                resolver.finish(&BindingKey::Class(class), value).await
            }
        }
    }

    fn local_value(&self, key: &BindingKey) -> Option<DynSvc> {
        let value = self.local.with_inner(|local| local.get(key).cloned());
        if value.is_some() {
            return value;
        }

        let target = self
            .state
            .registry
            .with_inner(|registry| registry.alias_target(key).cloned())?;
        self.local.with_inner(|local| local.get(&target).cloned())
    }

    async fn build_singleton(
        self,
        key: BindingKey,
        id: u64,
        binding: Binding,
        runtime: RuntimeValues,
    ) -> InjectResult<DynSvc> {
        let result = match binding.invoke(self.clone(), runtime).await {
            Ok(value) => self.finish(&key, value).await,
            Err(error) => Err(error),
        };

        if let Err(error) = &result {
            warn!(%key, %error, "singleton build failed, nothing was cached");
        }

        self.state.registry.with_inner_mut(|registry| {
            registry.finish_build(&key, id, &result);
        });
        result
    }

    async fn construct(
        &self,
        class: ClassKey,
        runtime: RuntimeValues,
    ) -> InjectResult<DynSvc> {
        let declared = self.state.injections.declared(&class, CONSTRUCTOR);
        let request = DependencyRequest::new(
            class,
            Arc::from(CONSTRUCTOR),
            declared,
            self.scoped(self.info.with_parent(Some(class))),
            runtime,
        );

        let args = class.provide(request).await?;
        let provided = (0..class.arity())
            .filter(|&index| args.raw(index).is_some())
            .count();
        if provided < class.arity() {
            return Err(InjectError::CannotConstructDependencies {
                class,
                required: class.arity(),
                provided,
            });
        }

        class.construct(args)
    }

    /// Runs the hooks for a freshly constructed value, then emits a resolve
    /// event.
    async fn finish(
        &self,
        key: &BindingKey,
        value: DynSvc,
    ) -> InjectResult<DynSvc> {
        let hooks = self
            .state
            .hooks
            .with_inner(|hooks| hooks.get(key).cloned().unwrap_or_default());
        for hook in hooks {
            hook.call(value.clone(), self.clone()).await?;
        }

        if let Some(emitter) = &self.state.emitter {
            let payload = ResolveEvent {
                binding: key.clone(),
                value: value.clone(),
            };
            emitter.emit(RESOLVE_EVENT, &payload);
        }

        Ok(value)
    }
}
