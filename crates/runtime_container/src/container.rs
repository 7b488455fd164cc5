use crate::{
    binding_key, Binding, BindingKey, BindingRegistry, Class, ClassKey,
    ContainerBuilder, DynSvc, EventSink, Hook, InjectError, InjectResult,
    InjectionBuilder, InjectionTable, Injections, IntoBindingKey, Module,
    Resolver, RuntimeValues, Service, Svc,
};
use futures::future::BoxFuture;
use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::debug;

pub(crate) trait MapContainerEx<T> {
    fn new(value: T) -> Self;
    fn with_inner<R, F: FnOnce(&T) -> R>(&self, f: F) -> R;
    fn with_inner_mut<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R;
}

pub(crate) type MapContainer<T> = Arc<RwLock<T>>;

impl<T> MapContainerEx<T> for MapContainer<T> {
    fn new(value: T) -> Self {
        Arc::new(RwLock::new(value))
    }

    fn with_inner<R, F: FnOnce(&T) -> R>(&self, f: F) -> R {
        f(&*self.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn with_inner_mut<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R {
        f(&mut *self.write().unwrap_or_else(PoisonError::into_inner))
    }
}

pub(crate) type HookMap = HashMap<BindingKey, Vec<Svc<dyn Hook>>>;

/// Everything shared between a container and the resolvers it creates.
pub(crate) struct ContainerState {
    pub registry: MapContainer<BindingRegistry>,
    pub hooks: MapContainer<HookMap>,
    pub injections: InjectionTable,
    pub emitter: Option<Svc<dyn EventSink>>,
}

/// A runtime dependency injection container. This holds every binding,
/// value, alias, swap and contextual binding, along with the declared
/// dependencies of each class.
///
/// The container is a cheap handle: clones share the same registrations.
/// Each call to [`Container::make`] or [`Container::call`] runs through a
/// fresh [`Resolver`]. Use [`Container::create_resolver`] to keep values
/// bound for the length of a request without touching the container.
///
/// ## Example
///
/// ```
/// use runtime_container::{service, Container, Resolver, RuntimeValues, Svc};
/// use futures::executor::block_on;
///
/// struct Route(&'static str);
///
/// let container = Container::new();
/// container
///     .singleton("route", |_: Resolver, _: RuntimeValues| async {
///         Ok(service(Route("/users")))
///     })
///     .unwrap();
///
/// let first: Svc<Route> = block_on(container.make_as("route")).unwrap();
/// let second: Svc<Route> = block_on(container.make_as("route")).unwrap();
/// assert!(Svc::ptr_eq(&first, &second));
/// assert_eq!("/users", first.0);
/// ```
#[derive(Clone)]
pub struct Container {
    state: Svc<ContainerState>,
}

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Container::with_emitter(None)
    }

    /// Creates a builder for a container.
    #[must_use]
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::default()
    }

    pub(crate) fn with_emitter(emitter: Option<Svc<dyn EventSink>>) -> Self {
        Container {
            state: Svc::new(ContainerState {
                registry: MapContainerEx::new(BindingRegistry::default()),
                hooks: MapContainerEx::new(HashMap::new()),
                injections: InjectionTable::default(),
                emitter,
            }),
        }
    }

    /// Binds a factory to a key. The factory is invoked every time the key is
    /// resolved. Registering a key again replaces the previous binding.
    pub fn bind<K, F, Fut>(&self, key: K, factory: F) -> InjectResult<()>
    where
        K: IntoBindingKey,
        F: Fn(Resolver, RuntimeValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InjectResult<DynSvc>> + Send + 'static,
    {
        self.add_binding(key, Binding::transient(factory))
    }

    /// Binds a factory to a key. The factory is invoked at most once, and
    /// the value it builds is reused for every later resolution. Callers
    /// that resolve the key while it is being built all wait on the same
    /// build, and if that build fails they all receive the error and nothing
    /// is cached.
    pub fn singleton<K, F, Fut>(&self, key: K, factory: F) -> InjectResult<()>
    where
        K: IntoBindingKey,
        F: Fn(Resolver, RuntimeValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InjectResult<DynSvc>> + Send + 'static,
    {
        self.add_binding(key, Binding::singleton(factory))
    }

    /// Adds an already created [`Binding`] under a key.
    pub fn add_binding<K: IntoBindingKey>(
        &self,
        key: K,
        binding: Binding,
    ) -> InjectResult<()> {
        let key = binding_key(key)?;
        debug!(%key, singleton = binding.is_singleton(), "registered binding");
        let abandoned = self
            .state
            .registry
            .with_inner_mut(|registry| registry.bind(key, binding));
        drop(abandoned);
        Ok(())
    }

    /// Binds a value directly to a key. Values outrank bindings registered
    /// under the same key and are never passed through hooks.
    pub fn bind_value<K: IntoBindingKey>(
        &self,
        key: K,
        value: DynSvc,
    ) -> InjectResult<()> {
        let key = binding_key(key)?;
        debug!(%key, "registered value");
        self.state
            .registry
            .with_inner_mut(|registry| registry.bind_value(key, value));
        Ok(())
    }

    /// Makes `alias` resolve to whatever `target` resolves to. Aliases must
    /// be strings or symbols and can't point at themselves. Only one alias
    /// is followed during resolution, so an alias of an alias resolves to
    /// nothing.
    pub fn alias<A, T>(&self, alias: A, target: T) -> InjectResult<()>
    where
        A: IntoBindingKey,
        T: IntoBindingKey,
    {
        let alias = alias.into_binding_key().map_err(|rejected| {
            InjectError::InvalidAliasKey {
                value: rejected.into_description(),
            }
        })?;
        if alias.is_class() {
            return Err(InjectError::InvalidAliasKey {
                value: alias.to_string(),
            });
        }

        let target = binding_key(target)?;
        if alias == target {
            return Err(InjectError::SelfAlias { key: alias });
        }

        debug!(%alias, %target, "registered alias");
        self.state
            .registry
            .with_inner_mut(|registry| registry.alias(alias, target));
        Ok(())
    }

    /// Registers a factory used to resolve `dependency` only while it is
    /// being injected into `parent`. Both must be classes.
    pub fn contextual_binding<P, D, F, Fut>(
        &self,
        parent: P,
        dependency: D,
        factory: F,
    ) -> InjectResult<()>
    where
        P: IntoBindingKey,
        D: IntoBindingKey,
        F: Fn(Resolver, RuntimeValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InjectResult<DynSvc>> + Send + 'static,
    {
        let parent = contextual_class(parent)?;
        let dependency = contextual_class(dependency)?;
        self.add_contextual_binding(
            parent,
            dependency,
            Binding::transient(factory),
        );
        Ok(())
    }

    pub(crate) fn add_contextual_binding(
        &self,
        parent: ClassKey,
        dependency: ClassKey,
        binding: Binding,
    ) {
        debug!(%parent, %dependency, "registered contextual binding");
        self.state.registry.with_inner_mut(|registry| {
            registry.contextual_binding(parent, dependency, binding);
        });
    }

    /// Starts a contextual binding for a parent class.
    ///
    /// ```
    /// use runtime_container::{
    ///     service, Arguments, Class, ClassKey, Container, InjectResult,
    ///     Resolver, RuntimeValues, Svc,
    /// };
    /// use futures::executor::block_on;
    ///
    /// struct Logger(&'static str);
    /// impl Class for Logger {
    ///     fn construct(_args: Arguments) -> InjectResult<Self> {
    ///         Ok(Logger("default"))
    ///     }
    /// }
    ///
    /// struct Billing(Svc<Logger>);
    /// impl Class for Billing {
    ///     const ARITY: usize = 1;
    ///     fn construct(args: Arguments) -> InjectResult<Self> {
    ///         Ok(Billing(args.get(0)?))
    ///     }
    /// }
    ///
    /// let container = Container::new();
    /// container.inject::<Billing>().reflect::<(Svc<Logger>,)>();
    /// container
    ///     .when(ClassKey::of::<Billing>())
    ///     .asks_for(ClassKey::of::<Logger>())
    ///     .provide(|_: Resolver, _: RuntimeValues| async {
    ///         Ok(service(Logger("billing")))
    ///     })
    ///     .unwrap();
    ///
    /// let billing = block_on(container.make_class::<Billing>()).unwrap();
    /// assert_eq!("billing", billing.0 .0);
    ///
    /// let logger = block_on(container.make_class::<Logger>()).unwrap();
    /// assert_eq!("default", logger.0);
    /// ```
    #[must_use]
    pub fn when(&self, parent: ClassKey) -> ContextualBindingBuilder {
        ContextualBindingBuilder {
            container: self.clone(),
            parent,
            dependency: None,
        }
    }

    /// Replaces a class with a factory, usually a test double. A swap
    /// outranks every other registration for the class except values bound
    /// on a resolver. Undo it with [`Container::restore`].
    pub fn swap<K, F, Fut>(&self, class: K, factory: F) -> InjectResult<()>
    where
        K: IntoBindingKey,
        F: Fn(Resolver, RuntimeValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InjectResult<DynSvc>> + Send + 'static,
    {
        let key = binding_key(class)?;
        let class = match key {
            BindingKey::Class(class) => class,
            key => {
                return Err(InjectError::InvalidBindingKey {
                    value: key.to_string(),
                })
            }
        };

        debug!(%class, "swapped class");
        self.state.registry.with_inner_mut(|registry| {
            registry.swap(class, Binding::transient(factory));
        });
        Ok(())
    }

    /// Removes the swap for a class. Returns whether a swap was removed.
    pub fn restore(&self, class: ClassKey) -> bool {
        let restored = self
            .state
            .registry
            .with_inner_mut(|registry| registry.restore(&class));
        debug!(%class, restored, "restored class");
        restored
    }

    /// Removes the swaps for several classes.
    pub fn restore_many<I>(&self, classes: I)
    where
        I: IntoIterator<Item = ClassKey>,
    {
        for class in classes {
            self.restore(class);
        }
    }

    /// Removes every swap.
    pub fn restore_all(&self) {
        let restored = self
            .state
            .registry
            .with_inner_mut(BindingRegistry::restore_all);
        debug!(restored, "restored all classes");
    }

    /// Registers a hook that runs each time the key is freshly constructed.
    /// Hooks for the same key run in the order they were registered.
    pub fn resolving<K, F, Fut>(&self, key: K, hook: F) -> InjectResult<()>
    where
        K: IntoBindingKey,
        F: Fn(DynSvc, Resolver) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InjectResult<()>> + Send + 'static,
    {
        let key = binding_key(key)?;
        debug!(%key, "registered resolving hook");
        let hook: Svc<dyn Hook> = Svc::new(hook);
        self.state.hooks.with_inner_mut(|hooks| {
            hooks.entry(key).or_default().push(hook);
        });
        Ok(())
    }

    /// Whether a value, binding or alias is registered for the key. Classes
    /// that can merely be constructed don't count.
    #[must_use]
    pub fn has_binding<K: IntoBindingKey>(&self, key: K) -> bool {
        match key.into_binding_key() {
            Ok(key) => self
                .state
                .registry
                .with_inner(|registry| registry.has_binding(&key)),
            Err(_) => false,
        }
    }

    /// Whether every key has a value, binding or alias registered.
    #[must_use]
    pub fn has_all_bindings<I, K>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
        K: IntoBindingKey,
    {
        keys.into_iter().all(|key| self.has_binding(key))
    }

    /// Whether the class is currently swapped.
    #[must_use]
    pub fn has_swap(&self, class: ClassKey) -> bool {
        self.state
            .registry
            .with_inner(|registry| registry.has_swap(&class))
    }

    /// Creates a resolver that shares this container's registrations but
    /// keeps its own local values.
    #[must_use]
    pub fn create_resolver(&self) -> Resolver {
        Resolver::new(self.state.clone())
    }

    /// Resolves a key. See [`Resolver::make`].
    pub fn make<K: IntoBindingKey>(
        &self,
        key: K,
    ) -> BoxFuture<'static, InjectResult<DynSvc>> {
        self.create_resolver().make(key)
    }

    /// Resolves a key with runtime values. See [`Resolver::make_with`].
    pub fn make_with<K: IntoBindingKey>(
        &self,
        key: K,
        runtime: RuntimeValues,
    ) -> BoxFuture<'static, InjectResult<DynSvc>> {
        self.create_resolver().make_with(key, runtime)
    }

    /// Resolves a key as a specific type. See [`Resolver::make_as`].
    pub fn make_as<T: Service>(
        &self,
        key: impl IntoBindingKey,
    ) -> BoxFuture<'static, InjectResult<Svc<T>>> {
        self.create_resolver().make_as(key)
    }

    /// Resolves a class. See [`Resolver::make_class`].
    pub fn make_class<T: Class>(
        &self,
    ) -> BoxFuture<'static, InjectResult<Svc<T>>> {
        self.create_resolver().make_class()
    }

    /// Calls a method on a class, injecting its declared dependencies. See
    /// [`Resolver::call`].
    pub fn call<T: Class>(
        &self,
        target: &Svc<T>,
        method: &str,
        runtime: RuntimeValues,
    ) -> BoxFuture<'static, InjectResult<DynSvc>> {
        self.create_resolver().call(target, method, runtime)
    }

    /// Declares the dependencies of a class.
    #[must_use]
    pub fn inject<T: Class>(&self) -> InjectionBuilder {
        InjectionBuilder::new(
            ClassKey::of::<T>(),
            self.state.injections.clone(),
        )
    }

    /// Gets the dependencies declared for a class, if any.
    #[must_use]
    pub fn injections<T: Class>(&self) -> Option<Injections> {
        self.state.injections.get(&ClassKey::of::<T>())
    }

    /// Applies every registration in a module.
    pub fn add_module(&self, module: Module) -> InjectResult<()> {
        module.apply(self)
    }
}

impl Default for Container {
    fn default() -> Self {
        Container::new()
    }
}

fn contextual_class<K: IntoBindingKey>(key: K) -> InjectResult<ClassKey> {
    match key.into_binding_key() {
        Ok(BindingKey::Class(class)) => Ok(class),
        Ok(key) => Err(InjectError::InvalidDependency {
            dependency: key.to_string(),
            reason: "contextual bindings can only be registered for classes",
        }),
        Err(rejected) => Err(InjectError::InvalidDependency {
            dependency: rejected.into_description(),
            reason: "contextual bindings can only be registered for classes",
        }),
    }
}

/// Builds a contextual binding. Created by [`Container::when`].
pub struct ContextualBindingBuilder {
    container: Container,
    parent: ClassKey,
    dependency: Option<InjectResult<ClassKey>>,
}

impl ContextualBindingBuilder {
    /// Names the dependency the binding overrides.
    #[must_use]
    pub fn asks_for<D: IntoBindingKey>(mut self, dependency: D) -> Self {
        self.dependency = Some(contextual_class(dependency));
        self
    }

    /// Registers the factory used for the dependency. Fails with
    /// [`InjectError::MissingContextualTarget`] if no dependency was named.
    pub fn provide<F, Fut>(self, factory: F) -> InjectResult<()>
    where
        F: Fn(Resolver, RuntimeValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InjectResult<DynSvc>> + Send + 'static,
    {
        let dependency = match self.dependency {
            Some(dependency) => dependency?,
            None => {
                return Err(InjectError::MissingContextualTarget {
                    parent: self.parent,
                })
            }
        };

        self.container.add_contextual_binding(
            self.parent,
            dependency,
            Binding::transient(factory),
        );
        Ok(())
    }
}
