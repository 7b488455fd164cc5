use crate::{
    Container, DynSvc, EventSink, InjectResult, IntoBindingKey, Module,
    Resolver, RuntimeValues, Svc,
};
use std::future::Future;

/// A builder for a [`Container`].
///
/// Registrations made on the builder are validated when the container is
/// built, so an invalid key anywhere in the builder or its modules fails
/// [`ContainerBuilder::build`].
#[derive(Default)]
pub struct ContainerBuilder {
    emitter: Option<Svc<dyn EventSink>>,
    root: Module,
    modules: Vec<Module>,
}

impl ContainerBuilder {
    /// Sets the sink resolve events are emitted to.
    pub fn emitter<S: EventSink>(&mut self, sink: S) {
        self.emitter = Some(Svc::new(sink));
    }

    /// Binds a factory to a key. See [`Container::bind`].
    pub fn bind<K, F, Fut>(&mut self, key: K, factory: F)
    where
        K: IntoBindingKey + Send + 'static,
        F: Fn(Resolver, RuntimeValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InjectResult<DynSvc>> + Send + 'static,
    {
        self.root.bind(key, factory);
    }

    /// Binds a singleton factory to a key. See [`Container::singleton`].
    pub fn singleton<K, F, Fut>(&mut self, key: K, factory: F)
    where
        K: IntoBindingKey + Send + 'static,
        F: Fn(Resolver, RuntimeValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InjectResult<DynSvc>> + Send + 'static,
    {
        self.root.singleton(key, factory);
    }

    /// Binds a value to a key. See [`Container::bind_value`].
    pub fn bind_value<K>(&mut self, key: K, value: DynSvc)
    where
        K: IntoBindingKey + Send + 'static,
    {
        self.root.bind_value(key, value);
    }

    /// Registers an alias. See [`Container::alias`].
    pub fn alias<A, T>(&mut self, alias: A, target: T)
    where
        A: IntoBindingKey + Send + 'static,
        T: IntoBindingKey + Send + 'static,
    {
        self.root.alias(alias, target);
    }

    /// Adds all the registrations in a module. Modules are applied in the
    /// order they were added, after the registrations made directly on the
    /// builder, so a later module can replace an earlier binding.
    pub fn add_module(&mut self, module: Module) {
        self.modules.push(module);
    }

    /// Builds the container.
    pub fn build(self) -> InjectResult<Container> {
        let container = Container::with_emitter(self.emitter);
        container.add_module(self.root)?;
        for module in self.modules {
            container.add_module(module)?;
        }

        Ok(container)
    }
}
