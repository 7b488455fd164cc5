use crate::{
    Container, DynSvc, InjectResult, IntoBindingKey, Resolver, RuntimeValues,
};
use std::future::Future;

type Registration = Box<dyn FnOnce(&Container) -> InjectResult<()> + Send>;

/// A collection of registrations that can be added all at once to a
/// [`ContainerBuilder`](crate::ContainerBuilder) or a [`Container`]. Modules
/// can be used to group together related bindings and configure the
/// container in pieces rather than all at once.
///
/// Registrations are validated when the module is applied, in the order
/// they were added.
///
/// For creating a module easily via a domain specific language, see
/// [`define_module!`].
#[derive(Default)]
pub struct Module {
    registrations: Vec<Registration>,
}

impl Module {
    /// Creates an empty module.
    #[must_use]
    pub fn new() -> Self {
        Module::default()
    }

    /// Adds a binding. See [`Container::bind`].
    pub fn bind<K, F, Fut>(&mut self, key: K, factory: F)
    where
        K: IntoBindingKey + Send + 'static,
        F: Fn(Resolver, RuntimeValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InjectResult<DynSvc>> + Send + 'static,
    {
        self.register(move |container| container.bind(key, factory));
    }

    /// Adds a singleton binding. See [`Container::singleton`].
    pub fn singleton<K, F, Fut>(&mut self, key: K, factory: F)
    where
        K: IntoBindingKey + Send + 'static,
        F: Fn(Resolver, RuntimeValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InjectResult<DynSvc>> + Send + 'static,
    {
        self.register(move |container| container.singleton(key, factory));
    }

    /// Adds a value. See [`Container::bind_value`].
    pub fn bind_value<K>(&mut self, key: K, value: DynSvc)
    where
        K: IntoBindingKey + Send + 'static,
    {
        self.register(move |container| container.bind_value(key, value));
    }

    /// Adds an alias. See [`Container::alias`].
    pub fn alias<A, T>(&mut self, alias: A, target: T)
    where
        A: IntoBindingKey + Send + 'static,
        T: IntoBindingKey + Send + 'static,
    {
        self.register(move |container| container.alias(alias, target));
    }

    /// Adds an arbitrary registration, such as a swap or a hook.
    pub fn register<F>(&mut self, registration: F)
    where
        F: FnOnce(&Container) -> InjectResult<()> + Send + 'static,
    {
        self.registrations.push(Box::new(registration));
    }

    /// The number of registrations in this module.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether this module has no registrations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub(crate) fn apply(self, container: &Container) -> InjectResult<()> {
        for registration in self.registrations {
            registration(container)?;
        }

        Ok(())
    }
}

/// Defines a new module using a domain specific language.
///
/// ## Example
///
/// ```
/// use runtime_container::{
///     define_module, service, Container, Resolver, RuntimeValues, Svc,
/// };
/// use futures::executor::block_on;
///
/// struct Pool(usize);
///
/// let module = define_module! {
///     values = {
///         "pool.size" => service(4usize),
///     },
///     singletons = {
///         "pool" => |resolver: Resolver, _: RuntimeValues| async move {
///             let size: Svc<usize> = resolver.make_as("pool.size").await?;
///             Ok(service(Pool(*size)))
///         },
///     },
///     aliases = {
///         "db" => "pool",
///     },
///
///     // Sections can repeat, and each can be conditionally compiled.
///     #[cfg(test)]
///     values = {
///         "pool.size" => service(1usize),
///     },
/// };
///
/// let mut builder = Container::builder();
/// builder.add_module(module);
///
/// let container = builder.build().unwrap();
/// let pool: Svc<Pool> = block_on(container.make_as("db")).unwrap();
///
/// #[cfg(not(test))]
/// assert_eq!(4, pool.0);
/// ```
#[macro_export]
macro_rules! define_module {
    {
        $(
            $(#[$($attr:meta),*])*
            $key:ident = $value:tt
        ),*
        $(,)?
    } => {
        {
            #[allow(unused_mut)]
            let mut module = <$crate::Module as ::std::default::Default>::default();
            $(
                $(#[$($attr),*])*
                $crate::define_module!(@register &mut module, $key = $value);
            )*
            module
        }
    };
    (
        @register $module:expr,
        bindings = {
            $($binding:expr => $factory:expr),*
            $(,)?
        }
    ) => {
        $($module.bind($binding, $factory);)*
    };
    (
        @register $module:expr,
        singletons = {
            $($binding:expr => $factory:expr),*
            $(,)?
        }
    ) => {
        $($module.singleton($binding, $factory);)*
    };
    (
        @register $module:expr,
        values = {
            $($binding:expr => $value:expr),*
            $(,)?
        }
    ) => {
        $($module.bind_value($binding, $value);)*
    };
    (
        @register $module:expr,
        aliases = {
            $($alias:expr => $target:expr),*
            $(,)?
        }
    ) => {
        $($module.alias($alias, $target);)*
    };
}
