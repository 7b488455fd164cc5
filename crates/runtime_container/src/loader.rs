use crate::{
    Class, ClassKey, Container, DynSvc, InjectError, InjectResult, Resolver,
    RuntimeValues, Svc,
};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// A module produced by a [`ModuleLoader`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LoadedModule {
    default: Option<ClassKey>,
}

impl LoadedModule {
    /// Creates a module with the given default export.
    #[must_use]
    pub fn new(default: Option<ClassKey>) -> Self {
        LoadedModule { default }
    }

    /// Creates a module whose default export is the given class.
    #[must_use]
    pub fn exporting<T: Class>() -> Self {
        LoadedModule::new(Some(ClassKey::of::<T>()))
    }

    /// Gets the default export of the module, if it has one.
    #[must_use]
    pub fn default_export(&self) -> Option<ClassKey> {
        self.default
    }
}

/// Loads modules from a specifier, such as a path. The container only
/// needs the default export of each module.
pub trait ModuleLoader: Send + Sync + 'static {
    /// Loads the module with the given specifier.
    fn load(
        &self,
        specifier: &str,
    ) -> BoxFuture<'static, InjectResult<LoadedModule>>;
}

/// Calls a method on the default export of a lazily loaded module.
///
/// The module is loaded the first time it's needed, and its default export
/// is remembered after the first successful load. If loading fails, the
/// next call tries again.
///
/// ## Example
///
/// ```
/// use runtime_container::{
///     service, Arguments, Class, Container, InjectResult, LoadedModule,
///     MethodCall, ModuleImporter, ModuleLoader, RuntimeValues, Svc,
/// };
/// use futures::{executor::block_on, future::BoxFuture, FutureExt};
///
/// struct UsersController;
///
/// impl Class for UsersController {
///     const METHODS: &'static [&'static str] = &["index"];
///
///     fn construct(_args: Arguments) -> InjectResult<Self> {
///         Ok(UsersController)
///     }
///
///     fn call_method(
///         self: Svc<Self>,
///         method: &str,
///         _args: Arguments,
///     ) -> Option<MethodCall> {
///         match method {
///             "index" => Some(async { Ok(service("users")) }.boxed()),
///             _ => None,
///         }
///     }
/// }
///
/// struct Controllers;
///
/// impl ModuleLoader for Controllers {
///     fn load(
///         &self,
///         _specifier: &str,
///     ) -> BoxFuture<'static, InjectResult<LoadedModule>> {
///         async { Ok(LoadedModule::exporting::<UsersController>()) }.boxed()
///     }
/// }
///
/// let container = Container::new();
/// let importer = ModuleImporter::new(Controllers, "controllers/users", "index");
/// let index = importer.to_callable(&container);
///
/// let result = block_on(index(RuntimeValues::new())).unwrap();
/// assert_eq!(Some(&"users"), result.downcast_ref::<&str>());
/// ```
#[derive(Clone)]
pub struct ModuleImporter {
    loader: Svc<dyn ModuleLoader>,
    specifier: Arc<str>,
    method: Arc<str>,
    export: Arc<OnceCell<ClassKey>>,
}

impl ModuleImporter {
    /// Creates an importer that calls `method` on the default export of the
    /// module at `specifier`.
    pub fn new<L: ModuleLoader>(
        loader: L,
        specifier: impl Into<Arc<str>>,
        method: impl Into<Arc<str>>,
    ) -> Self {
        ModuleImporter::with_loader(Svc::new(loader), specifier, method)
    }

    /// Creates an importer that shares a loader with other importers.
    pub fn with_loader(
        loader: Svc<dyn ModuleLoader>,
        specifier: impl Into<Arc<str>>,
        method: impl Into<Arc<str>>,
    ) -> Self {
        ModuleImporter {
            loader,
            specifier: specifier.into(),
            method: method.into(),
            export: Arc::new(OnceCell::new()),
        }
    }

    /// The specifier of the module.
    #[must_use]
    pub fn specifier(&self) -> &str {
        &self.specifier
    }

    /// The method called on the default export.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Loads the module if needed and returns its default export. Fails
    /// with [`InjectError::MissingDefaultExport`] if the module has none.
    pub async fn default_export(&self) -> InjectResult<ClassKey> {
        let export = self
            .export
            .get_or_try_init(|| async {
                debug!(specifier = %self.specifier, "loading module");
                let module = self.loader.load(&self.specifier).await?;
                module.default_export().ok_or_else(|| {
                    InjectError::MissingDefaultExport {
                        specifier: self.specifier.to_string(),
                    }
                })
            })
            .await?;
        Ok(*export)
    }

    /// Makes the default export through the resolver and calls the method
    /// on it.
    pub async fn handle(
        &self,
        resolver: &Resolver,
        runtime: RuntimeValues,
    ) -> InjectResult<DynSvc> {
        let class = self.default_export().await?;
        let target = resolver.make(class).await?;
        resolver.call_dyn(target, class, &self.method, runtime).await
    }

    /// Creates a function that handles each call through a fresh resolver
    /// of the container.
    pub fn to_callable(
        &self,
        container: &Container,
    ) -> impl Fn(RuntimeValues) -> BoxFuture<'static, InjectResult<DynSvc>>
           + Send
           + Sync
           + 'static {
        let importer = self.clone();
        let container = container.clone();
        move |runtime| {
            let importer = importer.clone();
            let resolver = container.create_resolver();
            async move { importer.handle(&resolver, runtime).await }.boxed()
        }
    }
}

/// Calls a method on a class made through the container. This is the
/// counterpart of [`ModuleImporter`] for classes that are already known.
#[derive(Clone, Debug)]
pub struct ModuleCaller {
    class: ClassKey,
    method: Arc<str>,
}

impl ModuleCaller {
    /// Creates a caller for `method` on the class.
    pub fn new(class: ClassKey, method: impl Into<Arc<str>>) -> Self {
        ModuleCaller {
            class,
            method: method.into(),
        }
    }

    /// Makes the class through the resolver and calls the method on it.
    pub async fn handle(
        &self,
        resolver: &Resolver,
        runtime: RuntimeValues,
    ) -> InjectResult<DynSvc> {
        let target = resolver.make(self.class).await?;
        resolver
            .call_dyn(target, self.class, &self.method, runtime)
            .await
    }

    /// Creates a function that handles each call through a fresh resolver
    /// of the container.
    pub fn to_callable(
        &self,
        container: &Container,
    ) -> impl Fn(RuntimeValues) -> BoxFuture<'static, InjectResult<DynSvc>>
           + Send
           + Sync
           + 'static {
        let caller = self.clone();
        let container = container.clone();
        move |runtime| {
            let caller = caller.clone();
            let resolver = container.create_resolver();
            async move { caller.handle(&resolver, runtime).await }.boxed()
        }
    }
}
