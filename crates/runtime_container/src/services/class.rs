use crate::{
    Arguments, DependencyRequest, DynSvc, InjectError, InjectResult, Service,
    Svc,
};
use futures::future::{BoxFuture, FutureExt};
use std::time::SystemTime;

/// A pending method call started by [`Class::call_method`].
pub type MethodCall = BoxFuture<'static, InjectResult<DynSvc>>;

/// A type the container can construct by resolving its dependencies.
///
/// Which dependencies get resolved is not decided by the class itself. It is
/// declared separately, per constructor or method, through
/// [`Container::inject`](crate::Container::inject). The resolved values are
/// handed to [`Class::construct`] in declaration order, with any runtime
/// values the caller supplied taking their slot first.
///
/// ## Example
///
/// ```
/// use runtime_container::{Arguments, Class, Container, InjectResult, Svc};
/// use futures::executor::block_on;
///
/// struct Database;
///
/// impl Class for Database {
///     fn construct(_args: Arguments) -> InjectResult<Self> {
///         Ok(Database)
///     }
/// }
///
/// struct UserService {
///     database: Svc<Database>,
/// }
///
/// impl Class for UserService {
///     const ARITY: usize = 1;
///
///     fn construct(args: Arguments) -> InjectResult<Self> {
///         Ok(UserService {
///             database: args.get(0)?,
///         })
///     }
/// }
///
/// let container = Container::new();
/// container.inject::<UserService>().reflect::<(Svc<Database>,)>();
///
/// let users: Svc<UserService> =
///     block_on(container.make_class::<UserService>()).unwrap();
/// ```
pub trait Class: Service + Sized {
    /// The number of constructor arguments that have no default value. If
    /// fewer arguments are available when the class is constructed, then
    /// construction fails with
    /// [`InjectError::CannotConstructDependencies`].
    const ARITY: usize = 0;

    /// Whether this is a primitive type (like [`String`] or [`f64`]) that
    /// can be named in a signature but never constructed by the container.
    const PRIMITIVE: bool = false;

    /// The methods that can be invoked through
    /// [`Resolver::call`](crate::Resolver::call).
    const METHODS: &'static [&'static str] = &[];

    /// Constructs the class from its resolved arguments.
    fn construct(args: Arguments) -> InjectResult<Self>;

    /// Starts a call to one of the methods listed in [`Class::METHODS`].
    /// Returns `None` if the method doesn't exist.
    fn call_method(
        self: Svc<Self>,
        _method: &str,
        _args: Arguments,
    ) -> Option<MethodCall> {
        None
    }

    /// Provides the arguments for the constructor or a method. Override this
    /// to take control of dependency resolution for the class. The default
    /// algorithm stays available through
    /// [`DependencyRequest::resolve_default`].
    fn provide_dependencies(
        request: DependencyRequest,
    ) -> BoxFuture<'static, InjectResult<Arguments>> {
        request.resolve_default().boxed()
    }
}

/// Marker class for a parameter of any type. Declaring it as a dependency
/// fails construction, since the container can't know what to inject.
#[derive(Clone, Copy, Debug, Default)]
pub struct Object;

/// Marker class for a callable parameter. Like [`Object`], it can't be
/// injected.
#[derive(Clone, Copy, Debug, Default)]
pub struct Function;

macro_rules! impl_primitive_class {
    ($($type_name:ty),* $(,)?) => {
        $(
            impl Class for $type_name {
                const PRIMITIVE: bool = true;

                fn construct(_args: Arguments) -> InjectResult<Self> {
                    Err(InjectError::InvalidDependency {
                        dependency: std::any::type_name::<Self>().to_owned(),
                        reason: "primitive types cannot be constructed by \
                                 the container",
                    })
                }
            }
        )*
    };
}

impl_primitive_class!(String, f64, bool, SystemTime, Function, Object);
