#![allow(clippy::used_underscore_binding)]

use crate::{BindingKey, ClassKey};
use derive_more::{Display, Error};
use downcast_rs::impl_downcast;
use std::{error::Error as StdError, sync::Arc};

/// A reference-counted pointer holding a service. Services are shared between
/// every resolver that resolves them, so the pointer is always an [`Arc<T>`].
pub type Svc<T> = Arc<T>;

/// A service pointer holding an instance of `dyn Service`. This is the type
/// every binding resolves to before it is downcast by the caller.
pub type DynSvc = Svc<dyn Service>;

/// Implemented automatically on types that are capable of being a service.
pub trait Service: downcast_rs::DowncastSync {}
impl<T: ?Sized + downcast_rs::DowncastSync> Service for T {}

impl_downcast!(sync Service);

/// Wraps a value in a [`DynSvc`] so it can be returned from a factory or
/// bound directly as a value.
///
/// ```
/// use runtime_container::{service, DynSvc};
///
/// let value: DynSvc = service(12i32);
/// assert_eq!(Some(&12), value.downcast_ref::<i32>());
/// ```
#[inline]
pub fn service<T: Service>(value: T) -> DynSvc {
    Svc::new(value)
}

/// A result from attempting to resolve a binding.
pub type InjectResult<T> = Result<T, InjectError>;

/// An error that has occurred while registering or resolving a binding.
///
/// Errors are cheap to clone. A single failed singleton build is delivered to
/// every caller that was waiting on it.
#[derive(Clone, Debug, Display, Error)]
#[non_exhaustive]
pub enum InjectError {
    /// A value that is not a string, symbol or class was used as a binding
    /// key.
    #[display(
        fmt = "invalid binding key {}: expected a string, a symbol or a class",
        value
    )]
    InvalidBindingKey {
        /// A description of the rejected value.
        value: String,
    },

    /// A value that is not a string or symbol was used as an alias.
    #[display(
        fmt = "invalid alias {}: aliases must be a string or a symbol",
        value
    )]
    InvalidAliasKey {
        /// A description of the rejected value.
        value: String,
    },

    /// An alias was pointed at itself.
    #[display(fmt = "{} cannot be registered as an alias of itself", key)]
    SelfAlias {
        /// The alias that was rejected.
        key: BindingKey,
    },

    /// A dependency can't be injected, either because a contextual binding
    /// was registered for something that is not a class, or because a
    /// primitive type was declared as a dependency.
    #[display(fmt = "cannot inject {}: {}", dependency, reason)]
    InvalidDependency {
        /// A description of the dependency.
        dependency: String,
        /// Why the dependency was rejected.
        reason: &'static str,
    },

    /// The value passed to `make` is not a binding key the container can
    /// resolve.
    #[display(fmt = "cannot construct value \"{}\" using the container", value)]
    CannotConstructValue {
        /// A description of the rejected value.
        value: String,
    },

    /// A class was constructed with fewer arguments than its constructor
    /// requires.
    #[display(
        fmt = "cannot construct {}: the container resolved {} of its {} \
               constructor dependencies (did you declare its injections?)",
        class,
        provided,
        required
    )]
    CannotConstructDependencies {
        /// The class that could not be constructed.
        class: ClassKey,
        /// The number of arguments the constructor requires.
        required: usize,
        /// The number of arguments that were resolved.
        provided: usize,
    },

    /// A method was called that the target does not have.
    #[display(fmt = "missing method \"{}\" on {}", method, class)]
    MethodNotFound {
        /// The class of the target.
        class: ClassKey,
        /// The method that was requested.
        method: String,
    },

    /// A loaded module has no default export.
    #[display(fmt = "module \"{}\" does not have a default export", specifier)]
    MissingDefaultExport {
        /// The specifier the module was loaded from.
        specifier: String,
    },

    /// A contextual binding was provided before the dependency it overrides
    /// was named.
    #[display(
        fmt = "contextual binding for {} has no dependency (call asks_for \
               before provide)",
        parent
    )]
    MissingContextualTarget {
        /// The class the contextual binding was registered for.
        parent: ClassKey,
    },

    /// A string or symbol key has no value, binding or alias registered.
    #[display(fmt = "cannot resolve binding {} from the container", key)]
    MissingBinding {
        /// The key that was requested.
        key: BindingKey,
    },

    /// A cycle was detected while resolving a binding.
    #[display(
        fmt = "a cycle was detected during resolution of {} [{}]",
        key,
        "fmt_cycle(cycle)"
    )]
    CycleDetected {
        /// The key that closed the cycle.
        key: BindingKey,
        /// The chain of keys that were being resolved, ending in `key`.
        cycle: Vec<BindingKey>,
    },

    /// A resolved value is not of the requested type.
    #[display(fmt = "{} resolved to a value that is not a {}", key, expected)]
    InvalidType {
        /// The key that was resolved.
        key: BindingKey,
        /// The name of the type that was requested.
        expected: &'static str,
    },

    /// A constructor or method read an argument that was never provided.
    #[display(fmt = "argument {} of {} was not provided", index, target)]
    MissingArgument {
        /// The constructor or method reading the argument.
        target: String,
        /// The position of the argument.
        index: usize,
    },

    /// A constructor or method read an argument as the wrong type.
    #[display(fmt = "argument {} of {} is not a {}", index, target, expected)]
    InvalidArgument {
        /// The constructor or method reading the argument.
        target: String,
        /// The position of the argument.
        index: usize,
        /// The name of the type that was requested.
        expected: &'static str,
    },

    /// A factory, hook, constructor or module loader failed with its own
    /// error.
    #[display(fmt = "an error occurred during activation: {}", source)]
    ActivationFailed {
        /// The error that was returned.
        source: Arc<dyn StdError + Send + Sync + 'static>,
    },

    /// An unexpected error has occurred. This is usually caused by a bug in
    /// the library itself.
    #[display(fmt = "an unexpected error occurred (please report this): {}", _0)]
    InternalError(#[error(ignore)] String),
}

impl InjectError {
    /// Wraps an error raised by user code (a factory, hook or constructor).
    pub fn activation<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        InjectError::ActivationFailed {
            source: Arc::new(error),
        }
    }
}

fn fmt_cycle(cycle: &[BindingKey]) -> String {
    let mut joined = String::new();
    for item in cycle {
        if !joined.is_empty() {
            joined.push_str(" -> ");
        }
        joined.push_str(&item.to_string());
    }
    joined
}
