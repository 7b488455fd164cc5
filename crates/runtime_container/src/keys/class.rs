use crate::{
    Arguments, BindingKey, Class, DependencyRequest, DynSvc, InjectError,
    InjectResult, MethodCall, Svc,
};
use futures::future::BoxFuture;
use std::{
    any::TypeId,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
};

type ConstructFn = fn(Arguments) -> InjectResult<DynSvc>;
type ProvideFn =
    fn(DependencyRequest) -> BoxFuture<'static, InjectResult<Arguments>>;
type InvokeFn = fn(DynSvc, &str, Arguments) -> InjectResult<Option<MethodCall>>;

/// Identifies a [`Class`] at runtime. This is the "class constructor" kind
/// of binding key: it carries the identity of the type, and everything the
/// resolver needs to construct it and call its methods without knowing the
/// concrete type.
///
/// Class keys are compared by the [`TypeId`] of the class only.
#[derive(Clone, Copy)]
pub struct ClassKey {
    id: TypeId,
    name: &'static str,
    arity: usize,
    primitive: bool,
    methods: &'static [&'static str],
    construct: ConstructFn,
    provide: ProvideFn,
    invoke: InvokeFn,
}

impl ClassKey {
    /// Creates a [`ClassKey`] for the given class.
    #[must_use]
    pub fn of<T: Class>() -> Self {
        ClassKey {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            arity: T::ARITY,
            primitive: T::PRIMITIVE,
            methods: T::METHODS,
            construct: construct_erased::<T>,
            provide: T::provide_dependencies,
            invoke: invoke_erased::<T>,
        }
    }

    /// Gets the [`TypeId`] of the class.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Gets the type name of the class.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Gets the number of constructor arguments the class requires.
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Whether this is a primitive type that can never be injected.
    #[inline]
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.primitive
    }

    /// Whether the class exposes a callable method with the given name.
    #[must_use]
    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains(&method)
    }

    pub(crate) fn construct(&self, args: Arguments) -> InjectResult<DynSvc> {
        (self.construct)(args)
    }

    pub(crate) fn provide(
        &self,
        request: DependencyRequest,
    ) -> BoxFuture<'static, InjectResult<Arguments>> {
        (self.provide)(request)
    }

    pub(crate) fn invoke(
        &self,
        target: DynSvc,
        method: &str,
        args: Arguments,
    ) -> InjectResult<Option<MethodCall>> {
        (self.invoke)(target, method, args)
    }
}

fn construct_erased<T: Class>(args: Arguments) -> InjectResult<DynSvc> {
    let instance = T::construct(args)?;
    Ok(Svc::new(instance))
}

fn invoke_erased<T: Class>(
    target: DynSvc,
    method: &str,
    args: Arguments,
) -> InjectResult<Option<MethodCall>> {
    let target =
        target
            .downcast_arc::<T>()
            .map_err(|_| InjectError::InvalidType {
                key: BindingKey::Class(ClassKey::of::<T>()),
                expected: std::any::type_name::<T>(),
            })?;
    Ok(T::call_method(target, method, args))
}

impl PartialEq for ClassKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClassKey {}

impl Hash for ClassKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for ClassKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ClassKey").field(&self.name).finish()
    }
}

impl Display for ClassKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[class {}]", self.name)
    }
}
