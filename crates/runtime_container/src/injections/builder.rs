use crate::{
    binding_key, injections::reflect::merge, BindingKey, ClassKey,
    InjectResult, InjectionTable, IntoBindingKey, ParameterTypes, Signature,
    CONSTRUCTOR,
};
use tracing::debug;

/// Declares the dependencies of a class. Created by
/// [`Container::inject`](crate::Container::inject).
///
/// Dependencies can be listed explicitly as binding keys, or reflected from
/// a list of parameter types or a function signature. Reflected types can be
/// overridden per position, which is useful when a parameter should be
/// resolved from a string or symbol binding instead of its type.
///
/// ## Example
///
/// ```
/// use runtime_container::{
///     Arguments, BindingKey, Class, Container, InjectResult, Svc,
///     CONSTRUCTOR,
/// };
///
/// struct Config;
/// impl Class for Config {
///     fn construct(_args: Arguments) -> InjectResult<Self> {
///         Ok(Config)
///     }
/// }
///
/// struct Mailer;
/// impl Mailer {
///     fn new(_config: Svc<Config>, _sender: String) -> Self {
///         Mailer
///     }
/// }
/// impl Class for Mailer {
///     const ARITY: usize = 2;
///     fn construct(args: Arguments) -> InjectResult<Self> {
///         Ok(Mailer::new(args.get(0)?, args.get::<String>(1)?.to_string()))
///     }
/// }
///
/// let container = Container::new();
/// container
///     .inject::<Mailer>()
///     .reflect_fn_with(Mailer::new, [None, Some("mail.sender")])
///     .unwrap();
///
/// let injections = container.injections::<Mailer>().unwrap();
/// assert_eq!(
///     Some(&[BindingKey::class::<Config>(), BindingKey::from("mail.sender")][..]),
///     injections.get(CONSTRUCTOR)
/// );
/// ```
pub struct InjectionBuilder {
    class: ClassKey,
    table: InjectionTable,
}

impl InjectionBuilder {
    pub(crate) fn new(class: ClassKey, table: InjectionTable) -> Self {
        InjectionBuilder { class, table }
    }

    /// Declares the constructor's dependencies explicitly.
    pub fn constructor<I, K>(&self, keys: I) -> InjectResult<&Self>
    where
        I: IntoIterator<Item = K>,
        K: IntoBindingKey,
    {
        self.method(CONSTRUCTOR, keys)
    }

    /// Declares a method's dependencies explicitly.
    pub fn method<I, K>(&self, method: &str, keys: I) -> InjectResult<&Self>
    where
        I: IntoIterator<Item = K>,
        K: IntoBindingKey,
    {
        let keys = keys
            .into_iter()
            .map(binding_key)
            .collect::<InjectResult<Vec<_>>>()?;
        self.declare(method, keys);
        Ok(self)
    }

    /// Declares the constructor's dependencies from a tuple of parameter
    /// types.
    pub fn reflect<P: ParameterTypes>(&self) -> &Self {
        self.declare_merged(CONSTRUCTOR, P::binding_keys(), Vec::new());
        self
    }

    /// Declares the constructor's dependencies from a tuple of parameter
    /// types, with explicit keys overriding some of them.
    pub fn reflect_with<P, I, K>(&self, overrides: I) -> InjectResult<&Self>
    where
        P: ParameterTypes,
        I: IntoIterator<Item = Option<K>>,
        K: IntoBindingKey,
    {
        self.reflect_method_with::<P, I, K>(CONSTRUCTOR, overrides)
    }

    /// Declares a method's dependencies from a tuple of parameter types.
    pub fn reflect_method<P: ParameterTypes>(&self, method: &str) -> &Self {
        self.declare_merged(method, P::binding_keys(), Vec::new());
        self
    }

    /// Declares a method's dependencies from a tuple of parameter types, with
    /// explicit keys overriding some of them.
    pub fn reflect_method_with<P, I, K>(
        &self,
        method: &str,
        overrides: I,
    ) -> InjectResult<&Self>
    where
        P: ParameterTypes,
        I: IntoIterator<Item = Option<K>>,
        K: IntoBindingKey,
    {
        let overrides = validate_overrides(overrides)?;
        self.declare_merged(method, P::binding_keys(), overrides);
        Ok(self)
    }

    /// Declares the constructor's dependencies from the parameters of a
    /// function, usually the type's own constructor function.
    pub fn reflect_fn<Args, S>(&self, constructor: S) -> &Self
    where
        S: Signature<Args>,
    {
        self.declare_merged(
            CONSTRUCTOR,
            constructor.parameter_keys(),
            Vec::new(),
        );
        self
    }

    /// Declares the constructor's dependencies from the parameters of a
    /// function, with explicit keys overriding some of them.
    pub fn reflect_fn_with<Args, S, I, K>(
        &self,
        constructor: S,
        overrides: I,
    ) -> InjectResult<&Self>
    where
        S: Signature<Args>,
        I: IntoIterator<Item = Option<K>>,
        K: IntoBindingKey,
    {
        let overrides = validate_overrides(overrides)?;
        self.declare_merged(
            CONSTRUCTOR,
            constructor.parameter_keys(),
            overrides,
        );
        Ok(self)
    }

    fn declare_merged(
        &self,
        member: &str,
        reflected: Vec<BindingKey>,
        overrides: Vec<Option<BindingKey>>,
    ) {
        if reflected.is_empty() && overrides.is_empty() {
            return;
        }

        self.declare(member, merge(reflected, overrides));
    }

    fn declare(&self, member: &str, keys: Vec<BindingKey>) {
        debug!(
            class = %self.class,
            member,
            dependencies = keys.len(),
            "declared injections"
        );
        self.table.set(self.class, member, keys);
    }
}

fn validate_overrides<I, K>(
    overrides: I,
) -> InjectResult<Vec<Option<BindingKey>>>
where
    I: IntoIterator<Item = Option<K>>,
    K: IntoBindingKey,
{
    overrides
        .into_iter()
        .map(|key| key.map(binding_key).transpose())
        .collect()
}
