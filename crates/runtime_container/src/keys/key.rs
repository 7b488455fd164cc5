use crate::{Class, ClassKey, InjectError, InjectResult, Symbol};
use std::{
    fmt::{Debug, Display, Formatter},
    sync::Arc,
};

/// An identifier a binding can be registered under.
///
/// Every binding key is one of three kinds, decided once when the key enters
/// the container:
///
/// - **Name:** an opaque string, such as `"route"`.
/// - **Symbol:** a unique [`Symbol`].
/// - **Class:** a [`ClassKey`], which identifies a type and also lets the
///   container construct it when nothing else is registered for it.
///
/// ```
/// use runtime_container::{BindingKey, Symbol};
///
/// let name = BindingKey::from("route");
/// let symbol = BindingKey::from(Symbol::new("route"));
///
/// assert_ne!(name, symbol);
/// assert!(!name.is_class());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum BindingKey {
    /// A string key.
    Name(Arc<str>),
    /// A symbol key.
    Symbol(Symbol),
    /// A class key.
    Class(ClassKey),
}

impl BindingKey {
    /// Creates a class key for the given class.
    #[must_use]
    pub fn class<T: Class>() -> Self {
        BindingKey::Class(ClassKey::of::<T>())
    }

    /// Whether this key identifies a class.
    #[must_use]
    pub fn is_class(&self) -> bool {
        matches!(self, BindingKey::Class(_))
    }

    /// Gets the class this key identifies, if any.
    #[must_use]
    pub fn as_class(&self) -> Option<&ClassKey> {
        match self {
            BindingKey::Class(class) => Some(class),
            _ => None,
        }
    }
}

impl Debug for BindingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingKey::Name(name) => write!(f, "{:?}", name),
            BindingKey::Symbol(symbol) => Debug::fmt(symbol, f),
            BindingKey::Class(class) => Debug::fmt(class, f),
        }
    }
}

impl Display for BindingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingKey::Name(name) => f.write_str(name),
            BindingKey::Symbol(symbol) => Display::fmt(symbol, f),
            BindingKey::Class(class) => Display::fmt(class, f),
        }
    }
}

impl From<&str> for BindingKey {
    fn from(name: &str) -> Self {
        BindingKey::Name(name.into())
    }
}

impl From<String> for BindingKey {
    fn from(name: String) -> Self {
        BindingKey::Name(name.into())
    }
}

impl From<Symbol> for BindingKey {
    fn from(symbol: Symbol) -> Self {
        BindingKey::Symbol(symbol)
    }
}

impl From<ClassKey> for BindingKey {
    fn from(class: ClassKey) -> Self {
        BindingKey::Class(class)
    }
}

/// A value that was rejected as a binding key.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RejectedKey {
    description: String,
}

impl RejectedKey {
    /// Creates a rejection for a value with the given description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        RejectedKey {
            description: description.into(),
        }
    }

    /// Gets a human-readable description of the rejected value.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Consumes the rejection, returning the description.
    #[must_use]
    pub fn into_description(self) -> String {
        self.description
    }
}

/// Conversion into a [`BindingKey`].
///
/// This is the single validation point shared by every API that accepts a
/// binding key. Strings, symbols and classes convert successfully. Other
/// values, like numbers or booleans, are rejected with a description of the
/// value so the caller can report which value was invalid.
///
/// ```
/// use runtime_container::IntoBindingKey;
///
/// assert!("route".into_binding_key().is_ok());
///
/// let rejected = 42.into_binding_key().unwrap_err();
/// assert_eq!("42", rejected.description());
/// ```
pub trait IntoBindingKey {
    /// Performs the conversion.
    fn into_binding_key(self) -> Result<BindingKey, RejectedKey>;
}

impl IntoBindingKey for BindingKey {
    #[inline]
    fn into_binding_key(self) -> Result<BindingKey, RejectedKey> {
        Ok(self)
    }
}

impl IntoBindingKey for &BindingKey {
    #[inline]
    fn into_binding_key(self) -> Result<BindingKey, RejectedKey> {
        Ok(self.clone())
    }
}

impl IntoBindingKey for &str {
    #[inline]
    fn into_binding_key(self) -> Result<BindingKey, RejectedKey> {
        Ok(BindingKey::from(self))
    }
}

impl IntoBindingKey for String {
    #[inline]
    fn into_binding_key(self) -> Result<BindingKey, RejectedKey> {
        Ok(BindingKey::from(self))
    }
}

impl IntoBindingKey for Arc<str> {
    #[inline]
    fn into_binding_key(self) -> Result<BindingKey, RejectedKey> {
        Ok(BindingKey::Name(self))
    }
}

impl IntoBindingKey for Symbol {
    #[inline]
    fn into_binding_key(self) -> Result<BindingKey, RejectedKey> {
        Ok(BindingKey::Symbol(self))
    }
}

impl IntoBindingKey for &Symbol {
    #[inline]
    fn into_binding_key(self) -> Result<BindingKey, RejectedKey> {
        Ok(BindingKey::Symbol(self.clone()))
    }
}

impl IntoBindingKey for ClassKey {
    #[inline]
    fn into_binding_key(self) -> Result<BindingKey, RejectedKey> {
        Ok(BindingKey::Class(self))
    }
}

macro_rules! impl_rejected_key {
    ($($type_name:ty),* $(,)?) => {
        $(
            /// Scalars are never valid binding keys.
            impl IntoBindingKey for $type_name {
                fn into_binding_key(self) -> Result<BindingKey, RejectedKey> {
                    Err(RejectedKey::new(format!("{:?}", self)))
                }
            }
        )*
    };
}

impl_rejected_key!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    bool,
);

/// Converts a key for a registration API, rejecting invalid keys with
/// [`InjectError::InvalidBindingKey`].
pub(crate) fn binding_key<K: IntoBindingKey>(
    key: K,
) -> InjectResult<BindingKey> {
    key.into_binding_key()
        .map_err(|rejected| InjectError::InvalidBindingKey {
            value: rejected.into_description(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arguments, Class};

    struct Route;

    impl Class for Route {
        fn construct(_args: Arguments) -> InjectResult<Self> {
            Ok(Route)
        }
    }

    #[test]
    fn keys_are_compared_by_identity() {
        assert_eq!(BindingKey::from("route"), BindingKey::from("route"));
        assert_ne!(BindingKey::from("route"), BindingKey::class::<Route>());
        assert_eq!(BindingKey::class::<Route>(), BindingKey::class::<Route>());

        let symbol = Symbol::new("route");
        assert_eq!(
            BindingKey::from(symbol.clone()),
            BindingKey::from(symbol)
        );
    }

    #[test]
    fn scalars_are_rejected_with_their_value() {
        match binding_key(4.5f64) {
            Err(InjectError::InvalidBindingKey { value }) => {
                assert_eq!("4.5", value);
            }
            other => panic!("expected an invalid key, got {:?}", other),
        }

        match binding_key(true) {
            Err(InjectError::InvalidBindingKey { value }) => {
                assert_eq!("true", value);
            }
            other => panic!("expected an invalid key, got {:?}", other),
        }
    }

    #[test]
    fn class_keys_display_their_type() {
        let key = BindingKey::class::<Route>();
        assert!(key.is_class());
        assert!(key.to_string().contains("Route"));
    }
}
