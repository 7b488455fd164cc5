use crate::{BindingKey, Class, Function, Object, Svc};
use std::time::SystemTime;

/// A type that can appear as a parameter in a reflected signature. The
/// parameter is declared as a dependency on the binding key it maps to.
///
/// Service pointers to a class map to that class. Primitive types map to
/// their primitive class, which is rejected if the container is ever asked
/// to inject it.
pub trait ParameterType {
    /// The binding key this parameter depends on.
    fn binding_key() -> BindingKey;
}

impl<T: Class> ParameterType for Svc<T> {
    fn binding_key() -> BindingKey {
        BindingKey::class::<T>()
    }
}

macro_rules! impl_primitive_parameter {
    ($($type_name:ty),* $(,)?) => {
        $(
            impl ParameterType for $type_name {
                fn binding_key() -> BindingKey {
                    BindingKey::class::<$type_name>()
                }
            }
        )*
    };
}

impl_primitive_parameter!(String, f64, bool, SystemTime, Function, Object);

/// An ordered list of parameter types, written as a tuple. All tuples of 12
/// or fewer [`ParameterType`]s are parameter lists.
pub trait ParameterTypes {
    /// The binding keys of each parameter, in order.
    fn binding_keys() -> Vec<BindingKey>;
}

/// A function whose parameter types can be reflected. All functions of arity
/// 12 or less whose parameters are [`ParameterType`]s are signatures.
///
/// ## Type parameters
/// * `Args` - Tuple of this function's parameter types.
pub trait Signature<Args> {
    /// The binding keys of each parameter, in order.
    fn parameter_keys(&self) -> Vec<BindingKey>;
}

macro_rules! impl_reflection {
    () => {
        impl_reflection!(@impl ());
    };
    ($first:ident $(, $rest:ident)*) => {
        impl_reflection!(@impl ($first $(, $rest)*));
        impl_reflection!($($rest),*);
    };
    (@impl ($($type_name:ident),*)) => {
        impl<$($type_name: ParameterType),*> ParameterTypes for ($($type_name,)*) {
            fn binding_keys() -> Vec<BindingKey> {
                vec![$(<$type_name as ParameterType>::binding_key()),*]
            }
        }

        impl<F, R $(, $type_name)*> Signature<($($type_name,)*)> for F
        where
            F: Fn($($type_name),*) -> R,
            $($type_name: ParameterType,)*
        {
            fn parameter_keys(&self) -> Vec<BindingKey> {
                <($($type_name,)*) as ParameterTypes>::binding_keys()
            }
        }
    };
}

impl_reflection!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12);

/// Merges reflected parameter keys with explicit overrides. An override wins
/// over the reflected key at the same position. A position with neither is
/// declared as [`Object`].
pub(crate) fn merge(
    reflected: Vec<BindingKey>,
    overrides: Vec<Option<BindingKey>>,
) -> Vec<BindingKey> {
    let len = reflected.len().max(overrides.len());
    let mut reflected = reflected.into_iter();
    let mut overrides = overrides.into_iter();
    (0..len)
        .map(|_| {
            let reflected = reflected.next();
            match overrides.next().flatten() {
                Some(key) => key,
                None => reflected.unwrap_or_else(BindingKey::class::<Object>),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arguments, InjectResult};

    struct Database;

    impl Class for Database {
        fn construct(_args: Arguments) -> InjectResult<Self> {
            Ok(Database)
        }
    }

    #[test]
    fn tuple_reflects_each_parameter() {
        let keys = <(Svc<Database>, String)>::binding_keys();
        assert_eq!(
            vec![
                BindingKey::class::<Database>(),
                BindingKey::class::<String>()
            ],
            keys
        );
        assert!(<()>::binding_keys().is_empty());
    }

    #[test]
    fn function_signature_is_reflected() {
        fn connect(_database: Svc<Database>, _retries: f64) {}

        assert_eq!(
            vec![BindingKey::class::<Database>(), BindingKey::class::<f64>()],
            connect.parameter_keys()
        );
    }

    #[test]
    fn overrides_win_and_gaps_become_object() {
        let merged = merge(
            vec![
                BindingKey::class::<Database>(),
                BindingKey::class::<String>()
            ],
            vec![None, Some(BindingKey::from("name")), None],
        );

        assert_eq!(
            vec![
                BindingKey::class::<Database>(),
                BindingKey::from("name"),
                BindingKey::class::<Object>(),
            ],
            merged
        );
    }
}
