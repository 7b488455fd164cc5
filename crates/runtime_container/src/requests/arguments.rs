use crate::{DynSvc, InjectError, InjectResult, Service, Svc};
use std::{iter::FromIterator, sync::Arc};

/// Values supplied by the caller of `make` or `call` that take the place of
/// resolved dependencies. Each slot lines up with a declared dependency; an
/// empty slot is resolved by the container as usual.
///
/// ```
/// use runtime_container::RuntimeValues;
///
/// let runtime = RuntimeValues::new().skip().with(String::from("admin"));
/// assert_eq!(2, runtime.len());
/// assert!(runtime.get(0).is_none());
/// assert!(runtime.get(1).is_some());
/// ```
#[derive(Clone, Default)]
pub struct RuntimeValues(Vec<Option<DynSvc>>);

impl RuntimeValues {
    /// Creates an empty set of runtime values.
    #[must_use]
    pub fn new() -> Self {
        RuntimeValues::default()
    }

    /// Appends a value to the next slot.
    #[must_use]
    pub fn with<T: Service>(self, value: T) -> Self {
        self.with_dyn(Svc::new(value))
    }

    /// Appends an already shared value to the next slot.
    #[must_use]
    pub fn with_dyn(mut self, value: DynSvc) -> Self {
        self.0.push(Some(value));
        self
    }

    /// Leaves the next slot empty so that it is resolved by the container.
    #[must_use]
    pub fn skip(mut self) -> Self {
        self.0.push(None);
        self
    }

    /// The number of slots, including empty ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets the value in a slot, if one was supplied.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&DynSvc> {
        self.0.get(index).and_then(Option::as_ref)
    }

    /// Consumes the runtime values, returning the slots.
    #[must_use]
    pub fn into_inner(self) -> Vec<Option<DynSvc>> {
        self.0
    }
}

impl From<Vec<Option<DynSvc>>> for RuntimeValues {
    fn from(values: Vec<Option<DynSvc>>) -> Self {
        RuntimeValues(values)
    }
}

impl FromIterator<DynSvc> for RuntimeValues {
    fn from_iter<I: IntoIterator<Item = DynSvc>>(iter: I) -> Self {
        RuntimeValues(iter.into_iter().map(Some).collect())
    }
}

/// The ordered arguments passed to a constructor or method. Arguments are
/// positional and may be sparse: a slot is empty when nothing was declared
/// or supplied for it.
pub struct Arguments {
    owner: &'static str,
    member: Arc<str>,
    values: Vec<Option<DynSvc>>,
}

impl Arguments {
    pub(crate) fn new(
        owner: &'static str,
        member: Arc<str>,
        values: Vec<Option<DynSvc>>,
    ) -> Self {
        Arguments {
            owner,
            member,
            values,
        }
    }

    /// Creates arguments from the given slots. This is mostly useful in
    /// custom dependency providers and in tests.
    #[must_use]
    pub fn from_values(values: Vec<Option<DynSvc>>) -> Self {
        Arguments::new("<unknown>", Arc::from(""), values)
    }

    /// The number of slots, including empty ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Gets the argument in a slot as the given type. Fails if the slot is
    /// empty or holds a value of another type.
    pub fn get<T: Service>(&self, index: usize) -> InjectResult<Svc<T>> {
        self.optional(index)?
            .ok_or_else(|| InjectError::MissingArgument {
                target: self.target(),
                index,
            })
    }

    /// Gets the argument in a slot as the given type, or `None` if the slot
    /// is empty. Fails if the slot holds a value of another type.
    pub fn optional<T: Service>(
        &self,
        index: usize,
    ) -> InjectResult<Option<Svc<T>>> {
        match self.raw(index) {
            None => Ok(None),
            Some(value) => value.clone().downcast_arc::<T>().map(Some).map_err(
                |_| InjectError::InvalidArgument {
                    target: self.target(),
                    index,
                    expected: std::any::type_name::<T>(),
                },
            ),
        }
    }

    /// Gets the untyped argument in a slot.
    #[must_use]
    pub fn raw(&self, index: usize) -> Option<&DynSvc> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Consumes the arguments, returning the slots.
    #[must_use]
    pub fn into_values(self) -> Vec<Option<DynSvc>> {
        self.values
    }

    fn target(&self) -> String {
        format!("{}::{}", self.owner, self.member)
    }
}
