use crate::{BindingKey, ClassKey, InjectError, InjectResult};

/// Information about an active resolution.
#[derive(Clone, Debug, Default)]
pub struct RequestInfo {
    path: Vec<BindingKey>,
    parent: Option<ClassKey>,
}

impl RequestInfo {
    /// Creates a new, empty instance of [`RequestInfo`].
    #[must_use]
    pub fn new() -> Self {
        RequestInfo::default()
    }

    /// Creates a child instance of [`RequestInfo`] with the given key appended
    /// to the end of the resolution path. Fails with
    /// [`InjectError::CycleDetected`] if the key is already being resolved.
    pub fn with_request(&self, key: BindingKey) -> InjectResult<Self> {
        if self.path.contains(&key) {
            let mut cycle = self.path.clone();
            cycle.push(key.clone());
            return Err(InjectError::CycleDetected { key, cycle });
        }

        let mut child = self.clone();
        child.path.push(key);
        Ok(child)
    }

    /// Creates a copy of this [`RequestInfo`] that resolves dependencies on
    /// behalf of the given class. Contextual bindings registered for that
    /// class apply while the parent is set.
    #[must_use]
    pub fn with_parent(&self, parent: Option<ClassKey>) -> Self {
        RequestInfo {
            path: self.path.clone(),
            parent,
        }
    }

    /// Gets the current resolution path, from the outermost key to the key
    /// currently being resolved. This can be used to configure a value based
    /// on what it's being injected into.
    ///
    /// ## Example
    ///
    /// ```
    /// use runtime_container::{service, BindingKey, Container, Resolver, RuntimeValues};
    /// use futures::executor::block_on;
    ///
    /// let container = Container::new();
    /// container
    ///     .bind("depth", |resolver: Resolver, _: RuntimeValues| async move {
    ///         Ok(service(resolver.request_info().path().len()))
    ///     })
    ///     .unwrap();
    ///
    /// let depth = block_on(container.make_as::<usize>("depth")).unwrap();
    /// assert_eq!(1, *depth);
    /// ```
    #[must_use]
    pub fn path(&self) -> &[BindingKey] {
        &self.path
    }

    /// Gets the class whose dependencies are being resolved, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&ClassKey> {
        self.parent.as_ref()
    }
}
