use crate::{BindingKey, ClassKey, MapContainer, MapContainerEx};
use std::{collections::HashMap, sync::Arc};

/// The member name the constructor's dependencies are declared under.
pub const CONSTRUCTOR: &str = "_constructor";

/// The dependencies declared for a class, per member. The constructor is
/// declared under [`CONSTRUCTOR`].
///
/// A member with no entry has no declared dependencies.
#[derive(Clone, Debug, Default)]
pub struct Injections {
    members: HashMap<Arc<str>, Vec<BindingKey>>,
}

impl Injections {
    /// Creates an empty set of injections.
    #[must_use]
    pub fn new() -> Self {
        Injections::default()
    }

    /// Gets the dependencies declared for a member.
    #[must_use]
    pub fn get(&self, member: &str) -> Option<&[BindingKey]> {
        self.members.get(member).map(Vec::as_slice)
    }

    /// Gets the dependencies declared for the constructor.
    #[must_use]
    pub fn constructor(&self) -> Option<&[BindingKey]> {
        self.get(CONSTRUCTOR)
    }

    /// Declares the dependencies of a member, replacing any previous
    /// declaration.
    pub fn set(&mut self, member: impl Into<Arc<str>>, keys: Vec<BindingKey>) {
        self.members.insert(member.into(), keys);
    }

    /// Iterates over the members that have declared dependencies.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(AsRef::as_ref)
    }

    /// Whether no member has declared dependencies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Injections of every class known to a container, looked up by class
/// identity.
#[derive(Clone, Default)]
pub(crate) struct InjectionTable {
    classes: MapContainer<HashMap<ClassKey, Injections>>,
}

impl InjectionTable {
    pub fn get(&self, class: &ClassKey) -> Option<Injections> {
        self.classes.with_inner(|classes| classes.get(class).cloned())
    }

    pub fn declared(&self, class: &ClassKey, member: &str) -> Vec<BindingKey> {
        self.classes.with_inner(|classes| {
            classes
                .get(class)
                .and_then(|injections| injections.get(member))
                .map(<[BindingKey]>::to_vec)
                .unwrap_or_default()
        })
    }

    pub fn set(&self, class: ClassKey, member: &str, keys: Vec<BindingKey>) {
        self.classes.with_inner_mut(|classes| {
            classes.entry(class).or_default().set(member, keys);
        });
    }
}
