use std::{
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(0);

/// A unique, opaque binding key.
///
/// Two symbols are only equal if one was cloned from the other. Creating two
/// symbols with the same description gives two distinct keys, which makes
/// symbols useful for bindings that should not collide with string keys
/// registered elsewhere.
///
/// ```
/// use runtime_container::Symbol;
///
/// let first = Symbol::new("database");
/// let second = Symbol::new("database");
///
/// assert_eq!(first, first.clone());
/// assert_ne!(first, second);
/// ```
#[derive(Clone)]
pub struct Symbol {
    id: u64,
    description: Arc<str>,
}

impl Symbol {
    /// Creates a new symbol. The description is only used for display.
    #[must_use]
    pub fn new(description: impl Into<Arc<str>>) -> Self {
        Symbol {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: description.into(),
        }
    }

    /// Gets the description this symbol was created with.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({}#{})", self.description, self.id)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.description)
    }
}
