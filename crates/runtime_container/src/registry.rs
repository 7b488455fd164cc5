use crate::{Binding, BindingKey, ClassKey, DynSvc, InjectResult};
use futures::future::{BoxFuture, Shared};
use std::{collections::HashMap, iter::once};

/// A singleton build that is still running. Every caller that asks for the
/// singleton while it is being built awaits the same build.
pub(crate) type PendingBuild = Shared<BoxFuture<'static, InjectResult<DynSvc>>>;

/// Where a value for a binding key comes from, in order of precedence.
pub(crate) enum Resolution {
    Swap(Binding),
    Contextual(Binding),
    Value(DynSvc),
    Cached(DynSvc),
    Pending { key: BindingKey, build: PendingBuild },
    Binding { key: BindingKey, binding: Binding },
    Construct(ClassKey),
    Missing,
}

/// Storage for every registration made on a container. The registry only
/// stores and looks up bindings. It never constructs anything.
#[derive(Default)]
pub(crate) struct BindingRegistry {
    bindings: HashMap<BindingKey, Binding>,
    values: HashMap<BindingKey, DynSvc>,
    cached: HashMap<BindingKey, DynSvc>,
    aliases: HashMap<BindingKey, BindingKey>,
    contextual: HashMap<ClassKey, HashMap<ClassKey, Binding>>,
    swaps: HashMap<ClassKey, Binding>,
    pending: HashMap<BindingKey, (u64, PendingBuild)>,
    waits: HashMap<BindingKey, Vec<BindingKey>>,
    next_build: u64,
}

impl BindingRegistry {
    /// Registers a binding, replacing any previous binding for the key. A
    /// singleton cached or being built for the old binding is forgotten.
    ///
    /// The abandoned build is returned so it can be dropped after the
    /// registry is unlocked.
    pub fn bind(
        &mut self,
        key: BindingKey,
        binding: Binding,
    ) -> Option<PendingBuild> {
        self.cached.remove(&key);
        let abandoned = self.pending.remove(&key).map(|(_, build)| build);
        self.bindings.insert(key, binding);
        abandoned
    }

    pub fn bind_value(&mut self, key: BindingKey, value: DynSvc) {
        self.values.insert(key, value);
    }

    pub fn alias(&mut self, alias: BindingKey, target: BindingKey) {
        self.aliases.insert(alias, target);
    }

    pub fn contextual_binding(
        &mut self,
        parent: ClassKey,
        dependency: ClassKey,
        binding: Binding,
    ) {
        self.contextual
            .entry(parent)
            .or_default()
            .insert(dependency, binding);
    }

    pub fn swap(&mut self, class: ClassKey, binding: Binding) {
        self.swaps.insert(class, binding);
    }

    pub fn restore(&mut self, class: &ClassKey) -> bool {
        self.swaps.remove(class).is_some()
    }

    pub fn restore_all(&mut self) -> usize {
        let count = self.swaps.len();
        self.swaps.clear();
        count
    }

    pub fn has_binding(&self, key: &BindingKey) -> bool {
        self.values.contains_key(key)
            || self.bindings.contains_key(key)
            || self.aliases.contains_key(key)
    }

    pub fn has_swap(&self, class: &ClassKey) -> bool {
        self.swaps.contains_key(class)
    }

    pub fn alias_target(&self, key: &BindingKey) -> Option<&BindingKey> {
        self.aliases.get(key)
    }

    /// Finds where the value for a key comes from. Only one alias hop is
    /// followed.
    pub fn lookup(
        &self,
        parent: Option<&ClassKey>,
        key: &BindingKey,
    ) -> Resolution {
        let target = self.aliases.get(key);
        let class = key
            .as_class()
            .or_else(|| target.and_then(BindingKey::as_class));

        if let Some(class) = class {
            if let Some(binding) = self.swaps.get(class) {
                return Resolution::Swap(binding.clone());
            }

            let contextual = parent
                .and_then(|parent| self.contextual.get(parent))
                .and_then(|bindings| bindings.get(class));
            if let Some(binding) = contextual {
                return Resolution::Contextual(binding.clone());
            }
        }

        for candidate in once(key).chain(target) {
            if let Some(value) = self.values.get(candidate) {
                return Resolution::Value(value.clone());
            }
        }

        for candidate in once(key).chain(target) {
            if let Some(value) = self.cached.get(candidate) {
                return Resolution::Cached(value.clone());
            }

            if let Some((_, build)) = self.pending.get(candidate) {
                return Resolution::Pending {
                    key: candidate.clone(),
                    build: build.clone(),
                };
            }

            if let Some(binding) = self.bindings.get(candidate) {
                return Resolution::Binding {
                    key: candidate.clone(),
                    binding: binding.clone(),
                };
            }
        }

        match class {
            Some(class) => Resolution::Construct(*class),
            None => Resolution::Missing,
        }
    }

    /// Reserves the id of a singleton build that is about to start.
    pub fn reserve_build(&mut self) -> u64 {
        let id = self.next_build;
        self.next_build += 1;
        id
    }

    /// Records a singleton build that has started.
    pub fn begin_build(
        &mut self,
        key: BindingKey,
        id: u64,
        build: PendingBuild,
    ) {
        self.pending.insert(key, (id, build));
    }

    /// Clears a finished singleton build, caching its value if it succeeded.
    /// Nothing happens if the binding was replaced while it was being built.
    pub fn finish_build(
        &mut self,
        key: &BindingKey,
        id: u64,
        result: &InjectResult<DynSvc>,
    ) {
        match self.pending.get(key) {
            Some((pending_id, _)) if *pending_id == id => {
                self.pending.remove(key);
            }
            _ => return,
        }

        if let Ok(value) = result {
            self.cached.insert(key.clone(), value.clone());
        }
    }

    /// Records that the builds on `path` are waiting for the build of `key`
    /// and returns the ones that were recorded.
    ///
    /// If the build of `key` is already waiting, directly or through other
    /// builds, for a build on `path`, nothing is recorded and the chain of
    /// waiting keys starting at `key` is returned as the error instead.
    pub fn join_build(
        &mut self,
        path: &[BindingKey],
        key: &BindingKey,
    ) -> Result<Vec<BindingKey>, Vec<BindingKey>> {
        if let Some(chain) = self.waiting_chain(key, path) {
            return Err(chain);
        }

        let waiters: Vec<_> = path
            .iter()
            .filter(|&waiter| waiter != key)
            .filter(|&waiter| self.pending.contains_key(waiter))
            .cloned()
            .collect();
        for waiter in &waiters {
            self.waits.entry(waiter.clone()).or_default().push(key.clone());
        }
        Ok(waiters)
    }

    /// Removes what [`BindingRegistry::join_build`] recorded once the build
    /// of `key` is no longer awaited.
    pub fn leave_build(&mut self, waiters: &[BindingKey], key: &BindingKey) {
        for waiter in waiters {
            if let Some(joined) = self.waits.get_mut(waiter) {
                if let Some(index) = joined.iter().position(|k| k == key) {
                    joined.swap_remove(index);
                }
                if joined.is_empty() {
                    self.waits.remove(waiter);
                }
            }
        }
    }

    fn waiting_chain(
        &self,
        from: &BindingKey,
        targets: &[BindingKey],
    ) -> Option<Vec<BindingKey>> {
        let mut seen = Vec::new();
        let mut stack = vec![vec![from.clone()]];
        while let Some(chain) = stack.pop() {
            let last = match chain.last() {
                Some(last) => last,
                None => continue,
            };
            if chain.len() > 1 && targets.contains(last) {
                return Some(chain);
            }
            if seen.contains(last) {
                continue;
            }
            seen.push(last.clone());

            for next in self.waits.get(last).into_iter().flatten() {
                let mut longer = chain.clone();
                longer.push(next.clone());
                stack.push(longer);
            }
        }
        None
    }
}
