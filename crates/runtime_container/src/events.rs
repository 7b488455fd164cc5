use crate::{BindingKey, DynSvc};

/// The name of the event emitted each time a binding is freshly constructed.
pub const RESOLVE_EVENT: &str = "container:resolve";

/// The payload of a [`RESOLVE_EVENT`].
#[derive(Clone)]
pub struct ResolveEvent {
    /// The key that was resolved.
    pub binding: BindingKey,
    /// The value it resolved to.
    pub value: DynSvc,
}

/// Receives events from a container. Every closure taking an event name and
/// a [`ResolveEvent`] is an event sink.
///
/// A resolve event is emitted once per construction: values bound directly
/// and cached singletons don't emit anything when they are resolved again.
///
/// ## Example
///
/// ```
/// use runtime_container::{
///     service, Container, ResolveEvent, Resolver, RuntimeValues,
/// };
/// use futures::executor::block_on;
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let mut builder = Container::builder();
/// builder.emitter({
///     let seen = seen.clone();
///     move |event: &str, payload: &ResolveEvent| {
///         seen.lock().unwrap().push(format!("{} {}", event, payload.binding));
///     }
/// });
///
/// let container = builder.build().unwrap();
/// container
///     .singleton("config", |_: Resolver, _: RuntimeValues| async {
///         Ok(service(42u16))
///     })
///     .unwrap();
///
/// block_on(container.make("config")).unwrap();
/// block_on(container.make("config")).unwrap();
/// assert_eq!(vec!["container:resolve config"], *seen.lock().unwrap());
/// ```
pub trait EventSink: Send + Sync + 'static {
    /// Emits an event.
    fn emit(&self, event: &str, payload: &ResolveEvent);
}

impl<F> EventSink for F
where
    F: Fn(&str, &ResolveEvent) + Send + Sync + 'static,
{
    fn emit(&self, event: &str, payload: &ResolveEvent) {
        self(event, payload);
    }
}
