#![allow(clippy::blacklisted_name)]

use crate::{
    service, Arguments, BindingKey, Class, ClassKey, Container, DynSvc,
    InjectError, InjectResult, MethodCall, Object, ResolveEvent, Resolver,
    RuntimeValues, Svc, Symbol,
};
use futures::{
    future::{ready, Ready},
    FutureExt,
};
use std::{
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::{sync::Barrier, time::timeout};

struct Route;

struct Database;

impl Class for Database {
    fn construct(_args: Arguments) -> InjectResult<Self> {
        Ok(Database)
    }
}

struct UserService;

impl Class for UserService {
    const METHODS: &'static [&'static str] = &["foo"];

    fn construct(_args: Arguments) -> InjectResult<Self> {
        Ok(UserService)
    }

    fn call_method(
        self: Svc<Self>,
        method: &str,
        args: Arguments,
    ) -> Option<MethodCall> {
        match method {
            "foo" => Some(foo(args).boxed()),
            _ => None,
        }
    }
}

async fn foo(args: Arguments) -> InjectResult<DynSvc> {
    let database: Svc<Database> = args.get(0)?;
    Ok(database)
}

struct FakeUserService;

struct Engine(&'static str);

impl Class for Engine {
    fn construct(_args: Arguments) -> InjectResult<Self> {
        Ok(Engine("constructed"))
    }
}

struct Car(Svc<Engine>);

impl Class for Car {
    const ARITY: usize = 1;

    fn construct(args: Arguments) -> InjectResult<Self> {
        Ok(Car(args.get(0)?))
    }
}

struct Left(&'static str);

impl Class for Left {
    fn construct(_args: Arguments) -> InjectResult<Self> {
        Ok(Left("made"))
    }
}

struct Right;

impl Class for Right {
    fn construct(_args: Arguments) -> InjectResult<Self> {
        Ok(Right)
    }
}

struct Pair(Svc<Left>, Svc<Right>);

impl Class for Pair {
    const ARITY: usize = 2;

    fn construct(args: Arguments) -> InjectResult<Self> {
        Ok(Pair(args.get(0)?, args.get(1)?))
    }
}

struct Chicken;

impl Class for Chicken {
    const ARITY: usize = 1;

    fn construct(_args: Arguments) -> InjectResult<Self> {
        Ok(Chicken)
    }
}

struct Egg;

impl Class for Egg {
    const ARITY: usize = 1;

    fn construct(_args: Arguments) -> InjectResult<Self> {
        Ok(Egg)
    }
}

fn engine(
    name: &'static str,
) -> impl Fn(Resolver, RuntimeValues) -> Ready<InjectResult<DynSvc>>
       + Send
       + Sync
       + 'static {
    move |_, _| ready(Ok(service(Engine(name))))
}

fn refused() -> InjectError {
    InjectError::activation(io::Error::new(
        io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

/// Transient bindings create a new value each time.
#[tokio::test]
async fn bound_route_is_created_each_time() {
    let container = Container::new();
    container
        .bind("route", |_: Resolver, _: RuntimeValues| async {
            Ok(service(Route))
        })
        .unwrap();

    let first = container.make_as::<Route>("route").await.unwrap();
    let second = container.make_as::<Route>("route").await.unwrap();
    assert!(!Svc::ptr_eq(&first, &second));
}

/// Singleton bindings create their value once.
#[tokio::test]
async fn singleton_route_is_reused() {
    let container = Container::new();
    container
        .singleton("route", |_: Resolver, _: RuntimeValues| async {
            Ok(service(Route))
        })
        .unwrap();

    let first = container.make_as::<Route>("route").await.unwrap();
    let second = container.make_as::<Route>("route").await.unwrap();
    assert!(Svc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn call_injects_method_dependencies() {
    let container = Container::new();
    container
        .inject::<UserService>()
        .method("foo", [ClassKey::of::<Database>()])
        .unwrap();

    let users = container.make_class::<UserService>().await.unwrap();
    let first = container
        .call(&users, "foo", RuntimeValues::new())
        .await
        .unwrap();
    let second = container
        .call(&users, "foo", RuntimeValues::new())
        .await
        .unwrap();

    let first = first.downcast_arc::<Database>().ok().unwrap();
    let second = second.downcast_arc::<Database>().ok().unwrap();
    assert!(!Svc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn call_reports_missing_method() {
    let container = Container::new();
    let users = container.make_class::<UserService>().await.unwrap();

    match container.call(&users, "bar", RuntimeValues::new()).await {
        Err(InjectError::MethodNotFound { class, method }) => {
            assert_eq!(ClassKey::of::<UserService>(), class);
            assert_eq!("bar", method);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("method should not exist"),
    }
}

#[tokio::test]
async fn swapped_class_is_restored() {
    let container = Container::new();
    container
        .swap(
            ClassKey::of::<UserService>(),
            |_: Resolver, _: RuntimeValues| async {
                Ok(service(FakeUserService))
            },
        )
        .unwrap();
    assert!(container.has_swap(ClassKey::of::<UserService>()));

    let users = container
        .make(BindingKey::class::<UserService>())
        .await
        .unwrap();
    assert!(users.is::<FakeUserService>());

    assert!(container.restore(ClassKey::of::<UserService>()));
    let users = container
        .make(BindingKey::class::<UserService>())
        .await
        .unwrap();
    assert!(users.is::<UserService>());
}

#[tokio::test]
async fn restore_all_removes_every_swap() {
    let container = Container::new();
    container.swap(ClassKey::of::<Engine>(), engine("swap")).unwrap();
    container
        .swap(ClassKey::of::<Left>(), |_: Resolver, _: RuntimeValues| async {
            Ok(service(Left("swap")))
        })
        .unwrap();

    container.restore_many([ClassKey::of::<Engine>()]);
    assert!(!container.has_swap(ClassKey::of::<Engine>()));
    assert!(container.has_swap(ClassKey::of::<Left>()));

    container.restore_all();
    assert!(!container.has_swap(ClassKey::of::<Left>()));
}

#[tokio::test]
async fn number_cannot_be_made() {
    let container = Container::new();
    match container.make(42).await {
        Err(InjectError::CannotConstructValue { value }) => {
            assert_eq!("42", value);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("42 is not a binding key"),
    }
}

#[tokio::test]
async fn unknown_name_is_missing() {
    let container = Container::new();
    container
        .bind_value(Symbol::new("route"), service(Route))
        .unwrap();

    match container.make(Symbol::new("route")).await {
        Err(InjectError::MissingBinding { key }) => {
            assert_eq!("Symbol(route)", key.to_string());
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("symbols are unique"),
    }
}

#[tokio::test]
async fn bound_value_is_returned_as_is() {
    let container = Container::new();
    let value = service(Route);
    container.bind_value("route", value.clone()).unwrap();
    container.bind("route", engine("binding")).unwrap();

    let made = container.make("route").await.unwrap();
    assert!(Arc::ptr_eq(&value, &made));
    assert!(made.is::<Route>());
}

#[tokio::test]
async fn alias_resolves_target() {
    let container = Container::new();
    container.alias("a", "b").unwrap();
    container
        .singleton("b", |_: Resolver, _: RuntimeValues| async {
            Ok(service(Route))
        })
        .unwrap();
    assert!(container.has_all_bindings(["a", "b"]));

    let through_alias = container.make_as::<Route>("a").await.unwrap();
    let direct = container.make_as::<Route>("b").await.unwrap();
    assert!(Svc::ptr_eq(&through_alias, &direct));
}

#[test]
fn invalid_aliases_are_rejected() {
    let container = Container::new();

    match container.alias("a", "a") {
        Err(InjectError::SelfAlias { key }) => {
            assert_eq!(BindingKey::from("a"), key);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("an alias can't point at itself"),
    }

    match container.alias(ClassKey::of::<Database>(), "db") {
        Err(InjectError::InvalidAliasKey { .. }) => {}
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("classes can't be aliases"),
    }

    match container.alias(1.5f32, "db") {
        Err(InjectError::InvalidAliasKey { value }) => {
            assert_eq!("1.5", value);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("numbers can't be aliases"),
    }

    assert!(!container.has_binding("a"));
}

#[test]
fn invalid_registrations_are_rejected() {
    let container = Container::new();

    match container.bind_value(false, service(Route)) {
        Err(InjectError::InvalidBindingKey { value }) => {
            assert_eq!("false", value);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("booleans are not binding keys"),
    }

    match container.swap("engine", engine("swap")) {
        Err(InjectError::InvalidBindingKey { value }) => {
            assert_eq!("engine", value);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("only classes can be swapped"),
    }

    match container.contextual_binding(
        ClassKey::of::<Car>(),
        "engine",
        engine("contextual"),
    ) {
        Err(InjectError::InvalidDependency { dependency, .. }) => {
            assert_eq!("engine", dependency);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("contextual dependencies must be classes"),
    }

    match container
        .when(ClassKey::of::<Car>())
        .provide(engine("contextual"))
    {
        Err(InjectError::MissingContextualTarget { parent }) => {
            assert_eq!(ClassKey::of::<Car>(), parent);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("no dependency was named"),
    }
}

#[tokio::test]
async fn overrides_follow_precedence() {
    let container = Container::new();
    container.inject::<Car>().reflect::<(Svc<Engine>,)>();

    let engine_key = ClassKey::of::<Engine>();
    assert_eq!("constructed", engine_of(&container).await);

    container.bind(engine_key, engine("binding")).unwrap();
    assert_eq!("binding", engine_of(&container).await);

    container
        .bind_value(engine_key, service(Engine("value")))
        .unwrap();
    assert_eq!("value", engine_of(&container).await);

    container
        .when(ClassKey::of::<Car>())
        .asks_for(engine_key)
        .provide(engine("contextual"))
        .unwrap();
    assert_eq!("contextual", car_engine_of(&container.create_resolver()).await);
    assert_eq!("value", engine_of(&container).await);

    container.swap(engine_key, engine("swap")).unwrap();
    assert_eq!("swap", car_engine_of(&container.create_resolver()).await);
    assert_eq!("swap", engine_of(&container).await);

    let resolver = container.create_resolver();
    resolver
        .bind_value(engine_key, service(Engine("local")))
        .unwrap();
    assert_eq!("local", car_engine_of(&resolver).await);
    assert_eq!("swap", car_engine_of(&container.create_resolver()).await);

    container.restore(engine_key);
    assert_eq!("contextual", car_engine_of(&container.create_resolver()).await);
}

async fn engine_of(container: &Container) -> &'static str {
    container.make_class::<Engine>().await.unwrap().0
}

async fn car_engine_of(resolver: &Resolver) -> &'static str {
    let car = resolver.make_class::<Car>().await.unwrap();
    car.0 .0
}

#[tokio::test]
async fn resolver_values_stay_local() {
    let container = Container::new();
    let first = container.create_resolver();
    let second = container.create_resolver();
    first.bind_value("user", service(Left("ada"))).unwrap();
    container.alias("current_user", "user").unwrap();

    let user = first.make_as::<Left>("current_user").await.unwrap();
    assert_eq!("ada", user.0);
    assert!(!container.has_binding("user"));

    match second.make("user").await {
        Err(InjectError::MissingBinding { .. }) => {}
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("value was bound on another resolver"),
    }
}

#[tokio::test]
async fn declared_dependencies_are_injected() {
    let container = Container::new();
    container
        .inject::<Pair>()
        .reflect::<(Svc<Left>, Svc<Right>)>();

    let pair = container.make_class::<Pair>().await.unwrap();
    assert_eq!("made", (pair.0).0);

    let runtime = RuntimeValues::new().with(Left("runtime"));
    let pair = container
        .make_with(BindingKey::class::<Pair>(), runtime)
        .await
        .unwrap()
        .downcast_arc::<Pair>()
        .ok()
        .unwrap();
    assert_eq!("runtime", (pair.0).0);
}

/// Both dependencies wait for each other, so the pair can only be made if
/// they are resolved at the same time.
#[tokio::test]
async fn dependencies_are_resolved_concurrently() {
    let barrier = Arc::new(Barrier::new(2));
    let container = Container::new();
    container
        .inject::<Pair>()
        .reflect::<(Svc<Left>, Svc<Right>)>();
    container
        .swap(ClassKey::of::<Left>(), {
            let barrier = barrier.clone();
            move |_: Resolver, _: RuntimeValues| {
                let barrier = barrier.clone();
                async move {
                    barrier.wait().await;
                    Ok(service(Left("left")))
                }
            }
        })
        .unwrap();
    container
        .swap(ClassKey::of::<Right>(), {
            let barrier = barrier.clone();
            move |_: Resolver, _: RuntimeValues| {
                let barrier = barrier.clone();
                async move {
                    barrier.wait().await;
                    Ok(service(Right))
                }
            }
        })
        .unwrap();

    let pair = timeout(Duration::from_secs(5), container.make_class::<Pair>())
        .await
        .expect("dependencies were resolved one at a time")
        .unwrap();
    assert_eq!("left", (pair.0).0);
}

#[tokio::test]
async fn failed_dependency_fails_construction() {
    let container = Container::new();
    container
        .inject::<Pair>()
        .reflect::<(Svc<Left>, Svc<Right>)>();
    container
        .swap(ClassKey::of::<Left>(), |_: Resolver, _: RuntimeValues| {
            futures::future::pending()
        })
        .unwrap();
    container
        .swap(ClassKey::of::<Right>(), |_: Resolver, _: RuntimeValues| {
            ready(Err(refused()))
        })
        .unwrap();

    let result = timeout(Duration::from_secs(5), container.make_class::<Pair>())
        .await
        .expect("construction waited for every dependency");
    match result {
        Err(InjectError::ActivationFailed { source }) => {
            assert_eq!("connection refused", source.to_string());
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("right cannot be made"),
    }
}

#[tokio::test]
async fn undeclared_dependencies_cannot_be_constructed() {
    let container = Container::new();
    match container.make_class::<Pair>().await {
        Err(InjectError::CannotConstructDependencies {
            class,
            required,
            provided,
        }) => {
            assert_eq!(ClassKey::of::<Pair>(), class);
            assert_eq!(2, required);
            assert_eq!(0, provided);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("pair has no declared dependencies"),
    }

    let runtime = RuntimeValues::new().with(Left("runtime")).with(Right);
    let pair = container
        .make_with(BindingKey::class::<Pair>(), runtime)
        .await
        .unwrap();
    assert!(pair.is::<Pair>());
}

#[tokio::test]
async fn skipped_runtime_values_cannot_construct() {
    let container = Container::new();
    let runtime = RuntimeValues::new().skip().skip();
    match container.make_with(BindingKey::class::<Pair>(), runtime).await {
        Err(InjectError::CannotConstructDependencies {
            required,
            provided,
            ..
        }) => {
            assert_eq!(2, required);
            assert_eq!(0, provided);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("skipped slots are empty"),
    }

    let runtime = RuntimeValues::new().with(Left("runtime")).skip();
    match container.make_with(BindingKey::class::<Pair>(), runtime).await {
        Err(InjectError::CannotConstructDependencies { provided, .. }) => {
            assert_eq!(1, provided);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("the right slot is empty"),
    }
}

#[tokio::test]
async fn primitive_dependency_is_rejected() {
    let container = Container::new();
    container.inject::<Car>().reflect::<(String,)>();

    match container.make_class::<Car>().await {
        Err(InjectError::InvalidDependency { dependency, .. }) => {
            assert!(dependency.contains("String"));
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("strings can't be injected"),
    }

    container
        .inject::<Car>()
        .reflect_with::<(), _, &str>([None])
        .unwrap();
    assert_eq!(
        Some(&[BindingKey::class::<Object>()][..]),
        container.injections::<Car>().unwrap().constructor()
    );
    match container.make_class::<Car>().await {
        Err(InjectError::InvalidDependency { .. }) => {}
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("untyped parameters can't be injected"),
    }

    // A runtime value fills the slot instead
    let runtime = RuntimeValues::new().with(Engine("runtime"));
    let car = container
        .make_with(BindingKey::class::<Car>(), runtime)
        .await
        .unwrap()
        .downcast_arc::<Car>()
        .ok()
        .unwrap();
    assert_eq!("runtime", car.0 .0);
}

#[tokio::test]
async fn class_cycle_is_detected() {
    let container = Container::new();
    container.inject::<Chicken>().reflect::<(Svc<Egg>,)>();
    container.inject::<Egg>().reflect::<(Svc<Chicken>,)>();

    match container.make_class::<Chicken>().await {
        Err(InjectError::CycleDetected { key, cycle }) => {
            assert_eq!(BindingKey::class::<Chicken>(), key);
            assert_eq!(
                vec![
                    BindingKey::class::<Chicken>(),
                    BindingKey::class::<Egg>(),
                    BindingKey::class::<Chicken>(),
                ],
                cycle
            );
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("chicken and egg depend on each other"),
    }
}

#[tokio::test]
async fn singleton_cycle_is_detected() {
    let container = Container::new();
    container
        .singleton("a", |resolver: Resolver, _: RuntimeValues| async move {
            resolver.make("b").await
        })
        .unwrap();
    container
        .singleton("b", |resolver: Resolver, _: RuntimeValues| async move {
            resolver.make("a").await
        })
        .unwrap();

    match container.make("a").await {
        Err(InjectError::CycleDetected { key, .. }) => {
            assert_eq!(BindingKey::from("a"), key);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("a and b depend on each other"),
    }

    // Nothing was left behind
    match container.make("b").await {
        Err(InjectError::CycleDetected { key, .. }) => {
            assert_eq!(BindingKey::from("b"), key);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("a and b depend on each other"),
    }
}

#[tokio::test]
async fn concurrent_singleton_cycle_is_detected() {
    let container = Container::new();
    container
        .singleton("a", |resolver: Resolver, _: RuntimeValues| async move {
            tokio::task::yield_now().await;
            resolver.make("b").await
        })
        .unwrap();
    container
        .singleton("b", |resolver: Resolver, _: RuntimeValues| async move {
            tokio::task::yield_now().await;
            resolver.make("a").await
        })
        .unwrap();

    let both = futures::future::join(container.make("a"), container.make("b"));
    let (first, second) = timeout(Duration::from_secs(5), both)
        .await
        .expect("builds of a and b waited on each other");
    for result in [first, second] {
        match result {
            Err(InjectError::CycleDetected { .. }) => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("a and b depend on each other"),
        }
    }

    let again = timeout(Duration::from_secs(5), container.make("a"))
        .await
        .expect("nothing should be left waiting");
    assert!(matches!(again, Err(InjectError::CycleDetected { .. })));
}

#[tokio::test]
async fn concurrent_singleton_is_built_once() {
    let builds = Arc::new(AtomicUsize::new(0));
    let container = Container::new();
    container
        .singleton("route", {
            let builds = builds.clone();
            move |_: Resolver, _: RuntimeValues| {
                builds.fetch_add(1, Ordering::SeqCst);
                async {
                    tokio::task::yield_now().await;
                    Ok(service(Route))
                }
            }
        })
        .unwrap();

    let (first, second) = futures::join!(
        container.make_as::<Route>("route"),
        container.make_as::<Route>("route"),
    );
    assert!(Svc::ptr_eq(&first.unwrap(), &second.unwrap()));
    assert_eq!(1, builds.load(Ordering::SeqCst));
}

#[tokio::test]
async fn failed_singleton_is_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let container = Container::new();
    container
        .singleton("route", {
            let attempts = attempts.clone();
            move |_: Resolver, _: RuntimeValues| {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    tokio::task::yield_now().await;
                    if attempt == 0 {
                        Err(refused())
                    } else {
                        Ok(service(Route))
                    }
                }
            }
        })
        .unwrap();

    let (first, second) =
        futures::join!(container.make("route"), container.make("route"));
    for result in [first, second] {
        match result {
            Err(InjectError::ActivationFailed { .. }) => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("first build should fail"),
        }
    }
    assert_eq!(1, attempts.load(Ordering::SeqCst));

    let first = container.make_as::<Route>("route").await.unwrap();
    let second = container.make_as::<Route>("route").await.unwrap();
    assert!(Svc::ptr_eq(&first, &second));
    assert_eq!(2, attempts.load(Ordering::SeqCst));
}

#[tokio::test]
async fn rebinding_singleton_drops_cached_value() {
    let container = Container::new();
    container.singleton("engine", engine("first")).unwrap();
    let first = container.make_as::<Engine>("engine").await.unwrap();
    assert_eq!("first", first.0);

    container.singleton("engine", engine("second")).unwrap();
    let second = container.make_as::<Engine>("engine").await.unwrap();
    assert_eq!("second", second.0);
}

#[tokio::test]
async fn hooks_run_once_per_construction() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let container = Container::new();
    for name in ["first", "second"] {
        let calls = calls.clone();
        for key in ["transient", "singleton", "value"] {
            let calls = calls.clone();
            container
                .resolving(key, move |_: DynSvc, _: Resolver| {
                    calls.lock().unwrap().push(format!("{} {}", key, name));
                    async { Ok(()) }
                })
                .unwrap();
        }
    }

    container.bind("transient", engine("transient")).unwrap();
    container.singleton("singleton", engine("singleton")).unwrap();
    container
        .bind_value("value", service(Engine("value")))
        .unwrap();

    for key in ["transient", "singleton", "value"] {
        container.make(key).await.unwrap();
        container.make(key).await.unwrap();
    }

    assert_eq!(
        vec![
            "transient first",
            "transient second",
            "transient first",
            "transient second",
            "singleton first",
            "singleton second",
        ],
        *calls.lock().unwrap()
    );
}

#[tokio::test]
async fn failing_hook_fails_resolution() {
    let container = Container::new();
    let builds = Arc::new(AtomicUsize::new(0));
    let hook_calls = Arc::new(AtomicUsize::new(0));
    container
        .singleton("engine", {
            let builds = builds.clone();
            move |_: Resolver, _: RuntimeValues| {
                builds.fetch_add(1, Ordering::SeqCst);
                ready(Ok(service(Engine("engine"))))
            }
        })
        .unwrap();
    container
        .resolving("engine", {
            let hook_calls = hook_calls.clone();
            move |_: DynSvc, _: Resolver| {
                let first = hook_calls.fetch_add(1, Ordering::SeqCst) == 0;
                ready(if first { Err(refused()) } else { Ok(()) })
            }
        })
        .unwrap();

    match container.make("engine").await {
        Err(InjectError::ActivationFailed { source }) => {
            assert_eq!("connection refused", source.to_string());
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("hook should have failed"),
    }

    // The rejected value was not cached
    let first = container.make_as::<Engine>("engine").await.unwrap();
    let second = container.make_as::<Engine>("engine").await.unwrap();
    assert!(Svc::ptr_eq(&first, &second));
    assert_eq!(2, builds.load(Ordering::SeqCst));
    assert_eq!(2, hook_calls.load(Ordering::SeqCst));
}

#[tokio::test]
async fn events_are_emitted_children_first() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut builder = Container::builder();
    builder.emitter({
        let events = events.clone();
        move |event: &str, payload: &ResolveEvent| {
            assert_eq!(crate::RESOLVE_EVENT, event);
            events.lock().unwrap().push(payload.binding.clone());
        }
    });
    builder.bind_value("unused", service(Route));

    let container = builder.build().unwrap();
    container.inject::<Pair>().reflect::<(Svc<Left>, Svc<Right>)>();
    container.bind_value("route", service(Route)).unwrap();

    container.make("route").await.unwrap();
    container.make_class::<Pair>().await.unwrap();

    let events = events.lock().unwrap();
    assert_eq!(3, events.len());
    assert_eq!(BindingKey::class::<Pair>(), events[2]);
    assert!(events[..2].contains(&BindingKey::class::<Left>()));
    assert!(events[..2].contains(&BindingKey::class::<Right>()));
}

#[tokio::test]
async fn factory_sees_resolution_path() {
    let container = Container::new();
    container
        .bind("path", |resolver: Resolver, _: RuntimeValues| async move {
            let path: Vec<String> = resolver
                .request_info()
                .path()
                .iter()
                .map(ToString::to_string)
                .collect();
            Ok(service(path.join(" > ")))
        })
        .unwrap();
    container.alias("breadcrumbs", "path").unwrap();

    let path = container.make_as::<String>("breadcrumbs").await.unwrap();
    assert_eq!("breadcrumbs > path", path.as_str());
}
