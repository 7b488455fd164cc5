//! # Getting started
//!
//! Let's start with a small application that looks up users in a database
//! and greets them:
//!
//! ```
//! struct Database;
//!
//! impl Database {
//!     fn find_user(&self, id: u32) -> Option<String> {
//!         (id == 1).then(|| String::from("ada"))
//!     }
//! }
//!
//! struct UserService {
//!     database: Database,
//! }
//!
//! impl UserService {
//!     fn greet(&self, id: u32) -> String {
//!         match self.database.find_user(id) {
//!             Some(name) => format!("Hello, {}!", name),
//!             None => String::from("Who are you?"),
//!         }
//!     }
//! }
//!
//! let users = UserService { database: Database };
//! assert_eq!("Hello, ada!", users.greet(1));
//! ```
//!
//! This works, but `main` now has to know how to build every service and
//! every service it depends on. Once there are dozens of services, and some
//! of them should only exist once, wiring them by hand gets tedious. Let's
//! hand that job to a [`Container`](crate::Container).
//!
//! ## Classes
//!
//! A type the container can construct is a [`Class`](crate::Class). The
//! class receives its dependencies as [`Arguments`](crate::Arguments) and
//! builds itself from them. Which dependencies it receives is declared on
//! the container:
//!
//! ```
//! use runtime_container::{Arguments, Class, Container, InjectResult, Svc};
//! use futures::executor::block_on;
//!
//! struct Database;
//!
//! impl Class for Database {
//!     fn construct(_args: Arguments) -> InjectResult<Self> {
//!         Ok(Database)
//!     }
//! }
//!
//! struct UserService {
//!     database: Svc<Database>,
//! }
//!
//! impl UserService {
//!     fn new(database: Svc<Database>) -> Self {
//!         UserService { database }
//!     }
//! }
//!
//! impl Class for UserService {
//!     const ARITY: usize = 1;
//!
//!     fn construct(args: Arguments) -> InjectResult<Self> {
//!         Ok(UserService::new(args.get(0)?))
//!     }
//! }
//!
//! let container = Container::new();
//!
//! // The constructor's parameter types are the dependencies
//! container.inject::<UserService>().reflect_fn(UserService::new);
//!
//! let users: Svc<UserService> =
//!     block_on(container.make_class::<UserService>()).unwrap();
//! ```
//!
//! ## Bindings
//!
//! Not everything is a class. Configuration values, connection pools and
//! other values can be bound under a string or a [`Symbol`](crate::Symbol).
//! A binding is an async factory. Singleton bindings are built once, no
//! matter how many callers ask for them at the same time:
//!
//! ```
//! use runtime_container::{service, Container, Resolver, RuntimeValues, Svc};
//! use futures::executor::block_on;
//!
//! struct Pool {
//!     url: String,
//! }
//!
//! let container = Container::new();
//! container.bind_value("database.url", service(String::from("sqlite::memory:"))).unwrap();
//! container
//!     .singleton("database.pool", |resolver: Resolver, _: RuntimeValues| async move {
//!         let url: Svc<String> = resolver.make_as("database.url").await?;
//!         Ok(service(Pool { url: url.to_string() }))
//!     })
//!     .unwrap();
//! container.alias("db", "database.pool").unwrap();
//!
//! let pool: Svc<Pool> = block_on(container.make_as("db")).unwrap();
//! let again: Svc<Pool> = block_on(container.make_as("database.pool")).unwrap();
//! assert!(Svc::ptr_eq(&pool, &again));
//! assert_eq!("sqlite::memory:", pool.url);
//! ```
//!
//! ## Testing with swaps
//!
//! In tests, a class can be swapped for a double without touching the code
//! that depends on it. Restoring the class brings the real one back:
//!
//! ```
//! use runtime_container::{
//!     service, Arguments, BindingKey, Class, ClassKey, Container,
//!     InjectResult, Resolver, RuntimeValues,
//! };
//! use futures::executor::block_on;
//!
//! struct Mailer;
//! impl Class for Mailer {
//!     fn construct(_args: Arguments) -> InjectResult<Self> {
//!         Ok(Mailer)
//!     }
//! }
//!
//! struct FakeMailer;
//!
//! let container = Container::new();
//! container
//!     .swap(ClassKey::of::<Mailer>(), |_: Resolver, _: RuntimeValues| async {
//!         Ok(service(FakeMailer))
//!     })
//!     .unwrap();
//!
//! let mailer = block_on(container.make(BindingKey::class::<Mailer>())).unwrap();
//! assert!(mailer.is::<FakeMailer>());
//!
//! container.restore(ClassKey::of::<Mailer>());
//! let mailer = block_on(container.make(BindingKey::class::<Mailer>())).unwrap();
//! assert!(mailer.is::<Mailer>());
//! ```
//!
//! ## Scoping values to a request
//!
//! A [`Resolver`](crate::Resolver) shares everything registered on the
//! container, but values bound on it stay local. Create one per request,
//! bind the request's data to it, and resolve the request's services
//! through it. Nothing leaks into the container or into other requests.
