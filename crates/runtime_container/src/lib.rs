//! # Runtime dependency injection container.
//!
//! A [`Container`] maps binding keys to values. A key is a string, a
//! [`Symbol`], or a class: a type implementing [`Class`] that the container
//! can construct by resolving its declared dependencies. Every resolution is
//! asynchronous, since factories may need to do I/O to build their values.
//!
//! ## Getting started
//!
//! Check out the [getting started guide][getting-started].
//!
//! [getting-started]: crate::docs::getting_started
//!
//! ## Registrations
//!
//! - **[Bindings](Container::bind):** an async factory invoked each time the
//!   key is resolved.
//! - **[Singletons](Container::singleton):** an async factory invoked only
//!   the first time the key is resolved. Concurrent callers share a single
//!   build, and a failed build is not cached.
//! - **[Values](Container::bind_value):** a value stored directly. Values are
//!   never passed through hooks.
//! - **[Aliases](Container::alias):** another name for a key.
//! - **[Contextual bindings](Container::when):** a factory used for a class
//!   only while it is injected into a specific parent class.
//! - **[Swaps](Container::swap):** a replacement for a class, usually a test
//!   double.
//!
//! ## Declaring dependencies
//!
//! Classes don't carry their dependency lists. Instead, they are declared on
//! the container with [`Container::inject`], either as explicit binding keys
//! or reflected from parameter types or a function signature. A class can
//! take over its own dependency resolution with
//! [`Class::provide_dependencies`].
//!
//! ## Example
//!
//! ```
//! use runtime_container::{
//!     define_module, service, Arguments, Class, Container, DynSvc,
//!     InjectResult, MethodCall, Resolver, RuntimeValues, Svc,
//! };
//! use futures::{executor::block_on, FutureExt};
//!
//! struct Config {
//!     greeting: String,
//! }
//!
//! struct Greeter {
//!     config: Svc<Config>,
//! }
//!
//! impl Class for Greeter {
//!     const ARITY: usize = 1;
//!     const METHODS: &'static [&'static str] = &["greet"];
//!
//!     fn construct(args: Arguments) -> InjectResult<Self> {
//!         Ok(Greeter {
//!             config: args.get(0)?,
//!         })
//!     }
//!
//!     fn call_method(
//!         self: Svc<Self>,
//!         method: &str,
//!         args: Arguments,
//!     ) -> Option<MethodCall> {
//!         match method {
//!             "greet" => Some(async move { self.greet(args) }.boxed()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl Greeter {
//!     fn greet(&self, args: Arguments) -> InjectResult<DynSvc> {
//!         let name: Svc<String> = args.get(0)?;
//!         Ok(service(format!("{}, {}!", self.config.greeting, name)))
//!     }
//! }
//!
//! let module = define_module! {
//!     singletons = {
//!         "config" => |_: Resolver, _: RuntimeValues| async {
//!             Ok(service(Config {
//!                 greeting: String::from("Hello"),
//!             }))
//!         },
//!     },
//! };
//!
//! let mut builder = Container::builder();
//! builder.add_module(module);
//! let container = builder.build().unwrap();
//!
//! container.inject::<Greeter>().constructor(["config"]).unwrap();
//!
//! let greeter: Svc<Greeter> = block_on(container.make_class()).unwrap();
//! let greeting = block_on(container.call(
//!     &greeter,
//!     "greet",
//!     RuntimeValues::new().with(String::from("ada")),
//! ))
//! .unwrap();
//!
//! assert_eq!(
//!     Some("Hello, ada!"),
//!     greeting.downcast_ref::<String>().map(String::as_str)
//! );
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![warn(missing_docs)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::doc_markdown,
    clippy::needless_doctest_main
)]

mod builder;
mod container;
mod events;
mod injections;
mod keys;
mod loader;
mod module;
mod registry;
mod requests;
mod resolver;
mod services;

pub use builder::*;
pub use container::*;
pub use events::*;
pub use injections::*;
pub use keys::*;
pub use loader::*;
pub use module::*;
pub(crate) use registry::*;
pub use requests::*;
pub use resolver::*;
pub use services::*;

pub mod docs;

#[cfg(test)]
mod tests;
