//! Utility library for injecting dependencies into actix-web applications.
//!
//! Register a [`Container`] as app data, then take [`Injected`] classes or
//! the request's [`Scoped`] resolver as handler parameters. Every request
//! gets its own [`Resolver`], with the request's [`RequestContext`] bound to
//! it, so values bound while handling one request never leak into another.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::needless_pass_by_value
)]

pub use runtime_container::*;

mod context;
mod service;

pub use context::*;
pub use service::*;
