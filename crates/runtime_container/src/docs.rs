//! Guides for using the container.

pub mod getting_started;
