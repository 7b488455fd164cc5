mod class;
mod factory;
mod service;

pub use class::*;
pub use factory::*;
pub use service::*;
