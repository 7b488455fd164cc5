mod builder;
mod reflect;
mod table;

pub use builder::*;
pub use reflect::{ParameterType, ParameterTypes, Signature};
pub use table::*;
