mod arguments;
mod info;
mod provider;

pub use arguments::*;
pub use info::*;
pub use provider::*;
