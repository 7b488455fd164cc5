mod class;
mod key;
mod symbol;

pub use class::*;
pub use key::*;
pub use symbol::*;
