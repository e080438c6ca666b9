mod core;
mod form;

pub use self::core::*;
pub use form::*;
