mod core;
mod enumerator;
mod model;

pub use self::core::match_tokens;
pub use enumerator::SelectionEnumerator;
