//! Command implementations.

pub mod check;
pub mod evaluate;
pub mod extract;

pub use self::check::execute_check;
pub use self::evaluate::execute_evaluate;
pub use self::extract::execute_extract;
