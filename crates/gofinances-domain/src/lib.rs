//! gofinances-domain
//!
//! Pure domain models (transaction records, categories, users, ledger documents).
//! No I/O, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod ledger;
pub mod transaction;
pub mod user;

pub use category::*;
pub use common::*;
pub use ledger::*;
pub use transaction::*;
pub use user::*;
