//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod book_handlers;
mod catalog_handlers;
mod description_handlers;

pub use book_handlers::*;
pub use catalog_handlers::*;
pub use description_handlers::*;
