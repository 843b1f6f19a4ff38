//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod book_commands;
mod catalog_commands;
mod description_commands;

pub mod handlers;

pub use book_commands::*;
pub use catalog_commands::*;
pub use description_commands::*;
