// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between consumers and services
// - Commands return DTOs
// - Commands handle error conversion
// - Commands NEVER contain business logic

pub mod catalog_commands;
pub mod page_commands;

pub use catalog_commands::*;
pub use page_commands::*;
