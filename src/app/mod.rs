// src/app/mod.rs
//
// Application bootstrap: configuration and wiring

pub mod catalog_init;
pub mod config;

pub use catalog_init::{app_state_for, connect_backend, init_app_state, open_sqlite_backend};
pub use config::{AppConfig, BackendConfig};
