// Services module
pub mod config_service;
pub mod engine;
pub mod key_service;
pub mod launcher;
pub mod log_service;
pub mod secret_store;
pub mod session_controller;
pub mod session_registry;
