pub mod api;
pub mod balance;
pub mod config;
pub mod contracts;
pub mod controller;
pub mod error_message;
pub mod eth;
pub mod flow;
pub mod gateway;
pub mod level;
pub mod misc;
pub mod notifier;
pub mod provider;
pub mod runtime;
pub mod signer;

pub use dashboard_lib_common::error;
pub use dashboard_lib_common::{err_create, err_custom_create, err_from, err_from_msg};
