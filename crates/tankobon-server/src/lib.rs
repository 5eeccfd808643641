#![warn(unused_crate_dependencies)]

pub mod authentication;
pub mod authorization;
pub mod configuration;
pub mod db_utils;
pub mod identity;
pub mod routes;
pub mod session_state;
pub mod startup;
pub mod uploads;

pub use configuration::{get_configuration, Configuration, DatabaseSettings};
pub use startup::{get_db_connection_pool, initialize_tracing, Application};
