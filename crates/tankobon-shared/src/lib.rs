//! Code shared between the server and its integration tests

#![warn(unused_crate_dependencies)]

pub mod catalog;
pub mod const_config;
pub mod errors;
pub mod id;
pub mod req_args;
pub mod session;
pub mod telemetry;
pub mod uac;

pub use errors::{e400, e404, e500};
