//! # Stashr Server
//!
//! HTTP/JSON and gRPC front-ends over a shared [`stashr_core::Store`], plus the
//! process wiring that binds them and shuts them down on SIGINT/SIGTERM.
//!
//! Both front-ends are thin translators: every request becomes exactly one
//! store call.

pub mod config;
pub mod error;
pub mod grpc;
pub mod http;
pub mod server;
pub mod validation;

pub use config::Config;
pub use error::{AppError, ServerError};
pub use server::{run, serve, shutdown_signal, Listeners};
