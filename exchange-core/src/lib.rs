//! # Exchange Core Library
//!
//! Plumbing shared by every component of the stock exchange.
//!
//! ## Modules
//! - `bus`: In-process publish/subscribe topics and request/reply services.
//! - `discovery`: Registry of published capabilities.
//! - `microservice`: Publication lifecycle and teardown of one component.
//! - `config`: JSON configuration files.
//! - `args`: Command-line arguments shared by the binaries.

pub mod args;
pub mod bus;
pub mod config;
pub mod discovery;
pub mod microservice;
pub mod sync;

pub use bus::{Bus, BusError};
pub use discovery::{DiscoveryError, Record, RecordKind, Registry, RegistryHandle};
pub use microservice::Microservice;
