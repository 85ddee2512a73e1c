//! Core Kernel - Foundational types and utilities for the loan origination system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Strongly-typed identifiers for domain entities
//! - Common error types
//! - Port infrastructure for the hexagonal architecture

pub mod identifiers;
pub mod error;
pub mod ports;

pub use identifiers::{ApplicationId, UserId};
pub use error::CoreError;
pub use ports::{DomainPort, PortError};
