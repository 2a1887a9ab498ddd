//! Subtrack Core: shared domain types and seams.
//!
//! This crate defines the subscription entity, the creation event that
//! travels over the event channel, and the traits every service and
//! transport depends on. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod frequency;
pub mod publisher;
pub mod repository;
pub mod request;
pub mod resolver;
pub mod subscription;
pub mod totals;
pub mod validation;
