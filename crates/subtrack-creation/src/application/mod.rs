//! Application services for the Creation Service.

pub mod command_handlers;
pub mod query_handlers;
pub mod startup;
