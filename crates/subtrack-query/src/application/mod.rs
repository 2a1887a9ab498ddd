//! Application services for the Read/Query Service.

pub mod command_handlers;
pub mod query_handlers;
