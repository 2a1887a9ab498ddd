//! Commands accepted by the Read/Query Service.

pub mod commands;
