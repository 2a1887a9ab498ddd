//! Commands accepted by the Creation Service.

pub mod commands;
