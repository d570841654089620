//! Application layer for the Political Domain context.

pub mod command_handlers;
