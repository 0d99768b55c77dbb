//! Inbound adapters: the event payload guard and the command-line interface.

pub mod cli;
pub mod payload;
