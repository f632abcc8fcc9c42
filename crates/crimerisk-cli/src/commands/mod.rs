//! Subcommand implementations.

pub(crate) mod form;
pub(crate) mod options;
pub(crate) mod predict;
