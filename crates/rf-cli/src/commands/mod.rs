//! CLI command implementations

pub(crate) mod common;
pub(crate) mod optimize;
pub(crate) mod passes;
pub(crate) mod plan;
pub(crate) mod run;
