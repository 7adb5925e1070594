//! CLI command implementations

pub(crate) mod apply;
pub(crate) mod common;
pub(crate) mod init;
pub(crate) mod sql;
pub(crate) mod status;
pub(crate) mod up;
