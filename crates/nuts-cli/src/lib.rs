//! Library side of the `nuts-pop` command.

pub mod logging;
pub mod pipeline;
pub mod types;
