//! Library side of the `mhrisk` binary: logging setup and run orchestration.

pub mod logging;
pub mod run;
