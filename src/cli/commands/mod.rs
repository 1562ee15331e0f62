pub mod check;
mod command_result;
mod context;
pub mod init;
pub mod refs;

pub use command_result::*;
pub use context::ScanContext;
