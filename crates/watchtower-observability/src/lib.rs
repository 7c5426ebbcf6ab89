mod oracle;
mod task;

pub use oracle::*;
pub use task::*;
