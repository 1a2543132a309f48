pub mod args;
pub mod commands;

pub use args::{Cli, Commands, InputFormatArg};
pub use commands::{init_logging, run};
