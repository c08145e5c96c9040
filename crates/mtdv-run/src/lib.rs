mod cli;
mod source;

pub use cli::Cli;
