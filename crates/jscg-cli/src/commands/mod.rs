//! CLI command implementations

pub mod build;
pub mod init;

pub use build::BuildArgs;
pub use init::InitArgs;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the call graph of JavaScript/TypeScript files
    Build(BuildArgs),

    /// Initialize jscg configuration in a directory
    Init(InitArgs),
}
