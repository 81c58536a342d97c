//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`] or [`health`].

pub mod health;
pub mod run;

use crate::cli::{Cli, Commands};
use crate::error::CustomerServiceError;

pub async fn dispatch(cli: Cli) -> Result<(), CustomerServiceError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  customer-service v{version}\n\n  \
         No command provided. To get started:\n\n    \
         customer-service run                    Start the service on :8080\n    \
         customer-service health                 Check a running instance\n    \
         customer-service --help                 See all commands and options\n"
    );
}
