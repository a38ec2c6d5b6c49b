//! Command dispatch: bridges CLI args -> backend operations -> output formatting.

pub mod bookings;
pub mod config_cmd;
pub mod places;
pub mod util;

use staybook_core::Backend;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a store-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, backend: &Backend, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Places(args) => places::handle(backend, args, global).await,
        Command::Bookings(args) => bookings::handle(backend, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
