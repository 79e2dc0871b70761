pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use qrxfer_core::error::Result;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Receive {
            inputs,
            out,
            password,
            no_prompt,
        } => handlers::handle_receive(inputs, out, password, no_prompt),
        Commands::Inspect { inputs } => handlers::handle_inspect(inputs),
        Commands::Make {
            input,
            out,
            block_size,
            password,
            level,
        } => handlers::handle_make(input, out, block_size, password, level),
    }
}
