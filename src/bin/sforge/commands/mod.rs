mod batch;
mod single;

use batch::run_batch_command;
use single::run_single;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Single(args) => run_single(args, ctx),
        Command::Batch(args) => run_batch_command(args, ctx),
    }
}
