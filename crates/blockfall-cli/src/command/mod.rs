use clap::{Parser, Subcommand};

use self::simulate::SimulateArg;

mod seed;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play games headlessly and write a JSON report
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print a fresh random piece seed
    Seed,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Seed => seed::run(),
    }
    Ok(())
}
