use clap::Parser;

mod cli;
mod commands;

fn main() -> anyhow::Result<()> {
    stockledger_observability::init();
    let cli = cli::Cli::parse();
    let mut stdout = std::io::stdout().lock();
    commands::run_command(cli, &mut stdout)
}
