use actchain_runner::{execute_check, execute_export, execute_groups, init_tracing, Cli, Commands};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let result = match cli.command {
        Commands::Export(command) => execute_export(&command),
        Commands::Groups(command) => execute_groups(&command),
        Commands::Check(command) => execute_check(&command),
    };

    match result {
        Ok(output) => {
            println!("{output}");
        }
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
