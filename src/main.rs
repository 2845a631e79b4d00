use clap::Parser;
use tether::cli::commands::Cli;
use tether::cli::handlers;
use tether::config::Config;
use tether::logging;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            logging::init_tui();
            let config = match Config::load() {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("error: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = tether::tui::run(&config, cli.url.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            logging::init_cli();
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
