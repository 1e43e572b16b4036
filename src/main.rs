mod app;
mod discover;
mod introspect;

use app::Cli;
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = app::run_app(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
