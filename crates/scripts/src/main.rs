//! Signs mint parameters for the minting contracts.

use mintsig_scripts::cli::Cli;

fn main() {
    let _guards = match mintsig_tracing::init_logging() {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = Cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
