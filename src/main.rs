mod caffeine;
mod cli;
mod clock;
mod config;
mod duration;
mod error;
mod hooks;
mod screen;
mod timer;

use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
