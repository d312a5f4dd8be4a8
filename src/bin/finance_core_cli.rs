use std::process;

use clap::Parser;

use finance_core::{
    cli::{self, output, Cli},
    init,
};

fn main() {
    init();

    if let Err(err) = cli::run(Cli::parse()) {
        output::error(format!("Error: {err}"));
        process::exit(1);
    }
}
