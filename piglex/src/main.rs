use std::process::ExitCode;

use piglex_driver::{Argument, Parser};

fn main() -> ExitCode {
    let argument = Argument::parse();
    piglex_driver::run(argument)
}
