use midinotes::cmdline::{init_logging, RunCli};
use std::io;
use structopt::StructOpt;

fn main() {
    init_logging();
    let args = RunCli::from_args();
    if let Err(err) = args.run(&mut io::stdout().lock()) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
