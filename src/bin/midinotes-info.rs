use midinotes::cmdline::{init_logging, InfoCli};
use std::io;
use structopt::StructOpt;

fn main() {
    init_logging();
    let args = InfoCli::from_args();
    if let Err(err) = args.run(&mut io::stdout().lock()) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
