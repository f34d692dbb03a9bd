use midinotes::cmdline::{init_logging, MelodyCli};
use std::io;
use structopt::StructOpt;

fn main() {
    init_logging();
    let args = MelodyCli::from_args();
    if let Err(err) = args.run(&mut io::stdout().lock()) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
