use midinotes::cmdline::{init_logging, parse_args};
use std::io;

fn main() {
    init_logging();
    let args = parse_args();
    if let Err(err) = args.run(&mut io::stdout().lock()) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
