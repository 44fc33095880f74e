use std::env;
use std::path::PathBuf;
use std::process;

use getopts::Options;

pub const DEFAULT_DATA_FILE: &str = "events.json";

pub struct Args {
    pub data_file: PathBuf,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "f",
        "file",
        "JSON file events are loaded from on startup and saved to on exit [Default: events.json]",
        "PATH",
    );
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    let data_file = matches
        .opt_str("file")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

    Args { data_file }
}
