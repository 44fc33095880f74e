use std::env;
use std::io;
use std::process;

use agenda::{cli, menu, EventManager};

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "agenda=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

fn main() {
    setup_logging();
    let args = cli::parse(env::args().skip(1).collect());

    let mut manager = EventManager::new();
    if let Err(err) = manager.load_from_file(&args.data_file) {
        eprintln!("{err}");
        process::exit(1);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(err) = menu::run(&mut manager, stdin.lock(), stdout.lock()) {
        eprintln!("{err}");
        process::exit(1);
    }

    if let Err(err) = manager.save_to_file(&args.data_file) {
        eprintln!("{err}");
        process::exit(1);
    }
}
