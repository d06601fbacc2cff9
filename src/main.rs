use std::process::exit;

fn main() {
    if let Err(err) = git_surf::cli::run() {
        eprintln!("error: {:#}", err);
        exit(3);
    }
}
