fn main() {
    if let Err(error) = questline_cli::run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
