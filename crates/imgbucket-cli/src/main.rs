fn main() {
    if let Err(error) = imgbucket_cli::run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
