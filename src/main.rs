fn main() {
    if let Err(err) = optiroute_chat::cli::main() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
