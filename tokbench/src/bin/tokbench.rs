fn main() {
    if let Err(e) = tokbench::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
