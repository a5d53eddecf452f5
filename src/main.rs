fn main() {
    if let Err(err) = cropset::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
