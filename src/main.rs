fn main() {
    std::process::exit(record_store::run());
}
