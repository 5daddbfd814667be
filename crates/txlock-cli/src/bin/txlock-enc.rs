fn main() {
    txlock_cli::init_logging();
    let code = txlock_cli::enc::run(std::env::args_os().skip(1), |name| {
        std::env::var(name).ok()
    });
    std::process::exit(code);
}
