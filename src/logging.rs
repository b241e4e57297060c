//! Logger setup for the binary. RUST_LOG controls verbosity, info default.

pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
