//! specrun CLI entry point

fn main() {
    // Initialize structured logging with env-based filter, defaulting to info
    specrun::cli::init_tracing("info");

    specrun::cli::run();
}
