//! council CLI binary
//!
//! Minimal entrypoint: all logic lives in the library; main only maps the
//! run outcome to a process exit code.

fn main() {
    if let Err(code) = council::cli::run() {
        std::process::exit(code.as_i32());
    }
}
