//! Output surfaces for deliberation results
//!
//! The core hands over an immutable `DeliberationResult`; everything here
//! is presentation. Progress rendering goes to stderr, final results to
//! stdout.

mod console;
mod json;
mod markdown;

pub use console::ConsoleReporter;
pub use json::format_json;
pub use markdown::format_markdown;
