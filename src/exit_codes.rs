//! Process exit codes
//!
//! Stable contract for scripts wrapping the CLI: deliberation failures are
//! distinguishable from configuration mistakes and from interruption.

use council_core::DeliberationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Run completed and output was written
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// Deliberation failed (no responses, synthesis failed)
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Configuration or usage error
    pub const CONFIG: ExitCode = ExitCode(2);
    /// Internal error (runtime construction, observer failure)
    pub const INTERNAL: ExitCode = ExitCode(70);
    /// Interrupted by the user (SIGINT convention: 128 + 2)
    pub const INTERRUPTED: ExitCode = ExitCode(130);

    #[must_use]
    pub fn as_i32(self) -> i32 {
        self.0
    }

    #[must_use]
    pub fn from_deliberation_error(error: &DeliberationError) -> ExitCode {
        match error {
            DeliberationError::NoResponses { .. } | DeliberationError::SynthesisFailed { .. } => {
                ExitCode::FAILURE
            }
            DeliberationError::Cancelled => ExitCode::INTERRUPTED,
            DeliberationError::Observer { .. } => ExitCode::INTERNAL,
        }
    }
}
