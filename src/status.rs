// src/status.rs
// =============================================================================
// The aggregate success/failure signal of a run.
//
// It starts as Success and can only ever be downgraded to Failure. The value
// is threaded explicitly through argument resolution and scanning and read
// once in main() to pick the process exit code.
// =============================================================================

use serde::Serialize;

/// Exit code used when any argument, directory or file failed
pub const FAILURE_EXIT_CODE: i32 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    #[default]
    Success,
    Failure,
}

impl ExitStatus {
    /// Records a failure. There is no way back to Success.
    pub fn downgrade(&mut self) {
        *self = ExitStatus::Failure;
    }

    pub fn is_failure(self) -> bool {
        self == ExitStatus::Failure
    }

    pub fn exit_code(self) -> i32 {
        if self.is_failure() {
            FAILURE_EXIT_CODE
        } else {
            0
        }
    }
}
