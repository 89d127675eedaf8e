// src/exit.rs
//! Standardized process exit codes for `collabnet`.
//!
//! Provides a stable contract for scripts and automation.

use std::process::Termination;

use crate::error::CollabError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CollabExit {
    /// Operation completed successfully.
    Success = 0,
    /// Generic error (e.g. IO, store, config).
    Error = 1,
    /// Input validation failed (malformed dataset or configuration).
    InvalidInput = 2,
    /// The store is empty or a required linkage is missing.
    MissingData = 3,
    /// The regression could not be fitted.
    FitFailed = 4,
}

impl CollabExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl Termination for CollabExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl From<&CollabError> for CollabExit {
    fn from(err: &CollabError) -> Self {
        match err {
            CollabError::MissingData(_) => Self::MissingData,
            CollabError::StatisticalFit { .. } => Self::FitFailed,
            CollabError::Config(_) | CollabError::Dataset(_) => Self::InvalidInput,
            CollabError::Store(_) | CollabError::Io { .. } => Self::Error,
        }
    }
}

impl From<&anyhow::Error> for CollabExit {
    fn from(err: &anyhow::Error) -> Self {
        err.downcast_ref::<CollabError>().map_or(Self::Error, Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_map_to_codes() {
        let cases = [
            (CollabError::MissingData("x".into()), 3),
            (CollabError::fit("singular", "check variance"), 4),
            (CollabError::Config("bad".into()), 2),
            (CollabError::Dataset("bad".into()), 2),
        ];
        for (err, code) in cases {
            assert_eq!(CollabExit::from(&err).code(), code, "{err}");
        }
    }

    #[test]
    fn test_anyhow_error_conversion() {
        use anyhow::Context;

        let wrapped: anyhow::Result<()> =
            Err(CollabError::MissingData("empty".into())).context("loading snapshot");
        let err = wrapped.expect_err("error");
        assert_eq!(CollabExit::from(&err), CollabExit::MissingData);
        assert_eq!(CollabExit::from(&anyhow::anyhow!("plain")), CollabExit::Error);
    }
}
