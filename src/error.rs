use thiserror::Error;

/// Failure of an external tool that appctl launched.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("`{program}` not found on PATH")]
    NotFound { program: String },

    #[error("`{program}` exited with status {code}")]
    Failed { program: String, code: i32 },

    #[error("`{program}` was terminated by a signal")]
    Terminated { program: String },
}

impl ToolError {
    /// Exit code appctl itself should return for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => 127,
            Self::Failed { code, .. } => *code,
            Self::Terminated { .. } => 1,
        }
    }
}

/// Pick the process exit code for an error coming out of a command.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ToolError>())
        .map_or(1, ToolError::exit_code)
}
