use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("Invalid {arg}: {value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error(transparent)]
    Library(#[from] refpipe::Error),
}
