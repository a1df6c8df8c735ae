use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid amount for {field}: {reason}")]
    InvalidAmount {
        field: &'static str,
        reason: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
