use thiserror::Error;

pub type SlackResult<T> = Result<T, SlackError>;

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("slack api {operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("slack api {operation} failed with status {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("slack api {operation} failed: {code}")]
    Rejected { operation: &'static str, code: String },

    #[error("failed to decode slack {operation}: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl SlackError {
    pub fn rejected(operation: &'static str, code: impl Into<String>) -> Self {
        SlackError::Rejected {
            operation,
            code: code.into(),
        }
    }
}
