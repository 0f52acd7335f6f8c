use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulebindError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Function {function} overwrote argument {position}: {before} became {after}")]
    Overwrite {
        function: String,
        position: usize,
        before: String,
        after: String,
    },
    #[error("Unknown value kind: {0}")]
    UnknownValueKind(String),
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),
    #[error("Unknown built-in: {0}")]
    UnknownBuiltIn(String),
    #[error("Protocol violation: {0}")]
    Protocol(String),
    #[error("Evaluation aborted: {0}")]
    Aborted(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

impl RulebindError {
    // Contract violations that leave the search inconsistent.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Overwrite { .. } | Self::UnknownValueKind(_) | Self::Protocol(_) | Self::Aborted(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RulebindError>;

// Helper conversions
impl From<config::ConfigError> for RulebindError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
