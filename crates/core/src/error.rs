use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenealogyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid genotype: {}", .0.join("; "))]
    InvalidGenotype(Vec<String>),

    #[error("Dog store failed while loading '{id}': {message}")]
    Store { id: String, message: String },

    #[error("Data error: {0}")]
    Data(String),

    #[error("Engine configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenealogyError {
    /// Whether this error came from the external dog store rather than from
    /// the caller's input.
    pub fn is_upstream(&self) -> bool {
        matches!(self, GenealogyError::Store { .. })
    }
}

pub type Result<T> = std::result::Result<T, GenealogyError>;
