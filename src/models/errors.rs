use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Record is missing required field [{field}]")]
    MissingField {
        field: &'static str
    }
}

impl RecordError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}
