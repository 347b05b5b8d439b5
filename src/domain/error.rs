use thiserror::Error;

/// Request values rejected before any store is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown order field `{0}`")]
    UnknownOrderField(String),
    #[error("order sort must be ASC or DESC, got `{0}`")]
    UnknownOrderSort(String),
    #[error("{field} must not be empty")]
    Blank { field: &'static str },
}
