use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlacementParseError {
    #[error("Missing {0} field")]
    MissingField(&'static str),

    #[error("Can't parse {field} as an integer: {value}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("Empty interval: start {start} is not before end {end}")]
    EmptyInterval { start: i64, end: i64 },

    #[error("{0}")]
    InvalidKind(String),
}
