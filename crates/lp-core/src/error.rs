use thiserror::Error;

pub type LpResult<T> = Result<T, LpError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LpError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Could not coerce {input:?} to {what}")]
    Coercion { what: &'static str, input: String },
}
