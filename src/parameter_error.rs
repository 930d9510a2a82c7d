//! Error handling for parameter parsing, chain construction and solver selection

use std::io;

/// Unified error to report malformed input, invalid chains and wrong joint vectors.
/// Failure of the numeric solver to converge is not an error, see
/// [SolveResult](crate::solver::SolveResult).
#[derive(Debug)]
pub enum ParameterError {
    IoError(io::Error),
    /// Text that is not a valid number or arithmetic expression.
    ParseError { input: String, reason: String },
    /// Joint sequencing or joint field violation.
    InvalidChain(String),
    /// Joint vector does not match the effective length of the chain.
    InvalidLength { expected: usize, found: usize },
    UnsupportedSolver(String),
    CsvError(String),
}

impl ParameterError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        ParameterError::ParseError {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ParameterError::IoError(ref err) =>
                write!(f, "IO Error: {}", err),
            ParameterError::ParseError { ref input, ref reason } =>
                write!(f, "Parse Error: '{}': {}", input, reason),
            ParameterError::InvalidChain(ref msg) =>
                write!(f, "Invalid Chain: {}", msg),
            ParameterError::InvalidLength { expected, found } =>
                write!(f, "Invalid Length: expected {} joint values, found {}", expected, found),
            ParameterError::UnsupportedSolver(ref token) =>
                write!(f, "Unsupported Solver: '{}' (use IK_LM, IK_GN or IK_NR)", token),
            ParameterError::CsvError(ref msg) =>
                write!(f, "CSV Error: {}", msg),
        }
    }
}

impl std::error::Error for ParameterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParameterError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ParameterError {
    fn from(err: io::Error) -> Self {
        ParameterError::IoError(err)
    }
}

#[cfg(feature = "allow_filesystem")]
impl From<csv::Error> for ParameterError {
    fn from(err: csv::Error) -> Self {
        ParameterError::CsvError(err.to_string())
    }
}
