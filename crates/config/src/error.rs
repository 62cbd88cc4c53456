use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value was read but is not usable.
    #[display("invalid configuration: {_0}")]
    Invalid(#[error(not(source))] String),
    /// The configuration sources could not be read or merged.
    #[display("could not load configuration")]
    Load,
}

impl ErrorKind {
    pub fn is_retryable(&self) -> bool {
        false
    }
}
