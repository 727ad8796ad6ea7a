use crate::prelude::*;

/// The raw query does not conform to the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte offset in the raw query where parsing gave up.
    pub position: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(position: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            position,
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}: {}", self.position, self.message)
    }
}

/// Failure of the search service backing the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service could not be reached or did not answer in time.
    Unavailable(String),
    /// The service answered with a non-success status code.
    Status(u16, String),
    InvalidResponse(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Unavailable(e) => write!(f, "Unavailable: {e}"),
            ServiceError::Status(code, body) => write!(f, "Status {code}: {body}"),
            ServiceError::InvalidResponse(e) => write!(f, "InvalidResponse: {e}"),
        }
    }
}

impl std::error::Error for ServiceError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    Syntax(SyntaxError),
    /// A field-scoped group has a missing or unbalanced parenthesis.
    MalformedSubquery(String),
    /// A cross-referenced field matched nothing, so the whole query can never match.
    NoResults { field: String },
    /// A named field is neither searchable nor cross-referenced.
    UnknownField(String),
    Service(ServiceError),
}

impl From<SyntaxError> for QueryError {
    fn from(e: SyntaxError) -> Self {
        QueryError::Syntax(e)
    }
}

impl From<ServiceError> for QueryError {
    fn from(e: ServiceError) -> Self {
        QueryError::Service(e)
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Syntax(e) => write!(f, "Invalid search query {e}"),
            QueryError::MalformedSubquery(e) => write!(f, "Malformed subquery: {e}"),
            QueryError::NoResults { field } => write!(f, "No results for cross-referenced field \"{field}\""),
            QueryError::UnknownField(field) => write!(f, "Invalid search field: \"{field}\""),
            QueryError::Service(e) => write!(f, "Search service error: {e}"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Service(e) => Some(e),
            _ => None,
        }
    }
}
