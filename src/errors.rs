use thiserror::Error;

/// Main error type for the companion's core
#[derive(Debug, Error)]
pub enum CompanionError {
    /// Upstream retrieval failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// A team edit violated the roster bounds
    #[error("Team error: {0}")]
    Team(#[from] TeamError),
    /// Search parameters could not be read back from a query string
    #[error("Query string error: {0}")]
    QueryString(#[from] QueryStringError),
}

/// Errors raised while retrieving data from the upstream database
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The upstream answered with a non-success status
    #[error("{resource} returned status {status}")]
    Status { status: u16, resource: String },
    /// The response body did not match the expected shape
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    /// A cache key held a different kind of payload than requested
    #[error("cache entry '{key}' holds an unexpected payload")]
    UnexpectedPayload { key: String },
    /// A resource reference could not be resolved to an id
    #[error("invalid resource reference: {0}")]
    InvalidReference(String),
}

/// Errors related to loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Errors related to editing a team
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamError {
    /// Team already holds the maximum number of members
    #[error("team is full ({max} members)")]
    TeamFull { max: usize },
    /// Member index is out of bounds
    #[error("no team member at slot {0}")]
    NoSuchMember(usize),
}

/// Errors related to reading search parameters back from a URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryStringError {
    #[error("parameter '{name}' is not a number: '{value}'")]
    NotANumber { name: String, value: String },
    #[error("unknown stat in parameter '{0}'")]
    UnknownStat(String),
}

/// Type alias for Results using CompanionError
pub type CompanionResult<T> = Result<T, CompanionError>;

/// Type alias for Results using FetchError
pub type FetchResult<T> = Result<T, FetchError>;
