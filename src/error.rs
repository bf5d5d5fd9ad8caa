use thiserror::Error;

/// Failure of a single data source. Every variant is recoverable except when
/// it hits the primary daily series.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("anchor pattern not found: {0}")]
    AnchorNotFound(&'static str),

    #[error("unparseable value: {0}")]
    Parse(String),

    #[error("insufficient history: need {need}, have {have}")]
    InsufficientHistory { need: usize, have: usize },

    #[error("empty series: {0}")]
    Empty(String),
}

#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("primary price series {symbol} unavailable: {source}")]
    PrimarySeries {
        symbol: String,
        #[source]
        source: FetchError,
    },
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
