use thiserror::Error;

/// Errors surfaced by the harvester and the field interpreter
#[derive(Debug, Error)]
pub enum HarvestError {
    /// A required API key was not present in the environment
    #[error("{0} not found in environment variables")]
    MissingApiKey(&'static str),

    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The search provider reported an error in its response body
    #[error("search provider error: {0}")]
    Provider(String),

    /// The rendered results page is a bot-check interstitial
    #[error("CAPTCHA detected while loading {0}")]
    Captcha(String),

    /// WebDriver session or navigation failure
    #[error("WebDriver error: {0}")]
    WebDriver(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The chat model call failed or returned nothing usable
    #[error("model error: {0}")]
    Model(String),
}

pub type Result<T> = std::result::Result<T, HarvestError>;

impl HarvestError {
    /// Network and decode failures are skipped page by page; everything else ends the loop
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            HarvestError::Http(_)
                | HarvestError::Status { .. }
                | HarvestError::WebDriver(_)
                | HarvestError::Json(_)
        )
    }
}
