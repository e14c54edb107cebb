use std::path::{Path, PathBuf};

use crate::config::HarvestConfig;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::profiles::Profile;
use crate::providers::google::{self, GoogleBrowser};
use crate::providers::{HttpFetcher, SerpApi};
use crate::results::RunReport;

/// Where search results come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// SerpAPI's Google engine, keyed by `SERPAPI_API_KEY`
    SerpApi,
    /// Google rendered through a WebDriver server
    Browser { webdriver_url: String },
}

/// Builder struct for configuring and running one harvest
pub struct Harvest {
    config: HarvestConfig,
    backend: Backend,
}

impl Harvest {
    /// Start from a built-in profile
    pub fn new(profile: Profile) -> Self {
        Self::from_config(profile.config())
    }

    pub fn from_config(config: HarvestConfig) -> Self {
        Self {
            config,
            backend: Backend::SerpApi,
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: HarvestConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.config = HarvestConfig::from_file(path)?;
        Ok(self)
    }

    /// Apply configuration from a JSON string
    pub fn with_config_str(mut self, json: &str) -> Result<Self> {
        self.config = HarvestConfig::from_json(json)?;
        Ok(self)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Override the offset cap
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.config.pagination.max_results = max_results;
        self
    }

    /// Override the number of listings written
    pub fn with_max_output(mut self, max_output: usize) -> Self {
        self.config.max_output = Some(max_output);
        self
    }

    /// Render Google in a browser instead of calling SerpAPI
    pub fn with_browser(mut self, webdriver_url: impl Into<String>) -> Self {
        self.backend = Backend::Browser {
            webdriver_url: webdriver_url.into(),
        };
        self
    }

    /// Skip re-fetching posting pages
    pub fn without_liveness(mut self) -> Self {
        self.config.liveness = None;
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Run the harvest and write the output file
    pub async fn run(self) -> Result<RunReport> {
        let Harvest { config, backend } = self;

        match backend {
            Backend::SerpApi => {
                // The key is read before anything touches the network or the disk
                let provider = SerpApi::from_env(config.serpapi_endpoint.clone())?;
                let (pipeline, fetcher) = prepare(config)?;
                pipeline.run(&provider, &fetcher).await
            }
            Backend::Browser { webdriver_url } => {
                let (pipeline, fetcher) = prepare(config)?;
                let tld = google::tld_for_country(pipeline.config().search.gl.as_deref());
                let browser = GoogleBrowser::new(webdriver_url, tld)
                    .with_screenshot_dir(pipeline.config().output_dir.clone());
                let result = pipeline.run(&browser, &fetcher).await;
                browser.close().await;
                result
            }
        }
    }
}

fn prepare(config: HarvestConfig) -> Result<(Pipeline, HttpFetcher)> {
    let fetcher = match &config.liveness {
        Some(liveness) => liveness.fetcher()?,
        None => HttpFetcher::with_defaults()?,
    };
    Ok((Pipeline::new(config)?, fetcher))
}
