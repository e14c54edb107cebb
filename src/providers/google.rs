use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use url::Url;

use super::SearchProvider;
use crate::config::SearchParams;
use crate::error::{HarvestError, Result};
use crate::parsers::serp;
use crate::results::SearchPage;

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

const FALLBACK_WEBDRIVER_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444",
];

const CHROME_ARGS: [&str; 5] = [
    "--headless=new",
    "--no-sandbox",
    "--disable-blink-features=AutomationControlled",
    "--disable-dev-shm-usage",
    "--disable-gpu",
];

/// Google domain suffix for a `gl` country code
pub fn tld_for_country(gl: Option<&str>) -> &'static str {
    match gl.map(|g| g.to_ascii_lowercase()).as_deref() {
        Some("dk") => "dk",
        Some("uk") | Some("gb") => "co.uk",
        Some("de") => "de",
        Some("se") => "se",
        Some("no") => "no",
        _ => "com",
    }
}

/// Renders Google result pages in a WebDriver-controlled browser
pub struct GoogleBrowser {
    webdriver_url: String,
    /// Google domain suffix, e.g. `dk` for google.dk
    tld: String,
    /// Where to save a screenshot when a CAPTCHA shows up
    screenshot_dir: Option<PathBuf>,
    /// Wait after navigation and after scrolling
    settle: Duration,
    client: Mutex<Option<Client>>,
}

impl GoogleBrowser {
    pub fn new(webdriver_url: impl Into<String>, tld: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            tld: tld.into(),
            screenshot_dir: None,
            settle: Duration::from_secs(3),
            client: Mutex::new(None),
        }
    }

    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = Some(dir.into());
        self
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Results URL for one page of a query
    pub fn results_url(&self, params: &SearchParams, start: u32) -> Result<Url> {
        let base = format!("https://www.google.{}/search", self.tld);
        let mut pairs = vec![
            ("q".to_string(), params.q.clone()),
            ("num".to_string(), params.num.to_string()),
        ];
        if let Some(hl) = &params.hl {
            pairs.push(("hl".to_string(), hl.clone()));
        }
        if let Some(gl) = &params.gl {
            pairs.push(("gl".to_string(), gl.clone()));
        }
        if let Some(tbs) = &params.tbs {
            pairs.push(("tbs".to_string(), tbs.clone()));
        }
        if start > 0 {
            pairs.push(("start".to_string(), start.to_string()));
        }
        Ok(Url::parse_with_params(&base, &pairs)?)
    }

    /// End the WebDriver session if one was opened
    pub async fn close(&self) {
        if let Some(client) = self.client.lock().await.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver client: {}", e);
            }
        }
    }

    async fn client(&self) -> Result<Client> {
        let mut slot = self.client.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = connect_to_webdriver(&self.webdriver_url).await?;
        *slot = Some(client.clone());
        Ok(client)
    }

    async fn render(&self, client: &Client, url: &Url) -> Result<String> {
        client.goto(url.as_str()).await.map_err(navigation_error)?;
        tokio::time::sleep(self.settle).await;

        client
            .execute("window.scrollTo(0, document.body.scrollHeight);", vec![])
            .await
            .map_err(navigation_error)?;
        tokio::time::sleep(self.settle).await;

        let body_text = match client.find(Locator::Css("body")).await {
            Ok(body) => body.text().await.unwrap_or_default(),
            Err(_) => String::new(),
        };
        if serp::is_captcha_page(&body_text) {
            self.save_captcha_screenshot(client).await;
            return Err(HarvestError::Captcha(url.to_string()));
        }

        client.source().await.map_err(navigation_error)
    }

    async fn save_captcha_screenshot(&self, client: &Client) {
        let Some(dir) = &self.screenshot_dir else {
            return;
        };
        let name = format!("captcha_{}.png", chrono::Local::now().format("%Y%m%d_%H%M%S"));
        let path = dir.join(name);
        match client.screenshot().await {
            Ok(png) => match tokio::fs::write(&path, png).await {
                Ok(()) => ::log::warn!("CAPTCHA screenshot saved to {}", path.display()),
                Err(e) => ::log::error!("Failed to write {}: {}", path.display(), e),
            },
            Err(e) => ::log::error!("Failed to take CAPTCHA screenshot: {}", e),
        }
    }
}

#[async_trait]
impl SearchProvider for GoogleBrowser {
    async fn search(&self, params: &SearchParams, start: u32) -> Result<SearchPage> {
        let url = self.results_url(params, start)?;
        ::log::info!("Rendering {}", url);

        let client = self.client().await?;
        let html = timeout(Duration::from_secs(60), self.render(&client, &url))
            .await
            .map_err(|_| HarvestError::WebDriver(format!("timeout rendering {url}")))??;

        Ok(SearchPage::new(serp::parse_google_html(&html)))
    }

    fn name(&self) -> &str {
        "google-browser"
    }
}

fn chrome_capabilities() -> serde_json::Map<String, serde_json::Value> {
    let mut caps = serde_json::Map::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        serde_json::json!({ "args": CHROME_ARGS }),
    );
    caps
}

/// Connects to the WebDriver instance, trying common local ports on failure
async fn connect_to_webdriver(webdriver_url: &str) -> Result<Client> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(chrome_capabilities());

    match builder.connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue;
        }
        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = builder.connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    Err(HarvestError::WebDriver(format!(
        "no WebDriver reachable at {webdriver_url}; start one or set WEBDRIVER_URL"
    )))
}

fn navigation_error(error: fantoccini::error::CmdError) -> HarvestError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session");
    }
    HarvestError::WebDriver(error.to_string())
}
