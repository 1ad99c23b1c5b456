use reqwest::blocking::{Client, Response};
use reqwest::redirect;

use crate::config::ScrapeConfig;
use crate::errors::FetchError;

/// Source of remote documents. The pipeline only talks to the network
/// through this trait.
pub trait Fetch {
    fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking reqwest client with a browser user agent.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, reqwest::Error> {
        let redirect_policy = redirect::Policy::custom(|attempt| {
            if attempt.previous().len() > 100 {
                attempt.error("Too many redirects (>100)")
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .redirect(redirect_policy)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| request_error(url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl Fetch for HttpFetcher {
    fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        self.get(url)?
            .text()
            .map_err(|source| request_error(url, source))
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.get(url)?
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|source| request_error(url, source))
    }
}

fn request_error(url: &str, source: reqwest::Error) -> FetchError {
    FetchError::Request {
        url: url.to_string(),
        source,
    }
}
