use std::fmt;
use std::io::Read;

use crate::error::Result;

/// An open response whose body has not been read yet.
pub struct HttpResponse {
    /// Value of the Content-Length header, if present.
    pub content_length: Option<u64>,

    /// The response body, read incrementally.
    pub body: Box<dyn Read + Send>,
}

impl HttpResponse {
    pub fn new(content_length: Option<u64>, body: impl Read + Send + 'static) -> Self {
        Self {
            content_length,
            body: Box::new(body),
        }
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Blocking HTTP client abstraction.
///
/// This trait provides the minimal interface needed for fetching operations.
/// Implementations handle their own redirect following, timeout configuration,
/// and error mapping.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - In-memory implementations for testing
pub trait HttpClient {
    /// Send a GET request and return the response with its body unread.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (DNS failure, connection error,
    /// HTTP error status, etc.).
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    fn get(&self, url: &str) -> Result<HttpResponse> { (**self).get(url) }
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use reqwest::blocking::Client;
    use reqwest::{Proxy, Url};

    use super::*;
    use crate::error::FetchError;

    /// Settings for the underlying `reqwest` client.
    #[derive(Debug, Clone, Default)]
    pub struct ClientSetting {
        pub proxies:    Option<Vec<Url>>,
        pub timeout:    Option<Duration>,
        pub user_agent: Option<String>,
    }

    impl ClientSetting {
        pub fn build(self) -> Result<Client> {
            let mut cb = Client::builder().user_agent(
                self.user_agent
                    .unwrap_or_else(|| concat!("sluice/", env!("CARGO_PKG_VERSION")).to_string()),
            );

            if let Some(timeout) = self.timeout {
                cb = cb.timeout(timeout);
            }

            if let Some(proxies) = self.proxies {
                let (secure, insecure): (Vec<Url>, Vec<Url>) =
                    proxies.into_iter().partition(|u| u.scheme() == "https");

                for u in secure {
                    cb = cb.proxy(Proxy::https(u)?);
                }

                for u in insecure {
                    cb = cb.proxy(Proxy::http(u)?);
                }
            }

            Ok(cb.build()?)
        }
    }

    /// Production HTTP client implementation using blocking reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: Client,
    }

    impl ReqwestClient {
        /// Create a new ReqwestClient with default configuration.
        pub fn new() -> Result<Self> { Self::with_setting(ClientSetting::default()) }

        pub fn with_setting(setting: ClientSetting) -> Result<Self> {
            Ok(Self {
                client: setting.build()?,
            })
        }
    }

    impl HttpClient for ReqwestClient {
        fn get(&self, url: &str) -> Result<HttpResponse> {
            let response = self
                .client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .map_err(FetchError::Http)?;

            Ok(HttpResponse::new(response.content_length(), response))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest::Url;
#[cfg(feature = "reqwest")]
pub use reqwest_impl::{ClientSetting, ReqwestClient};
