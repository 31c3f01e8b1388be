//! # HTTP public-IP resolver
//!
//! [`IpResolver`] implementation that asks an external echo service
//! (icanhazip.com, api.ipify.org, ifconfig.me and friends) for the
//! caller's public address. Success is an HTTP 200 whose trimmed body is
//! an IP literal; anything else is a lookup failure that ends the run.
//!
//! The request carries a bounded timeout so a hung lookup service cannot
//! stall a reconciliation indefinitely.

use std::net::IpAddr;
use std::time::Duration;

use ddrift_core::traits::IpResolver;
use ddrift_core::{Error, Result};

/// Timeout for the lookup request
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public-IP resolver
#[derive(Debug, Clone)]
pub struct HttpIpResolver {
    /// URL returning the caller's public IP as a plain-text body
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver for the given lookup endpoint
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(Error::config("IP lookup URL cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { url, client })
    }
}

#[async_trait::async_trait]
impl IpResolver for HttpIpResolver {
    async fn current_public_ip(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::lookup(format!("request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::lookup(format!(
                "lookup service returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::lookup(format!("failed to read response: {}", e)))?;

        // Echo services commonly append a trailing newline.
        let ip_text = body.trim();

        let ip: IpAddr = ip_text
            .parse()
            .map_err(|_| Error::lookup(format!("response is not an IP address: {:?}", ip_text)))?;

        tracing::debug!("public IP from {}: {}", self.url, ip);
        Ok(ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn parses_trimmed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("203.0.113.7\n"))
            .mount(&server)
            .await;

        let resolver = HttpIpResolver::new(server.uri()).unwrap();
        let ip = resolver.current_public_ip().await.unwrap();
        assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[tokio::test]
    async fn parses_ipv6_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("2001:db8::1\n"))
            .mount(&server)
            .await;

        let resolver = HttpIpResolver::new(server.uri()).unwrap();
        let ip = resolver.current_public_ip().await.unwrap();
        assert!(ip.is_ipv6());
    }

    #[tokio::test]
    async fn non_success_status_is_a_lookup_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let resolver = HttpIpResolver::new(server.uri()).unwrap();
        let err = resolver.current_public_ip().await.unwrap_err();
        assert!(matches!(err, Error::Lookup(_)));
    }

    #[tokio::test]
    async fn garbage_body_is_a_lookup_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let resolver = HttpIpResolver::new(server.uri()).unwrap();
        let err = resolver.current_public_ip().await.unwrap_err();
        assert!(matches!(err, Error::Lookup(_)));
    }

    #[test]
    fn empty_url_is_rejected() {
        assert!(HttpIpResolver::new("").is_err());
    }
}
