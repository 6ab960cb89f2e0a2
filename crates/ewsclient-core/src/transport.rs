//! HTTP transport seam.
//!
//! The session only needs "POST this body, give me status, headers and
//! bytes back". Tests plug in a scripted transport; production uses
//! [`HttpTransport`], a blocking `reqwest` client that never follows
//! redirects.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use url::Url;

use crate::error::Result;

/// Outgoing POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Target.
    pub url: Url,
    /// Headers in send order.
    pub headers: Vec<(String, String)>,
    /// Request document.
    pub body: String,
}

impl HttpRequest {
    /// Looks a header up, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name).next()
    }
}

/// Received response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Reason phrase.
    pub reason: String,
    /// Headers in received order; repeated headers appear repeatedly.
    pub headers: Vec<(String, String)>,
    /// Raw body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// First value of a header, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name).next()
    }

    /// Every value of a header, ignoring case.
    pub fn header_values<'a, 'b>(
        &'a self,
        name: &'b str,
    ) -> impl Iterator<Item = &'a str> + use<'a, 'b> {
        find_header(&self.headers, name)
    }

    /// True for 3xx statuses.
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        self.status >= 300 && self.status < 400
    }
}

fn find_header<'a, 'b>(
    headers: &'a [(String, String)],
    name: &'b str,
) -> impl Iterator<Item = &'a str> + use<'a, 'b> {
    headers
        .iter()
        .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Sends a POST and returns the response without following redirects.
pub trait Transport {
    /// Sends the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be delivered or the response
    /// cannot be read.
    fn post(&mut self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post(&mut self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).post(request)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn post(&mut self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).post(request)
    }
}

/// Blocking `reqwest` transport with redirects disabled.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates the transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().redirect(Policy::none());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    fn post(&mut self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.post(request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body.clone()).send()?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 302,
            headers: vec![
                ("Set-Cookie".into(), "a=1".into()),
                ("location".into(), "https://x/".into()),
                ("set-cookie".into(), "b=2".into()),
            ],
            ..HttpResponse::default()
        };
        assert_eq!(response.header("Location"), Some("https://x/"));
        assert_eq!(response.header_values("SET-COOKIE").collect::<Vec<_>>(), ["a=1", "b=2"]);
        assert!(response.is_redirect());
    }

    #[test]
    fn test_header_values_outlive_the_name() {
        let request = HttpRequest {
            url: Url::parse("https://mail.example.com/EWS/Exchange.asmx").unwrap(),
            headers: vec![("Cookie".into(), "a=1".into()), ("cookie".into(), "b=2".into())],
            body: String::new(),
        };
        let (first, all) = {
            let name = String::from("COOKIE");
            (request.header(&name), find_header(&request.headers, &name).collect::<Vec<_>>())
        };
        assert_eq!(first, Some("a=1"));
        assert_eq!(all, ["a=1", "b=2"]);
    }

    #[test]
    fn test_is_redirect_bounds() {
        let status = |status| HttpResponse {
            status,
            ..HttpResponse::default()
        };
        assert!(!status(200).is_redirect());
        assert!(status(301).is_redirect());
        assert!(!status(400).is_redirect());
    }
}
