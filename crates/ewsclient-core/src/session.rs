//! EWS session: connects to an endpoint, submits requests and tracks the
//! item they operate on.

use ewsclient_schema::{SchemaName, validate};
use ewsclient_soap::{
    Diagnostics, ItemId, ResponseSummary, SoapRequest, Stage, parse_response, send_item_request,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::SessionConfig;
use crate::cookies::CookieJar;
use crate::error::{Error, Result};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Transport};

/// Outcome of one submitted request.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Stage the response was parsed for.
    pub stage: Stage,
    /// HTTP status code.
    pub status: u16,
    /// HTTP reason phrase.
    pub reason: String,
    /// Values captured from the response.
    pub summary: ResponseSummary,
    /// Diagnostics recorded while submitting.
    pub diagnostics: Diagnostics,
}

/// A session against one EWS endpoint.
pub struct Session<T: Transport = HttpTransport> {
    pub(crate) config: SessionConfig,
    pub(crate) transport: T,
    pub(crate) server: Option<Url>,
    pub(crate) cookies: CookieJar,
    item: Option<ItemId>,
    attachment_ids: Vec<String>,
    log: Diagnostics,
}

impl Session<HttpTransport> {
    /// Creates a session using the blocking `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn open(config: SessionConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> Session<T> {
    /// Creates a session over the given transport.
    #[must_use]
    pub fn new(config: SessionConfig, transport: T) -> Self {
        let server = config.server().cloned();
        Self {
            config,
            transport,
            server,
            cookies: CookieJar::new(),
            item: None,
            attachment_ids: Vec::new(),
            log: Diagnostics::new("session"),
        }
    }

    /// Resolves the endpoint, running autodiscovery when none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if autodiscovery fails.
    pub fn connect(&mut self) -> Result<Diagnostics> {
        let mut log = Diagnostics::new("session");
        let result = self.resolve_endpoint(&mut log);
        self.log.extend(log.clone());
        result.map(|()| log)
    }

    /// Submits a request and parses the response for `stage`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingItemId`] before any I/O when the stage needs
    /// a captured item, [`Error::NotConnected`] without an endpoint, or an
    /// error if the exchange fails, the response is too short, not text, or
    /// not valid against the messages schema.
    pub fn submit(&mut self, request: &SoapRequest, stage: Stage) -> Result<Submission> {
        if matches!(stage, Stage::Attachment | Stage::SendAndSave) && self.item.is_none() {
            return Err(Error::MissingItemId(stage));
        }
        let server = self.server.clone().ok_or(Error::NotConnected)?;

        let mut log = Diagnostics::new("session");
        let result = self.exchange(&server, request, stage, &mut log);
        self.log.extend(log.clone());
        let (response, summary) = result?;

        Ok(Submission {
            stage,
            status: response.status,
            reason: response.reason,
            summary,
            diagnostics: log,
        })
    }

    /// Sends the captured item and saves a copy in Sent Items.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingItemId`] when no draft was saved, or any error
    /// of [`Session::submit`].
    pub fn send_and_save(&mut self) -> Result<Submission> {
        let item = self
            .item
            .clone()
            .ok_or(Error::MissingItemId(Stage::SendAndSave))?;
        let finalized = send_item_request(&item)?;
        self.log.extend(finalized.diagnostics);
        self.submit(&finalized.request, Stage::SendAndSave)
    }

    fn resolve_endpoint(&mut self, log: &mut Diagnostics) -> Result<()> {
        if let Some(server) = &self.server {
            log.info(format!("using EWS endpoint {server}"));
            return Ok(());
        }
        let endpoint = self.autodiscover(log)?;
        log.info(format!("discovered EWS endpoint {endpoint}"));
        self.server = Some(endpoint);
        Ok(())
    }

    fn exchange(
        &mut self,
        server: &Url,
        request: &SoapRequest,
        stage: Stage,
        log: &mut Diagnostics,
    ) -> Result<(HttpResponse, ResponseSummary)> {
        let http = HttpRequest {
            url: server.clone(),
            headers: self.headers(true),
            body: request.xml().to_string(),
        };
        debug!(url = %server, kind = %request.kind(), stage = %stage, "submitting request");

        let response = self.post(&http, log)?;
        let body = self.read_body(&response, server)?;
        log.debug(&body);

        let validation = validate(&body, Some(SchemaName::Messages));
        log.record_validation(&validation);
        if !validation.valid {
            return Err(Error::InvalidDocument {
                context: "response",
                diagnostics: validation.diagnostics,
            });
        }

        let summary = parse_response(&body, stage, log)?;
        self.update(stage, &summary);
        Ok((response, summary))
    }

    fn update(&mut self, stage: Stage, summary: &ResponseSummary) {
        match stage {
            Stage::Draft => {
                if let Some(item) = &summary.item {
                    info!(item = %item, "captured draft item");
                    self.item = Some(item.clone());
                }
            }
            Stage::Attachment => {
                self.attachment_ids
                    .extend(summary.attachment_ids.iter().cloned());
                if let Some(root) = &summary.root_item {
                    info!(item = %root, "refreshed item change key");
                    self.item = Some(root.clone());
                }
            }
            Stage::SendAndSave => {}
        }
    }

    /// Fixed headers plus cookies; Basic auth only when `authorize` is set.
    pub(crate) fn headers(&self, authorize: bool) -> Vec<(String, String)> {
        let mut headers = vec![
            ("User-Agent".to_string(), self.config.user_agent().to_string()),
            ("X-MapiHttpCapability".to_string(), "1".to_string()),
        ];
        if authorize {
            headers.push(("Authorization".to_string(), self.config.basic_auth()));
        }
        headers.push((
            "Content-Type".to_string(),
            "text/xml; charset=utf-8".to_string(),
        ));
        if let Some(cookies) = self.cookies.header_value() {
            headers.push(("Cookie".to_string(), cookies));
        }
        headers
    }

    /// Posts and merges any cookies the response sets.
    pub(crate) fn post(&mut self, request: &HttpRequest, log: &mut Diagnostics) -> Result<HttpResponse> {
        let response = self.transport.post(request)?;
        log.info(format!(
            "POST {} -> {} {}",
            request.url, response.status, response.reason
        ));
        for rejected in self.cookies.merge(&response) {
            warn!(value = %rejected, "ignoring malformed Set-Cookie header");
            log.warn(format!("ignoring malformed Set-Cookie header: {rejected}"));
        }
        Ok(response)
    }

    /// Enforces the minimum length and returns the body as text.
    pub(crate) fn read_body(&self, response: &HttpResponse, url: &Url) -> Result<String> {
        let minimum = self.config.min_response_length();
        if response.body.len() < minimum {
            return Err(Error::ResponseTooShort {
                url: url.to_string(),
                length: response.body.len(),
                minimum,
            });
        }

        let textual = response.header("content-type").is_none_or(|content_type| {
            let content_type = content_type.to_ascii_lowercase();
            content_type.starts_with("text/") || content_type.contains("xml")
        });
        if !textual {
            return Err(Error::NonTextResponse {
                url: url.to_string(),
            });
        }

        String::from_utf8(response.body.clone()).map_err(|_| Error::NonTextResponse {
            url: url.to_string(),
        })
    }

    /// Current item identity.
    #[must_use]
    pub const fn item(&self) -> Option<&ItemId> {
        self.item.as_ref()
    }

    /// Resolved endpoint.
    #[must_use]
    pub const fn server(&self) -> Option<&Url> {
        self.server.as_ref()
    }

    /// Cookie store.
    #[must_use]
    pub const fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Ids of every attachment created in this session.
    #[must_use]
    pub fn attachment_ids(&self) -> &[String] {
        &self.attachment_ids
    }

    /// Everything recorded by this session so far.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.log
    }

    /// Empties the session log.
    pub fn clear_diagnostics(&mut self) {
        self.log.clear();
    }

    /// Underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl<T: Transport> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("server", &self.server.as_ref().map(Url::as_str))
            .field("item", &self.item)
            .field("cookies", &self.cookies.len())
            .finish_non_exhaustive()
    }
}
