//! # ewsclient-core
//!
//! Blocking Exchange Web Services session.
//!
//! ## Features
//!
//! - **Autodiscovery**: resolves the EWS endpoint of an Office 365 account
//!   from its address by following the discovery redirect
//! - **Submission**: posts SOAP requests with Basic auth and session cookies
//! - **Response checks**: minimum length, text body and schema validation
//!   before parsing
//! - **State**: tracks the draft item across the save, attach and send
//!   stages
//! - **Transport seam**: [`Transport`] can be replaced, e.g. in tests
//!
//! ## Quick Start
//!
//! ```ignore
//! use ewsclient_core::{Session, SessionConfig};
//! use ewsclient_soap::{EmailDraft, Stage};
//!
//! let config = SessionConfig::builder("alice@example.com", "secret").build()?;
//! let mut session = Session::open(config)?;
//! session.connect()?;
//!
//! let draft = EmailDraft::new()
//!     .with_to(["bob@example.com"])
//!     .with_body("Hello")
//!     .finalize()?;
//! session.submit(&draft.request, Stage::Draft)?;
//! session.send_and_save()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod cookies;
mod discovery;
mod error;
mod session;
mod transport;

pub use config::{
    DEFAULT_DISCOVERY_URL, DEFAULT_MIN_RESPONSE_LENGTH, DEFAULT_USER_AGENT, SessionConfig,
    SessionConfigBuilder,
};
pub use cookies::CookieJar;
pub use error::{Error, Result};
pub use session::{Session, Submission};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
