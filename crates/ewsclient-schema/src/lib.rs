//! # ewsclient-schema
//!
//! Structural validation of Exchange Web Services documents against a set of
//! bundled schemas.
//!
//! ## Features
//!
//! - **Namespace-aware tree**: documents are read into an [`Element`] tree with
//!   resolved namespaces, so prefixes never matter
//! - **Bundled schemas**: SOAP messages (`CreateItem`, `CreateAttachment`,
//!   `SendItem` and their responses), the autodiscover request and the
//!   autodiscover response
//! - **Never fails**: every parse error, structural violation or failed
//!   assertion becomes a [`Diagnostic`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use ewsclient_schema::{validate, SchemaName};
//!
//! let validation = validate(response_body, Some(SchemaName::Messages));
//! if !validation.valid {
//!     for diagnostic in &validation.diagnostics {
//!         eprintln!("{}: {}", diagnostic.severity, diagnostic.message);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod assertions;
mod error;
pub mod namespace;
pub mod rules;
mod schemas;
pub mod tree;
mod validator;

pub use error::{Error, Result};
pub use tree::{Attribute, Element};
pub use validator::{Diagnostic, SchemaName, Severity, Validation, validate};
