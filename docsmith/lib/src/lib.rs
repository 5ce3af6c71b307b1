//! Maintenance tooling for an API documentation site.
//!
//! ## OpenAPI Specs
//!
//! - [`add_endpoint_to_spec`] - Clone the generic inference endpoint job
//!   resource into a named endpoint, in place
//! - [`create_endpoint_spec`] - The same, written as a standalone spec file
//! - [`add_header_to_file`] - Add a required header to every operation
//! - [`add_security_to_file`] - Copy the shared security scheme into a spec
//!
//! ## Documentation Site
//!
//! - [`move_page`] - Move a page, leaving a redirect and updated navigation
//! - [`resolve_redirect_chains`] / [`dedupe_redirects`] - Redirect cleanup
//! - [`update_links`] - Point links in page bodies past redirected paths
//! - [`prune_navigation`] - Drop empty navigation groups and tabs
//! - [`check_pages`] - Compare navigation references with page files
//!
//! ## Analytics
//!
//! - [`PageViewTracker`] - Page-view tracking for client-side navigation
//! - [`LoaderScript`] - The analytics loader tag
//!
//! Specs and site configs are read as JSON or YAML by file extension (see
//! [`document`]) and rewritten atomically.

pub mod analytics;
pub mod document;
pub mod endpoint;
mod error;
pub mod openapi;
pub mod site;

pub use analytics::{
    HubSpotQueue, LoaderScript, NavigationEvent, NavigationSource, PageViewSink, PageViewTracker,
};
pub use document::{Document, DocumentFormat};
pub use endpoint::{EndpointConfig, EndpointIdentity};
pub use error::{DocumentError, EndpointConfigError, SecurityError, SiteError, SpliceError};
pub use openapi::header::{HeaderParameter, HeaderReport, add_header_to_file};
pub use openapi::security::{add_security_to_file, find_base_spec};
pub use openapi::splice::{SpliceReport, add_endpoint_to_spec, create_endpoint_spec};
pub use site::config::{Redirect, RedirectEntry, SiteConfig};
pub use site::links::{LinkReport, update_links};
pub use site::move_page::{PageMoveReport, move_page};
pub use site::prune_navigation;
pub use site::redirects::{
    ChainReport, DedupeReport, check_redirect_chains, dedupe_redirects, resolve_redirect_chains,
};
pub use site::validate::{PageCheck, check_pages};
