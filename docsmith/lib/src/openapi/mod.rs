//! OpenAPI spec transformations.
//!
//! - [`splice`] clones the generic inference endpoint job resource into a
//!   named endpoint, in place or as a standalone spec.
//! - [`header`] adds a required header parameter to every operation.
//! - [`security`] copies the shared security scheme into another spec.

pub mod header;
pub mod names;
pub mod refs;
pub mod security;
pub mod splice;

use strum::{AsRefStr, Display, EnumIter};

/// HTTP methods that may key an operation inside an OpenAPI path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}
