//! Shared types for the Vibe app router.
//!
//! Everything in here is a function of the filesystem at call time: the
//! registry is a snapshot, never a cache. The API crate re-scans on every
//! request that needs it.

pub mod context;
pub mod discovery;
pub mod errors;
pub mod html;
pub mod layout;
pub mod mime;
pub mod registry;
pub mod resolver;

pub use context::{client_ip_from, RequestContext};
pub use discovery::discover_apps;
pub use errors::DiscoveryError;
pub use html::{app_url, encode_path_segment, escape_html};
pub use layout::AppLayout;
pub use registry::{AppEntry, AppKind, AppRegistry, NamedPaths};
pub use resolver::{resolve_request, Resolution};
