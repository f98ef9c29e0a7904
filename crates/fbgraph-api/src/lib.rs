// fbgraph-api: Async Rust client for the Facebook Graph and Marketing APIs

pub mod auth;
pub mod classify;
pub mod client;
pub mod decode;
pub mod error;
pub mod fields;
pub mod models;
pub mod paging;
pub mod params;
pub mod transport;

pub use auth::{ApiVersion, AppSecretProof};
pub use classify::{AuthReason, ErrorCategory, FacebookError};
pub use client::{DEFAULT_BASE_URL, GraphClient, GraphConfig};
pub use error::Error;
pub use fields::{ExtraData, FieldMap};
pub use paging::{PagedResult, PagingCursor};
pub use params::{FieldSelector, FormData, ImageSpec, ImageType, Params};
pub use transport::{TlsMode, TransportConfig};
