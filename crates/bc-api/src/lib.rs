//! # bc-api
//!
//! The basecamp console's view of its backend, plus the two services
//! that orchestrate the pure lifecycle and taxonomy logic over it.
//!
//! Storage stays behind the [`ResourceApi`] and [`CategoryApi`] traits:
//!
//! - [`HttpApi`]: the REST API (`/api/v1`), bearer-token authenticated
//! - [`FileStore`]: one JSON file per record, for offline work and tests
//!
//! On top of either backend:
//!
//! - [`LifecycleService`]: fetch, evaluate, persist only when allowed,
//!   and dispatch one [`bc_content::ContentEvent`] per request
//! - [`CategoryService`]: one snapshot yielding the nested tree, the
//!   selector options, and any parent loops; validated category writes
//!   and deletes
//!
//! [`ConsoleConfig`] resolves which backend to use from the project's
//! `.basecamp/` directory.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod store;

pub use api::{CategoryApi, ListQuery, Page, ResourceApi};
pub use config::{ApiConfig, BackendKind, ConsoleConfig};
pub use error::ApiError;
pub use http::{status_route, HttpApi, StatusRoute};
pub use service::{
    CategoryDelete, CategoryService, CategorySnapshot, CategoryWrite, LifecycleService,
    TransitionOutcome,
};
pub use store::FileStore;
