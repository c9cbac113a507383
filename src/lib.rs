//! Simulation Matcher
//!
//! The matching core of an HTTP traffic simulator: given a request and a
//! simulation of request templates, decide which template describes the
//! request and return its canned response.
//!
//! # Features
//!
//! - **Field Matching**: Glob patterns (`*`) on method, destination, scheme, path, query
//! - **Header Sets**: Declared header values must equal the request's, in any order
//! - **Structural Bodies**: JSON bodies compared as trees, with `*` leaves
//! - **First Match Wins**: Templates are tried in declaration order
//! - **Snapshots**: Simulations are swapped atomically under concurrent lookups
//! - **Views**: Templates projected for inspection and export
//!
//! # Example Configuration
//!
//! ```yaml
//! templates:
//!   - request:
//!       method: POST
//!       destination: "*.example.com"
//!       path: /api/*
//!       body: '{"user": *}'
//!     response:
//!       status: 201
//!       body: created
//!   - response:
//!       status: 404
//!       body: not found
//! ```

pub mod body;
pub mod config;
pub mod error;
pub mod glob;
pub mod matcher;
pub mod models;
pub mod store;
pub mod view;

pub use config::{MatcherSettings, SimulationConfig};
pub use error::MatchError;
pub use models::{
    RequestDetails, RequestTemplate, RequestTemplateResponsePair, ResponseDetails, Simulation,
};
pub use store::{PassThrough, RequestTemplateStore, SimulationHandle, StatefulSelection};
pub use view::RequestResponsePairView;
