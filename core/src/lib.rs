//! Client core for the customer record service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and maps the results onto a
//! page of input fields and output regions.
//!
//! # Design
//! - `CustomerClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Pages are described by `Layout`s of declarative `Binding`s; one
//!   `Dispatcher` interprets any layout against any `Page`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod binding;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod page;
pub mod types;

pub use binding::{Binding, Inputs, Layout, Operation, Output};
pub use client::CustomerClient;
pub use config::ClientConfig;
pub use dispatcher::{Applied, Dispatcher, Pending, Transport};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use page::{Content, CustomerTable, MemoryPage, Page};
pub use types::{Customer, CustomerId, CustomerInput, DeleteAck, ErrorBody, SearchQuery};
