//! Headless data-grid engine for remote paged datasets
//!
//! Binds a REST-style paged backend to table state: query-parameter
//! construction, debounced search, pagination, sorting, row and checkbox
//! selection, and bulk delete. Rendering, dialogs and persistent storage
//! stay outside the crate behind the [`Transport`], [`MessageSink`] and
//! [`store::StateStore`] seams.

pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod model;
pub mod query;
pub mod selection;
pub mod store;

mod grid;

pub use client::RestClient;
pub use client::Transport;
pub use config::GridConfig;
pub use grid::*;
pub use message::MessageSink;
pub use model::GridRow;
pub use model::PagerList;
pub use query::QueryParams;
pub use query::SortDirection;
pub use selection::SelectionModel;
