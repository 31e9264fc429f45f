#![deny(missing_docs)]
//! Quire sources: resolve documents from a local directory or a GitHub repository.

/// Source configuration.
pub mod config;
/// Resolved documents.
pub mod document;
/// Source error types.
pub mod error;
/// Dated filename parsing.
pub mod filename;
/// Document identifiers.
pub mod id;
/// Local directory strategy.
pub mod local;
/// GitHub repository strategy.
pub mod remote;
/// The source capability.
pub mod source;
/// Tag index helpers.
pub mod tags;
/// HTTP transport seam.
pub mod transport;

pub use config::{LocalConfig, RemoteConfig, SourceConfig};
pub use document::Document;
pub use error::SourceError;
pub use filename::{DatedFilename, parse_filename};
pub use id::DocumentId;
pub use local::LocalSource;
pub use remote::{CategoryDocuments, RemoteSource};
pub use source::DocumentSource;
pub use tags::{all_tags, documents_with_tag};
pub use transport::{Response, Transport, TransportError, UreqTransport};
