mod client;
mod error;
mod model;
mod parse;
mod source;

pub use client::HttpSource;
pub use error::SourceError;
pub use model::{Contract, Service};
pub use source::{FileSource, ServiceSource};
