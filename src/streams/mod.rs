//! Stream catalog
//!
//! Declarative definitions of the Sprout Social streams. Everything that
//! differs between streams (request shape, pagination, post-processing,
//! parent link, schema) lives on the [`StreamDefinition`], so the engine
//! never branches on a stream's name.

mod catalog;
mod definition;

pub use catalog::{catalog, Catalog};
pub use definition::{ParentLink, StreamDefinition};

#[cfg(test)]
mod tests;
