//! retrieval-core
//!
//! Types shared by the decoder and the result-set crates: references, typed
//! facet values, the query descriptor, the raw wire shape of an engine
//! response, settings and the collaborator traits.
#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod query;
pub mod raw;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
