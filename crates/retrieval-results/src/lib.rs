//! retrieval-results
//!
//! Assembles decoded responses into [`ResultSet`]s: pagination, batched
//! hydration of references and the session that ties a transport to a loader.
#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod hydrate;
pub mod memory;
pub mod paginate;
pub mod result_set;
pub mod session;

pub use hydrate::{hydrate, HydrationBatcher};
pub use memory::{MemoryLoader, StaticTransport};
pub use paginate::{paginate, Paginated, Results};
pub use result_set::ResultSet;
pub use session::Session;
