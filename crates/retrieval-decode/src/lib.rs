//! retrieval-decode
//!
//! Pure decoders over an already fetched engine response: wire field names,
//! value coercion, facet sections and the document list.
#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod coerce;
pub mod facets;
pub mod field_name;
pub mod results;

pub use coerce::coerce;
pub use facets::{decode_facets, DecodedFacets, FacetField, FacetRow};
pub use field_name::{FieldCodec, FieldName};
pub use results::decode_results;
