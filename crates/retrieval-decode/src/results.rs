use retrieval_core::error::{Error, Result};
use retrieval_core::raw::RawResponse;
use retrieval_core::types::RawReference;
use tracing::debug;

/// Document references in engine order, plus the reported match count.
///
/// A response without a document section decodes to no references and a
/// total of zero; `numFound` falls back to the number of documents.
pub fn decode_results(raw: &RawResponse) -> Result<(Vec<RawReference>, u64)> {
    let Some(list) = &raw.response else { return Ok((Vec::new(), 0)) };
    let references = list.docs.iter().map(|doc| parse_reference(&doc.id)).collect::<Result<Vec<_>>>()?;
    let total = list.num_found.unwrap_or(references.len() as u64);
    debug!(documents = references.len(), total, "decoded result list");
    Ok((references, total))
}

/// Splits `"<ClassName> <primary_key>"` on the first space.
pub fn parse_reference(id: &str) -> Result<RawReference> {
    match id.split_once(' ') {
        Some((class_name, primary_key)) if !class_name.is_empty() && !primary_key.is_empty() => {
            Ok(RawReference::new(class_name, primary_key))
        }
        _ => Err(Error::MalformedResponse(format!("document id '{}' is not '<Class> <key>'", id))),
    }
}
