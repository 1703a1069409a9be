//! Core page-stream merge implementation.

use crate::codec;
use crate::error::{Result, SpliceError};
use log::debug;
use lopdf::{Document, Object, ObjectId};

/// Merge the given PDF buffers into a single document.
///
/// All pages of each document are appended in input order; page order within
/// each document is preserved. No reordering, deduplication, or page-count
/// validation happens here beyond what the codec itself rejects. The engine
/// imposes no lower bound past non-emptiness, so a single-document merge is
/// legal; the two-document minimum is the caller's submission contract.
pub fn merge(inputs: Vec<Vec<u8>>) -> Result<Vec<u8>> {
    if inputs.is_empty() {
        return Err(SpliceError::NoInputs);
    }

    debug!("merging {} document(s)", inputs.len());

    let mut parsed = Vec::with_capacity(inputs.len());
    for (index, buffer) in inputs.iter().enumerate() {
        parsed.push(codec::parse_document(buffer, index + 1)?);
    }

    let mut parsed = parsed.into_iter();
    let Some(mut merged) = parsed.next() else {
        return Err(SpliceError::NoInputs);
    };
    let mut max_id = merged.max_id;

    for mut doc in parsed {
        // Renumber past the running maximum to avoid object ID collisions.
        doc.renumber_objects_with(max_id + 1);
        max_id = doc.max_id;

        let doc_pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        merged.objects.extend(doc.objects);
        append_pages(&mut merged, &doc_pages)?;
    }

    merged.prune_objects();
    merged.compress();
    merged.renumber_objects();

    codec::write_document(&mut merged)
}

/// Append page references to the merged document's page tree.
fn append_pages(merged: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    let catalog = merged
        .catalog_mut()
        .map_err(|e| SpliceError::recompose(format!("missing document catalog: {e}")))?;

    let pages_id = catalog
        .get(b"Pages")
        .and_then(|p| p.as_reference())
        .map_err(|e| SpliceError::recompose(format!("missing page tree reference: {e}")))?;

    let pages_obj = merged
        .get_object_mut(pages_id)
        .map_err(|e| SpliceError::recompose(format!("missing page tree object: {e}")))?;

    let Object::Dictionary(dict) = pages_obj else {
        return Err(SpliceError::recompose("page tree root is not a dictionary"));
    };

    match dict.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => {
            kids.extend(page_ids.iter().map(|&id| Object::Reference(id)));
        }
        Ok(_) => return Err(SpliceError::recompose("page tree Kids is not an array")),
        Err(_) => {
            return Err(SpliceError::recompose(
                "page tree is missing its Kids array",
            ));
        }
    }

    let current = dict.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
    dict.set("Count", Object::Integer(current + page_ids.len() as i64));

    // Reparent the adopted pages so the orphaned source trees can be pruned.
    for &page_id in page_ids {
        if let Ok(Object::Dictionary(page)) = merged.get_object_mut(page_id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    Ok(())
}
