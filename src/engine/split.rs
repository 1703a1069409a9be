//! Core page-stream split implementation.

use crate::codec::{self, ArchiveEntry};
use crate::error::{Result, SpliceError};
use log::debug;
use lopdf::{Document, Object, ObjectId};

/// Explode `input` into one single-page document per page, bundled into a
/// single archive buffer.
///
/// Pages are processed in document order with a 1-based index and entries
/// are named `{job_name}_{index}.pdf`, with no zero padding. Every page is
/// isolated independently, but a failure on any page fails the whole job;
/// a partial archive is never returned.
pub fn split(input: Vec<u8>, job_name: &str) -> Result<Vec<u8>> {
    let source = codec::parse_document(&input, 1)?;
    let pages = source.get_pages();

    debug!("splitting document into {} page(s)", pages.len());

    let mut entries = Vec::with_capacity(pages.len());
    for (number, page_id) in pages {
        let mut single = isolate_page(&source, page_id)?;
        let bytes = codec::write_document(&mut single)?;
        entries.push(ArchiveEntry {
            name: format!("{job_name}_{number}.pdf"),
            bytes,
        });
    }

    codec::write_archive(entries)
}

/// Produce a copy of `source` whose page tree holds only `page_id`.
fn isolate_page(source: &Document, page_id: ObjectId) -> Result<Document> {
    let mut single = source.clone();

    let catalog = single
        .catalog_mut()
        .map_err(|e| SpliceError::recompose(format!("missing document catalog: {e}")))?;

    let pages_id = catalog
        .get(b"Pages")
        .and_then(|p| p.as_reference())
        .map_err(|e| SpliceError::recompose(format!("missing page tree reference: {e}")))?;

    let pages_obj = single
        .get_object_mut(pages_id)
        .map_err(|e| SpliceError::recompose(format!("missing page tree object: {e}")))?;

    let Object::Dictionary(dict) = pages_obj else {
        return Err(SpliceError::recompose("page tree root is not a dictionary"));
    };

    dict.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    dict.set("Count", Object::Integer(1));

    // Reparent the kept page so intermediate tree nodes become unreachable.
    if let Ok(Object::Dictionary(page)) = single.get_object_mut(page_id) {
        page.set("Parent", Object::Reference(pages_id));
    }

    // The sibling pages are unreachable now; drop them before serializing.
    single.prune_objects();
    single.renumber_objects();

    Ok(single)
}
