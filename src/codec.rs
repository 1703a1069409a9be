//! Boundary with the byte-stream codec.
//!
//! The engine never talks to `lopdf` or `zip` directly for parsing and
//! serialization; everything crosses through this module so codec failures
//! are converted into crate errors in one place.

use crate::error::{Result, SpliceError};
use lopdf::Document;
use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// A named member of an output archive.
#[derive(Debug)]
pub struct ArchiveEntry {
    /// Entry name inside the archive.
    pub name: String,
    /// Serialized entry contents.
    pub bytes: Vec<u8>,
}

/// Parse a PDF byte buffer into a page-bearing document.
///
/// `position` is the 1-based position of the buffer in the submitted order,
/// carried into the error for diagnostics.
pub fn parse_document(bytes: &[u8], position: usize) -> Result<Document> {
    Document::load_mem(bytes).map_err(|source| SpliceError::MalformedDocument { position, source })
}

/// Serialize a document back to PDF bytes.
pub fn write_document(doc: &mut Document) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|source| SpliceError::WriteDocument {
            source: lopdf::Error::IO(source),
        })?;
    Ok(bytes)
}

/// Write named entries into a single deflate-compressed ZIP container.
///
/// Entries appear in the archive in the order given.
pub fn write_archive(entries: Vec<ArchiveEntry>) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for ArchiveEntry { name, bytes } in entries {
        writer
            .start_file(name.as_str(), options)
            .map_err(|err| SpliceError::ArchiveWrite {
                name: name.clone(),
                reason: format!("entry '{name}': {err}"),
            })?;
        writer
            .write_all(&bytes)
            .map_err(|err| SpliceError::ArchiveWrite {
                name: name.clone(),
                reason: format!("entry '{name}': {err}"),
            })?;
    }

    let cursor = writer.finish().map_err(|err| SpliceError::ArchiveWrite {
        name: String::new(),
        reason: err.to_string(),
    })?;
    Ok(cursor.into_inner())
}

/// Round-trip a minimal document through the codec.
///
/// The default worker bootstrap runs this before the background task reports
/// itself ready, so a broken toolkit faults at startup instead of on the
/// first job.
pub fn self_test() -> Result<()> {
    let mut doc = minimal_document();
    let bytes = write_document(&mut doc)?;
    let parsed = parse_document(&bytes, 1)?;
    if parsed.get_pages().is_empty() {
        return Err(SpliceError::recompose(
            "codec self-test round-trip lost its page",
        ));
    }
    Ok(())
}

fn minimal_document() -> Document {
    use lopdf::{Object, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();

    let page = dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(page_id, page.into());

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, pages.into());

    let catalog_id = doc.new_object_id();
    let catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    doc.objects.insert(catalog_id, catalog.into());
    doc.trailer.set("Root", catalog_id);

    doc
}
