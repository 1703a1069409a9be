//! Shared helpers for pdfsplice integration tests.
//!
//! Documents are built in memory: every page carries a recognizable
//! MediaBox, with the width identifying the source document and the height
//! identifying the page's 1-based position, so merge order and split
//! fidelity can both be asserted from output bytes alone.

use lopdf::{Document, Object, dictionary};
use pdfsplice::{PDF_MEDIA_TYPE, SourceFile};
use std::io::{Cursor, Read};

/// Initialize test logging once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a PDF with `pages` pages. Each page's MediaBox is
/// `[0 0 width_marker (700 + page_number)]`.
pub fn pdf_bytes(pages: usize, width_marker: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for index in 0..pages {
        let page_id = doc.new_object_id();
        let page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                width_marker.into(),
                (701 + index as i64).into(),
            ],
        };
        doc.objects.insert(page_id, page.into());
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages as i64,
    };
    doc.objects.insert(pages_id, pages_dict.into());

    let catalog_id = doc.new_object_id();
    let catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    doc.objects.insert(catalog_id, catalog.into());
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Wrap raw PDF bytes as a queue-ready source file.
pub fn source_file(name: &str, bytes: Vec<u8>) -> SourceFile {
    SourceFile::from_bytes(name, PDF_MEDIA_TYPE, bytes)
}

/// The `(width, height)` markers of every page, in document order.
pub fn page_markers(bytes: &[u8]) -> Vec<(i64, i64)> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let Ok(Object::Dictionary(page)) = doc.get_object(page_id) else {
                panic!("page {page_id:?} is not a dictionary");
            };
            let Ok(Object::Array(media_box)) = page.get(b"MediaBox") else {
                panic!("page {page_id:?} has no MediaBox");
            };
            (
                media_box[2].as_i64().unwrap(),
                media_box[3].as_i64().unwrap(),
            )
        })
        .collect()
}

/// All `(name, bytes)` entries of a ZIP archive, in archive order.
pub fn read_archive(archive_bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(archive_bytes)).unwrap();
    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        entries.push((entry.name().to_string(), bytes));
    }
    entries
}
