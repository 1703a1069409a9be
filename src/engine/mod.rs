//! The document recomposition engine.
//!
//! Pure transformation logic at the page-stream level: [`merge`] concatenates
//! the pages of every input document in input order, [`split`] explodes one
//! document into an archive of single-page documents. Both run synchronously
//! inside the background task and talk to the byte format only through
//! [`crate::codec`].

mod merge;
mod split;

pub use merge::merge;
pub use split::split;
