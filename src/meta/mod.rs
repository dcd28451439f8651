//! Typed metadata model for the AxioVision tag dialect.
//!
//! Layered leaf-first: [`tags`] defines the id vocabulary and registry,
//! [`entry`] the typed value holders, [`section`] the per-`<Tags>` collection
//! and [`parser`] the XML-to-section decoding.

pub mod entry;
pub mod parser;
pub mod section;
pub mod tags;

pub use entry::{MetaEntry, MetaValue};
pub use parser::parse_tags_section;
pub use section::TagSection;
pub use tags::{TagRegistry, TagSpec, ValueKind};
