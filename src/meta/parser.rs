//! Parsing of one `<Tags>` XML element into a [`TagSection`].
//!
//! A tags section has the shape
//!
//! ```text
//! <Tags>
//!   <Count>N</Count>
//!   <I0>id</I0><V0>value</V0><A0>attr</A0>
//!   ...
//!   <I{N-1}>id</I{N-1}><V{N-1}>value</V{N-1}>
//! </Tags>
//! ```
//!
//! `I{c}` carries the numeric tag id, `V{c}` the raw value text. `A{c}` is
//! written by AxioVision but carries nothing downstream and is ignored.

use tracing::{debug, warn};

use crate::error::ParseError;
use crate::meta::entry::MetaEntry;
use crate::meta::section::TagSection;
use crate::meta::tags::TagRegistry;
use crate::xml::XmlElement;

/// Parse one `<Tags>` element into a section, using the registry to decode
/// each numbered tag.
///
/// A missing or non-numeric `<Count>` aborts the parse. Everything else is
/// tolerant: entries with empty value text are skipped, ids without a
/// registry decoder are recorded as unknown, and known ids whose value text
/// fails to decode are logged and skipped. Mandatory-tag enforcement is the
/// document parser's job, after the section is built.
pub fn parse_tags_section(
    tags: &XmlElement,
    registry: &TagRegistry,
) -> Result<TagSection, ParseError> {
    let count = tags
        .child_text("Count")
        .and_then(|text| text.parse::<i32>().ok())
        .ok_or_else(|| ParseError::BadCount {
            section: tags.name.clone(),
        })?;

    let mut section = TagSection::new();

    for c in 0..count {
        let id_text = tags.child_text(&format!("I{c}"));
        let value_text = tags.child_text(&format!("V{c}"));

        let Some(id_text) = id_text else {
            continue;
        };
        let Ok(id) = id_text.parse::<i32>() else {
            warn!(index = c, id = id_text, "skipping tag with non-numeric id");
            continue;
        };

        let raw = value_text.unwrap_or("");

        match registry.spec_for(id) {
            // Empty value text means absent data; it must not pollute the
            // section as an empty string.
            Some(spec) if !raw.is_empty() => match MetaEntry::parse(spec, raw) {
                Ok(entry) => section.insert(entry),
                Err(e) => warn!(id, raw, "skipping undecodable tag value: {e}"),
            },
            Some(_) => {}
            None => section.record_unknown(id),
        }
    }

    if !section.unknown_ids().is_empty() {
        debug!(
            unknown = ?section.unknown_ids(),
            "tags section carried ids unknown to the tag mapping"
        );
    }

    Ok(section)
}

// =============================================================================
// Tests
// =============================================================================
