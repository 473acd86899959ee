//! Layout signatures: deterministic string encoding and its parser.
//!
//! A signature encodes a built layout as one segment per non-empty stream,
//! in stream slot order:
//!
//! ```text
//! #S<slot>(V|I)=<stride><A<slot><name>:<offset>:<format>[+<pad>][[<group>]]|...>
//! ```
//!
//! Example:
//!
//! ```text
//! #S0(V)=24<A0POSITION:0:3F32|A1NORMAL:12:3F32>#S1(I)=64<A10INSTANCE_TRANSFORM:0:4F32[4]>
//! ```
//!
//! Signatures capture *resolved* offsets, so parsing one back yields
//! explicit-offset definitions: rebuilding them reproduces the layout
//! exactly, but the information that an offset was originally an append
//! sentinel is gone.
//!
//! Parsing is deliberately lenient where building is strict: a segment
//! that does not match the grammar, or whose slot/group lands out of
//! range, is skipped with a warning instead of aborting the parse.

use std::fmt::Write;

use crate::definition::{DataRate, VertexAttributeDefinition};
use crate::format::VertexFormat;
use crate::layout::VertexStreamLayout;
use crate::semantics::expand_short_name;
use crate::{MAX_SEMANTIC_GROUP_SIZE, MAX_VERTEX_ATTRIBUTES, MAX_VERTEX_STREAMS};

/// Serialize a built layout to its signature string.
pub fn to_signature(layout: &VertexStreamLayout) -> String {
    let mut out = String::new();
    for (stream_slot, stream) in layout.streams().iter() {
        let rate = match stream.rate {
            DataRate::PerVertex => 'V',
            DataRate::PerInstance => 'I',
            // Active streams always carry a concrete rate.
            DataRate::Undefined => continue,
        };

        // Base attributes, in the order they were committed to this stream.
        let mut attributes = String::new();
        for (slot, attr) in layout.attributes().iter_base_attributes() {
            if attr.stream_slot != stream_slot {
                continue;
            }
            if !attributes.is_empty() {
                attributes.push('|');
            }
            let _ = write!(
                attributes,
                "A{}{}:{}:{}",
                slot,
                attr.name,
                attr.offset,
                attr.format.code()
            );
            if attr.padding > 0 {
                let _ = write!(attributes, "+{}", attr.padding);
            }
            if attr.group_size > 1 {
                let _ = write!(attributes, "[{}]", attr.group_size);
            }
        }

        // Streams with no bound attributes are not serialized.
        if attributes.is_empty() {
            continue;
        }
        let _ = write!(out, "#S{}({})={}<{}>", stream_slot, rate, stream.stride, attributes);
    }
    out
}

/// Parse a signature back into explicit-offset definitions.
///
/// Lenient: malformed or out-of-range segments are skipped (with a
/// warning), never aborting the whole parse.
pub fn parse_signature(text: &str) -> Vec<VertexAttributeDefinition> {
    let mut definitions = Vec::new();
    for segment in text.split('#').filter(|s| !s.is_empty()) {
        if parse_stream_segment(segment, &mut definitions).is_none() {
            log::warn!("skipping malformed stream segment: {segment:?}");
        }
    }
    definitions
}

/// Split leading decimal digits off a string.
fn take_digits(s: &str) -> Option<(u32, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

fn parse_stream_segment(
    segment: &str,
    definitions: &mut Vec<VertexAttributeDefinition>,
) -> Option<()> {
    let rest = segment.strip_prefix('S')?;
    let (stream_slot, rest) = take_digits(rest)?;
    if stream_slot >= MAX_VERTEX_STREAMS {
        return None;
    }

    let rest = rest.strip_prefix('(')?;
    let (rate, rest) = match rest.as_bytes().first()? {
        b'V' => (DataRate::PerVertex, &rest[1..]),
        b'I' => (DataRate::PerInstance, &rest[1..]),
        _ => return None,
    };
    let rest = rest.strip_prefix(')')?.strip_prefix('=')?;
    // The stride is redundant with the attribute list; it is validated
    // syntactically and otherwise ignored.
    let (_stride, rest) = take_digits(rest)?;
    let list = rest.strip_prefix('<')?.strip_suffix('>')?;

    for token in list.split('|').filter(|t| !t.is_empty()) {
        match parse_attribute_token(token, stream_slot, rate) {
            Some(def) => definitions.push(def),
            None => log::warn!("skipping malformed attribute token: {token:?}"),
        }
    }
    Some(())
}

fn parse_attribute_token(
    token: &str,
    stream_slot: u32,
    rate: DataRate,
) -> Option<VertexAttributeDefinition> {
    let rest = token.strip_prefix('A')?;
    let (base_slot, rest) = take_digits(rest)?;

    let colon = rest.find(':')?;
    let name = &rest[..colon];
    let rest = &rest[colon + 1..];

    let (offset, rest) = take_digits(rest)?;
    let rest = rest.strip_prefix(':')?;

    let code_end = rest
        .find(|c| c == '+' || c == '[')
        .unwrap_or(rest.len());
    let format = VertexFormat::from_code(&rest[..code_end])?;
    let mut rest = &rest[code_end..];

    let mut padding = 0;
    if let Some(after) = rest.strip_prefix('+') {
        let (value, after) = take_digits(after)?;
        padding = value;
        rest = after;
    }

    let mut group_size = 1;
    if let Some(after) = rest.strip_prefix('[') {
        let (value, after) = take_digits(after)?;
        group_size = value;
        rest = after.strip_prefix(']')?;
    }
    if !rest.is_empty() {
        return None;
    }

    if group_size == 0 || group_size > MAX_SEMANTIC_GROUP_SIZE {
        return None;
    }
    // Checked: a hostile slot near u32::MAX must be skipped, not wrap the
    // range check around.
    if base_slot.checked_add(group_size)? > MAX_VERTEX_ATTRIBUTES {
        return None;
    }

    let name = expand_short_name(name).unwrap_or(name);
    let mut def = VertexAttributeDefinition::new(format, base_slot, name)
        .with_stream(stream_slot)
        .with_offset(offset)
        .with_group_size(group_size)
        .with_padding(padding);
    def.rate = rate;
    Some(def)
}
