//! Builds tables from events or from a small subset of XML.
//!
//! The reader covers what fixtures and clips need: elements, attributes
//! (single or double quoted), text, CDATA sections, comments, processing
//! instructions and the predefined/numeric entity references. Doctype
//! declarations are skipped. There is no namespace resolution; URIs are set
//! explicitly through renames.
//!
//! Invariant: the builder never emits two adjacent text siblings; consecutive
//! text events under one parent are appended to the same record.

use crate::clip::TableClip;
use crate::error::{BuildError, TableError};
use crate::record::{Kind, NodeRecord, Pre};
use crate::store::TableStore;
use crate::table::Table;
use memchr::memchr;
use std::borrow::Cow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Drop text nodes that consist of ASCII whitespace only.
    pub strip_whitespace: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            strip_whitespace: true,
        }
    }
}

/// Event-driven table builder. Records are appended in pre-order; sizes are
/// fixed up when elements close.
#[derive(Debug)]
pub struct TableBuilder {
    config: BuilderConfig,
    table: Table,
    open: Vec<Pre>,
}

impl TableBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            config,
            table: Table::new(),
            open: Vec::new(),
        }
    }

    fn parent(&self) -> Pre {
        self.open.last().copied().unwrap_or(0)
    }

    fn append(&mut self, mut record: NodeRecord) -> Result<Pre, TableError> {
        let pre = self.table.len();
        record.dist = (pre - self.parent()) as u32;
        self.table.push(record)
    }

    pub fn start_element(&mut self, name: &str) -> Result<Pre, TableError> {
        let mut record = NodeRecord::new(Kind::Element);
        record.name = Some(self.table.intern(name)?);
        let pre = self.append(record)?;
        self.open.push(pre);
        Ok(pre)
    }

    /// Adds an attribute to the element opened last. Attributes must precede
    /// the element's first child.
    pub fn attribute(&mut self, name: &str, value: &str) -> Result<Pre, BuildError> {
        let Some(&owner) = self.open.last() else {
            return Err(BuildError::StrayAttribute);
        };
        if self.table.len() != owner + self.table.attribute_size(owner) {
            return Err(BuildError::StrayAttribute);
        }
        let pre = self.push_attribute(name, value)?;
        self.table.record_mut(owner).asize += 1;
        Ok(pre)
    }

    /// Adds a top-level attribute; used for attribute-only fragments.
    pub fn loose_attribute(&mut self, name: &str, value: &str) -> Result<Pre, TableError> {
        self.push_attribute(name, value)
    }

    fn push_attribute(&mut self, name: &str, value: &str) -> Result<Pre, TableError> {
        let mut record = NodeRecord::new(Kind::Attribute);
        record.name = Some(self.table.intern(name)?);
        record.value = Some(self.table.alloc_text(value)?);
        self.append(record)
    }

    pub fn text(&mut self, value: &str) -> Result<(), TableError> {
        if value.is_empty()
            || (self.config.strip_whitespace && value.bytes().all(|b| b.is_ascii_whitespace()))
        {
            return Ok(());
        }
        let last = self.table.len() - 1;
        if last > 0 && self.table.kind(last) == Kind::Text && self.table.parent(last) == Some(self.parent())
        {
            let mut merged = self.table.text(last).unwrap_or_default().to_string();
            merged.push_str(value);
            return self.table.set_text(last, &merged);
        }
        let mut record = NodeRecord::new(Kind::Text);
        record.value = Some(self.table.alloc_text(value)?);
        self.append(record)?;
        Ok(())
    }

    pub fn comment(&mut self, value: &str) -> Result<Pre, TableError> {
        let mut record = NodeRecord::new(Kind::Comment);
        record.value = Some(self.table.alloc_text(value)?);
        self.append(record)
    }

    pub fn processing_instruction(&mut self, target: &str, data: &str) -> Result<Pre, TableError> {
        let mut record = NodeRecord::new(Kind::ProcessingInstruction);
        record.name = Some(self.table.intern(target)?);
        record.value = Some(self.table.alloc_text(data)?);
        self.append(record)
    }

    pub fn current_element(&self) -> Option<&str> {
        self.open.last().and_then(|&pre| self.table.name(pre))
    }

    pub fn end_element(&mut self) -> Option<Pre> {
        let pre = self.open.pop()?;
        let size = self.table.len() - pre;
        self.table.record_mut(pre).size = size as u32;
        Some(pre)
    }

    /// Closes any open elements and returns the finished table.
    pub fn finish(mut self) -> Table {
        while self.end_element().is_some() {}
        let len = self.table.len();
        self.table.record_mut(0).size = len as u32;
        self.table
    }
}

pub fn parse_document(input: &str, config: &BuilderConfig) -> Result<Table, BuildError> {
    let mut builder = TableBuilder::new(*config);
    read_markup(input, &mut builder)?;
    let table = builder.finish();
    log::trace!(target: "table.builder", "built document with {} records", table.len());
    Ok(table)
}

pub fn parse_fragment(input: &str, config: &BuilderConfig) -> Result<TableClip, BuildError> {
    parse_document(input, config).map(TableClip::whole)
}

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const CDATA_START: &str = "<![CDATA[";
const CDATA_END: &str = "]]>";
const PI_START: &str = "<?";
const PI_END: &str = "?>";

fn read_markup(input: &str, builder: &mut TableBuilder) -> Result<(), BuildError> {
    let bytes = input.as_bytes();
    let mut i = 0;
    // Slices are only cut at ASCII structural bytes, so every endpoint is a
    // UTF-8 char boundary.
    while i < bytes.len() {
        if bytes[i] != b'<' {
            let end = memchr(b'<', &bytes[i..]).map_or(bytes.len(), |rel| i + rel);
            let text = decode_entities(&input[i..end], i)?;
            builder.text(&text)?;
            i = end;
            continue;
        }
        let rest = &input[i..];
        if rest.starts_with(COMMENT_START) {
            let body = i + COMMENT_START.len();
            let end = find(input, body, COMMENT_END)?;
            builder.comment(&input[body..end])?;
            i = end + COMMENT_END.len();
        } else if rest.starts_with(CDATA_START) {
            let body = i + CDATA_START.len();
            let end = find(input, body, CDATA_END)?;
            builder.text(&input[body..end])?;
            i = end + CDATA_END.len();
        } else if rest.starts_with(PI_START) {
            let body = i + PI_START.len();
            let end = find(input, body, PI_END)?;
            let target = scan_name(input, body)?;
            let data = input[body + target.len()..end].trim_start();
            builder.processing_instruction(target, data)?;
            i = end + PI_END.len();
        } else if rest.starts_with("<!") {
            // doctype and other declarations carry nothing the table stores
            i = find(input, i, ">")? + 1;
        } else if rest.starts_with("</") {
            let name = scan_name(input, i + 2)?;
            let close = skip_whitespace(bytes, i + 2 + name.len());
            if bytes.get(close) != Some(&b'>') {
                return Err(BuildError::UnexpectedEof { offset: close });
            }
            match builder.current_element() {
                Some(open) if open == name => {
                    builder.end_element();
                }
                Some(open) => {
                    return Err(BuildError::MismatchedEndTag {
                        expected: open.to_string(),
                        found: name.to_string(),
                        offset: i,
                    });
                }
                None => {
                    return Err(BuildError::UnmatchedEndTag {
                        found: name.to_string(),
                        offset: i,
                    });
                }
            }
            i = close + 1;
        } else {
            i = read_start_tag(input, i, builder)?;
        }
    }
    if let Some(open) = builder.current_element() {
        return Err(BuildError::UnclosedElement {
            name: open.to_string(),
        });
    }
    Ok(())
}

fn read_start_tag(input: &str, start: usize, builder: &mut TableBuilder) -> Result<usize, BuildError> {
    let bytes = input.as_bytes();
    let name = scan_name(input, start + 1)?;
    builder.start_element(name)?;
    let mut k = start + 1 + name.len();
    loop {
        k = skip_whitespace(bytes, k);
        match bytes.get(k) {
            None => return Err(BuildError::UnexpectedEof { offset: k }),
            Some(b'>') => return Ok(k + 1),
            Some(b'/') => {
                if bytes.get(k + 1) != Some(&b'>') {
                    return Err(BuildError::MalformedAttribute { offset: k });
                }
                builder.end_element();
                return Ok(k + 2);
            }
            Some(_) => {
                let attr = scan_name(input, k)?;
                let mut j = skip_whitespace(bytes, k + attr.len());
                if bytes.get(j) != Some(&b'=') {
                    return Err(BuildError::MalformedAttribute { offset: j });
                }
                j = skip_whitespace(bytes, j + 1);
                let quote = match bytes.get(j) {
                    Some(&q @ (b'"' | b'\'')) => q,
                    _ => return Err(BuildError::MalformedAttribute { offset: j }),
                };
                let value_start = j + 1;
                let value_end = memchr(quote, &bytes[value_start..])
                    .map(|rel| value_start + rel)
                    .ok_or(BuildError::UnexpectedEof { offset: value_start })?;
                let value = decode_entities(&input[value_start..value_end], value_start)?;
                builder.attribute(attr, &value)?;
                k = value_end + 1;
            }
        }
    }
}

fn find(input: &str, from: usize, needle: &str) -> Result<usize, BuildError> {
    input[from..]
        .find(needle)
        .map(|rel| from + rel)
        .ok_or(BuildError::UnexpectedEof { offset: input.len() })
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':' || !b.is_ascii()
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || b.is_ascii_digit() || b == b'-' || b == b'.'
}

fn scan_name(input: &str, start: usize) -> Result<&str, BuildError> {
    let bytes = input.as_bytes();
    match bytes.get(start) {
        Some(&b) if is_name_start(b) => {}
        _ => return Err(BuildError::InvalidName { offset: start }),
    }
    let mut end = start + 1;
    while end < bytes.len() && is_name_char(bytes[end]) {
        end += 1;
    }
    // a non-ASCII run may stop mid-character only at the end of input
    while !input.is_char_boundary(end) {
        end += 1;
    }
    Ok(&input[start..end])
}

fn decode_entities(text: &str, offset: usize) -> Result<Cow<'_, str>, BuildError> {
    let bytes = text.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Ok(Cow::Borrowed(text));
    };
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..first]);
    let mut i = first;
    while i < bytes.len() {
        if bytes[i] != b'&' {
            let next = memchr(b'&', &bytes[i..]).map_or(bytes.len(), |rel| i + rel);
            out.push_str(&text[i..next]);
            i = next;
            continue;
        }
        let semi = memchr(b';', &bytes[i..])
            .map(|rel| i + rel)
            .ok_or(BuildError::UnknownEntity { offset: offset + i })?;
        let entity = &text[i + 1..semi];
        let decoded = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => numeric_entity(entity).ok_or(BuildError::UnknownEntity { offset: offset + i })?,
        };
        out.push(decoded);
        i = semi + 1;
    }
    Ok(Cow::Owned(out))
}

fn numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}
