//! Serialization helpers for tests, fixtures and debugging.
//!
//! `to_xml` renders the children of the document node as compact markup;
//! `TableSnapshot` renders one indented line per record including the
//! structural integers, which is what golden fixtures compare against.

use crate::record::{Kind, Pre};
use crate::store::TableStore;
use std::fmt::{self, Write};

/// Compact markup for everything below the document node.
pub fn to_xml<S: TableStore + ?Sized>(store: &S) -> String {
    let mut out = String::new();
    let mut pre = 1;
    while pre < store.len() {
        write_node(store, pre, &mut out);
        pre += store.size(pre).max(1);
    }
    out
}

/// Compact markup for the subtree rooted at `pre`. Attributes render as
/// `name="value"`.
pub fn node_xml<S: TableStore + ?Sized>(store: &S, pre: Pre) -> String {
    let mut out = String::new();
    write_node(store, pre, &mut out);
    out
}

/// Values of all text nodes, in document order.
pub fn text_values<S: TableStore + ?Sized>(store: &S) -> Vec<String> {
    (0..store.len())
        .filter(|&pre| store.kind(pre) == Kind::Text)
        .map(|pre| store.text(pre).unwrap_or_default().to_string())
        .collect()
}

fn write_node<S: TableStore + ?Sized>(store: &S, pre: Pre, out: &mut String) {
    match store.kind(pre) {
        Kind::Document => {
            let end = pre + store.size(pre);
            let mut child = pre + store.attribute_size(pre);
            while child < end {
                write_node(store, child, out);
                child += store.size(child).max(1);
            }
        }
        Kind::Element => {
            let name = store.name(pre).unwrap_or_default();
            out.push('<');
            out.push_str(name);
            let asize = store.attribute_size(pre);
            for attr in pre + 1..pre + asize {
                out.push(' ');
                write_attribute(store, attr, out);
            }
            let end = pre + store.size(pre);
            let mut child = pre + asize;
            if child == end {
                out.push_str("/>");
                return;
            }
            out.push('>');
            while child < end {
                write_node(store, child, out);
                child += store.size(child).max(1);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Kind::Attribute => write_attribute(store, pre, out),
        Kind::Text => escape_into(out, store.text(pre).unwrap_or_default(), false),
        Kind::Comment => {
            out.push_str("<!--");
            out.push_str(store.text(pre).unwrap_or_default());
            out.push_str("-->");
        }
        Kind::ProcessingInstruction => {
            out.push_str("<?");
            out.push_str(store.name(pre).unwrap_or_default());
            let data = store.text(pre).unwrap_or_default();
            if !data.is_empty() {
                out.push(' ');
                out.push_str(data);
            }
            out.push_str("?>");
        }
    }
}

fn write_attribute<S: TableStore + ?Sized>(store: &S, pre: Pre, out: &mut String) {
    out.push_str(store.name(pre).unwrap_or_default());
    out.push_str("=\"");
    escape_into(out, store.text(pre).unwrap_or_default(), true);
    out.push('"');
}

fn escape_into(out: &mut String, value: &str, attribute: bool) {
    for ch in value.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// One line per record: `pre kind[name] dist= size= asize=` plus the value,
/// indented by depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSnapshot {
    lines: Vec<String>,
}

impl TableSnapshot {
    pub fn new<S: TableStore + ?Sized>(store: &S) -> Self {
        let mut depth: Vec<Pre> = Vec::new();
        let mut lines = Vec::with_capacity(store.len());
        for pre in 0..store.len() {
            while let Some(&open) = depth.last() {
                if pre < open + store.size(open) {
                    break;
                }
                depth.pop();
            }
            let mut line = String::new();
            line.extend(std::iter::repeat_n(' ', depth.len() * 2));
            write_record_line(store, pre, &mut line);
            lines.push(line);
            if store.kind(pre).is_container() {
                depth.push(pre);
            }
        }
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for TableSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn write_record_line<S: TableStore + ?Sized>(store: &S, pre: Pre, out: &mut String) {
    let kind = store.kind(pre);
    let _ = write!(out, "{pre} {kind:?}");
    if let Some(name) = store.name(pre) {
        let _ = write!(out, "[{name}]");
    }
    let _ = write!(
        out,
        " dist={} size={} asize={}",
        store.dist(pre),
        store.size(pre),
        store.attribute_size(pre)
    );
    if let Some(value) = store.text(pre) {
        let _ = write!(out, " {value:?}");
    }
}
