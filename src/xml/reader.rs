use super::{Attribute, Declaration, Document, Element, Node};
use anyhow::{Context, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use std::borrow::Cow;

/// UTF-8 byte order mark as a char.
const BOM: char = '\u{feff}';

/// Parses XML text into a [`Document`].
///
/// Whitespace-only text between elements is dropped. Any other text is kept
/// exactly as written, including its surrounding whitespace.
///
/// # Errors
///
/// Returns an error if the text is not well-formed XML, contains no element,
/// or contains non UTF-8 names or values.
pub fn parse(input: &str) -> Result<Document> {
    let (bom, body) = match input.strip_prefix(BOM) {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let mut reader = Reader::from_str(body);

    let mut declaration = None;
    let mut nodes = Vec::new();
    // Elements whose end tag has not been seen yet
    let mut open: Vec<Element> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .with_context(|| format!("Malformed XML near byte {}", reader.buffer_position()))?;

        let node = match event {
            Event::Eof => break,
            Event::Decl(decl) => {
                declaration = Some(read_declaration(&decl)?);
                continue;
            }
            Event::Start(start) => {
                open.push(read_element(&start)?);
                continue;
            }
            Event::Empty(start) => Node::Element(read_element(&start)?),
            Event::End(_) => {
                let element = open.pop().context("Closing tag without matching opening tag")?;
                Node::Element(element)
            }
            Event::Text(text) => {
                let text = text.unescape().context("Invalid character data")?;
                if text.trim().is_empty() {
                    continue;
                }
                Node::Text(text.into_owned())
            }
            Event::CData(data) => Node::CData(utf8(data.into_inner())?),
            Event::Comment(comment) => Node::Comment(utf8(comment.into_inner())?),
            Event::PI(pi) => Node::ProcessingInstruction(utf8(Cow::Borrowed(&*pi))?),
            Event::DocType(doctype) => Node::DocType(utf8(doctype.into_inner())?),
        };

        match open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => nodes.push(node),
        }
    }

    if let Some(unclosed) = open.last() {
        anyhow::bail!("Element <{}> is never closed", unclosed.name);
    }
    if !nodes.iter().any(|node| matches!(node, Node::Element(_))) {
        anyhow::bail!("Document has no root element");
    }

    Ok(Document {
        bom,
        crlf: body.contains("\r\n"),
        declaration,
        nodes,
    })
}

/// Builds an element (without children) from a start tag.
fn read_element(start: &BytesStart<'_>) -> Result<Element> {
    let name = utf8(Cow::Borrowed(start.name().as_ref()))?;
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.with_context(|| format!("Invalid attribute on <{}>", element.name))?;
        let attr_name = utf8(Cow::Borrowed(attr.key.as_ref()))?;
        let value = attr
            .unescape_value()
            .with_context(|| format!("Invalid value for attribute {attr_name}"))?
            .into_owned();
        element.attributes.push(Attribute {
            name: attr_name,
            value,
        });
    }

    Ok(element)
}

/// Reads the pseudo-attributes of an XML declaration.
fn read_declaration(decl: &BytesDecl<'_>) -> Result<Declaration> {
    let version = utf8(decl.version()?)?;
    let encoding = decl.encoding().transpose()?.map(utf8).transpose()?;
    let standalone = decl.standalone().transpose()?.map(utf8).transpose()?;

    Ok(Declaration {
        version,
        encoding,
        standalone,
    })
}

/// Converts raw bytes into an owned string.
fn utf8(bytes: Cow<'_, [u8]>) -> Result<String> {
    String::from_utf8(bytes.into_owned()).context("XML contains invalid UTF-8")
}
