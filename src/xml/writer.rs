use super::{Document, Element, Node};
use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

/// Formatting choices for [`Document::to_xml_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level; `0` writes everything on one line
    pub indent: usize,
    /// Use `\r\n` instead of `\n`
    pub crlf: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            crlf: false,
        }
    }
}

impl Document {
    /// Serializes the document.
    ///
    /// The declaration and byte order mark are written back when the source
    /// had them. No newline is added after the root element.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the in-memory buffer fails.
    pub fn to_xml_string(&self, options: WriteOptions) -> Result<String> {
        let mut writer = if options.indent == 0 {
            Writer::new(Vec::new())
        } else {
            Writer::new_with_indent(Vec::new(), b' ', options.indent)
        };

        if let Some(decl) = &self.declaration {
            writer.write_event(Event::Decl(BytesDecl::new(
                &decl.version,
                decl.encoding.as_deref(),
                decl.standalone.as_deref(),
            )))?;
        }

        for node in &self.nodes {
            write_node(&mut writer, node)?;
        }

        let mut text =
            String::from_utf8(writer.into_inner()).context("Serialized XML is not UTF-8")?;

        if options.crlf {
            text = text.replace("\r\n", "\n").replace('\n', "\r\n");
        }
        if self.bom {
            text.insert(0, '\u{feff}');
        }

        Ok(text)
    }
}

/// Writes one node and everything below it.
fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    match node {
        Node::Element(element) => write_element(writer, element)?,
        Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        Node::CData(data) => writer.write_event(Event::CData(BytesCData::new(data.as_str())))?,
        Node::Comment(comment) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;
        }
        Node::ProcessingInstruction(pi) => {
            writer.write_event(Event::PI(BytesPI::new(pi.as_str())))?;
        }
        Node::DocType(doctype) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))?;
        }
    }
    Ok(())
}

/// Writes an element, as a self-closing tag when it has no children.
fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for attr in &element.attributes {
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
