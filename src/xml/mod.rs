//! Owned XML document tree.
//!
//! The manifest is read into a plain tree of owned nodes: every element owns
//! its children in a `Vec`, and there are no parent pointers. Traversal is
//! always top-down, and edits replace child lists wholesale.
//!
//! Whitespace-only text is dropped while reading and the writer re-indents
//! the output, so reading a written document and writing it again produces
//! the same bytes.

/// Parsing text into a [`Document`].
pub mod reader;

/// Serializing a [`Document`] back to text.
pub mod writer;

pub use reader::parse;
pub use writer::WriteOptions;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with its attributes and children
    Element(Element),
    /// Character data, stored unescaped
    Text(String),
    /// `<![CDATA[...]]>` content
    CData(String),
    /// `<!--...-->` content, stored as written
    Comment(String),
    /// `<?target data?>` content, stored as written
    ProcessingInstruction(String),
    /// `<!DOCTYPE ...>` content, stored as written
    DocType(String),
}

impl Node {
    /// Name used when ordering mixed nodes.
    ///
    /// Elements report their qualified name; other nodes report the DOM
    /// pseudo-names (`#text`, `#comment`, ...), which sort before any
    /// element name.
    #[must_use]
    pub fn node_name(&self) -> &str {
        match self {
            Self::Element(element) => &element.name,
            Self::Text(_) => "#text",
            Self::CData(_) => "#cdata-section",
            Self::Comment(_) => "#comment",
            Self::ProcessingInstruction(_) => "#processing-instruction",
            Self::DocType(_) => "#doctype",
        }
    }

    /// The element inside this node, if it is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// A single attribute; the value is stored unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified attribute name
    pub name: String,
    /// Unescaped value
    pub value: String,
}

/// An element and everything below it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Qualified name (`Project`, `msb:Project`)
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with no attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Sets an attribute, replacing an existing value with the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// Value of the attribute called `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Namespace prefix of the element name, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Element name without its namespace prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Iterates over child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }
}

/// The `<?xml ...?>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// `version` pseudo-attribute
    pub version: String,
    /// `encoding` pseudo-attribute
    pub encoding: Option<String>,
    /// `standalone` pseudo-attribute
    pub standalone: Option<String>,
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Whether the source started with a UTF-8 byte order mark
    pub bom: bool,
    /// Whether the source used `\r\n` line endings
    pub crlf: bool,
    /// XML declaration, if present
    pub declaration: Option<Declaration>,
    /// Top-level nodes; exactly one of them is an element
    pub nodes: Vec<Node>,
}

impl Document {
    /// The document element.
    #[must_use]
    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(Node::as_element)
    }

    /// Mutable access to the document element.
    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }
}
