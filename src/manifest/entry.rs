//! Typed view of the items inside a manifest's item groups.

use crate::xml::{Element, Node};
use crate::{CANONICAL_SEPARATOR, SyncError};

/// Attribute holding an entry's relative path.
pub const INCLUDE_ATTRIBUTE: &str = "Include";

/// Kind of path an entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A directory, written as `<Folder Include="..."/>`
    Folder,
    /// A file, written as `<Content Include="..."/>`
    Content,
}

impl EntryKind {
    /// Both kinds, in the order they are reconciled.
    pub const ALL: [Self; 2] = [Self::Folder, Self::Content];

    /// Local element name for this kind.
    #[must_use]
    pub const fn element_name(self) -> &'static str {
        match self {
            Self::Folder => "Folder",
            Self::Content => "Content",
        }
    }

    /// Kind matching a local element name.
    #[must_use]
    pub fn from_element_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.element_name() == name)
    }

    /// Brings an `Include` value into the form scanned paths use.
    ///
    /// Folder entries may be stored with a trailing separator; it is removed
    /// so they compare equal to scanned folder paths.
    #[must_use]
    pub fn canonical_path(self, include: &str) -> String {
        match self {
            Self::Folder => include.trim_end_matches(CANONICAL_SEPARATOR).to_string(),
            Self::Content => include.to_string(),
        }
    }
}

/// Namespace the project element lives in.
///
/// New elements are created with the project's prefix so that they resolve
/// to the same namespace as the project element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Namespace {
    /// Prefix of the project element name, if it has one
    prefix: Option<String>,
    /// URI bound to that prefix (or the default namespace) on the project element
    uri: Option<String>,
}

impl Namespace {
    /// Reads the namespace of `project`.
    #[must_use]
    pub fn of(project: &Element) -> Self {
        let prefix = project.prefix().map(str::to_string);
        let declaration = match &prefix {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => "xmlns".to_string(),
        };

        Self {
            uri: project.attribute(&declaration).map(str::to_string),
            prefix,
        }
    }

    /// Namespace URI, if declared on the project element.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Qualified name for a local name in this namespace.
    #[must_use]
    pub fn qualify(&self, local: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{local}"),
            None => local.to_string(),
        }
    }

    /// Whether `element` is named `local` in this namespace.
    #[must_use]
    pub fn is(&self, element: &Element, local: &str) -> bool {
        element.local_name() == local && element.prefix() == self.prefix.as_deref()
    }
}

/// A `Folder` or `Content` element together with its canonical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Which kind of path this is
    pub kind: EntryKind,
    /// Canonical relative path (folders without trailing separator)
    pub path: String,
    /// The element as it appears in the manifest
    pub element: Element,
}

impl ManifestEntry {
    /// Creates a new entry whose only attribute is `Include=path`.
    ///
    /// The path is stored exactly as given; folders are not given a trailing
    /// separator.
    #[must_use]
    pub fn new(kind: EntryKind, path: &str, namespace: &Namespace) -> Self {
        let element = Element::new(namespace.qualify(kind.element_name()))
            .with_attribute(INCLUDE_ATTRIBUTE, path);

        Self {
            kind,
            path: path.to_string(),
            element,
        }
    }

    /// Reads an existing entry element.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingInclude`] if the element has no `Include`
    /// attribute. `group` and `position` only feed the error message.
    pub fn from_element(
        kind: EntryKind,
        element: Element,
        group: usize,
        position: usize,
    ) -> Result<Self, SyncError> {
        let Some(include) = element.attribute(INCLUDE_ATTRIBUTE) else {
            return Err(SyncError::MissingInclude {
                element: element.name.clone(),
                group,
                position,
            });
        };

        Ok(Self {
            kind,
            path: kind.canonical_path(include),
            element,
        })
    }
}

/// One child of an item group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupItem {
    /// A `Folder` or `Content` entry
    Entry(ManifestEntry),
    /// Anything else (other item types, comments), carried along untouched
    Other(Node),
}

impl GroupItem {
    /// Classifies a group child.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingInclude`] for an entry element without
    /// `Include`.
    pub fn from_node(
        node: Node,
        namespace: &Namespace,
        group: usize,
        position: usize,
    ) -> Result<Self, SyncError> {
        let kind = node.as_element().and_then(|element| {
            EntryKind::ALL
                .into_iter()
                .find(|kind| namespace.is(element, kind.element_name()))
        });

        match (kind, node) {
            (Some(kind), Node::Element(element)) => Ok(Self::Entry(ManifestEntry::from_element(
                kind, element, group, position,
            )?)),
            (_, node) => Ok(Self::Other(node)),
        }
    }

    /// The entry, when this item is one.
    #[must_use]
    pub const fn as_entry(&self) -> Option<&ManifestEntry> {
        match self {
            Self::Entry(entry) => Some(entry),
            Self::Other(_) => None,
        }
    }

    /// Name the consolidated group is sorted by.
    #[must_use]
    pub fn sort_name(&self) -> &str {
        match self {
            Self::Entry(entry) => &entry.element.name,
            Self::Other(node) => node.node_name(),
        }
    }

    /// Turns the item back into a document node.
    #[must_use]
    pub fn into_node(self) -> Node {
        match self {
            Self::Entry(entry) => Node::Element(entry.element),
            Self::Other(node) => node,
        }
    }
}
