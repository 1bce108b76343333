//! The `.x2proj` project manifest.
//!
//! A manifest is an XML document whose root element is `Project`. Files and
//! folders are listed as `Content` and `Folder` elements inside one or more
//! `ItemGroup` elements:
//!
//! ```xml
//! <Project xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
//!   <ItemGroup>
//!     <Folder Include="Assets\" />
//!     <Content Include="Assets\sprite.png" />
//!   </ItemGroup>
//! </Project>
//! ```
//!
//! [`Manifest`] wraps the parsed document, exposes the group children as
//! [`GroupItem`]s, and can replace every group with a single consolidated one.

/// Locating the manifest inside a project directory.
pub mod discovery;

/// Entry and namespace model.
pub mod entry;

/// Atomic and in-place file writing.
pub mod persist;

pub use discovery::find_manifest;
pub use entry::{EntryKind, GroupItem, INCLUDE_ATTRIBUTE, ManifestEntry, Namespace};

use crate::SyncError;
use crate::config::{LineEnding, ManifestConfig};
use crate::xml::{self, Document, Element, Node, WriteOptions};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Local name of the document element.
pub const PROJECT_ELEMENT: &str = "Project";

/// Local name of item group elements.
pub const ITEM_GROUP_ELEMENT: &str = "ItemGroup";

/// A loaded project manifest
#[derive(Debug, Clone)]
pub struct Manifest {
    /// File the manifest was read from and will be written to
    path: PathBuf,
    /// Parsed document; its root element is the `Project` element
    document: Document,
    /// Namespace of the `Project` element
    namespace: Namespace,
}

impl Manifest {
    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not well-formed XML,
    /// or its root element is not `Project`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read project file {}", path.display()))?;
        Self::parse(path.to_path_buf(), &text)
    }

    /// Parses manifest text that belongs to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not well-formed XML or its root
    /// element is not `Project`.
    pub fn parse(path: PathBuf, text: &str) -> Result<Self> {
        let document = xml::parse(text)
            .with_context(|| format!("Failed to parse project file {}", path.display()))?;

        let namespace = match document.root() {
            Some(root) if root.local_name() == PROJECT_ELEMENT => Namespace::of(root),
            _ => return Err(SyncError::ProjectElementMissing { path }.into()),
        };
        debug!(namespace = ?namespace.uri(), "loaded project file");

        Ok(Self {
            path,
            document,
            namespace,
        })
    }

    /// File this manifest belongs to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Namespace of the project element.
    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Underlying document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The `Project` element.
    fn project(&self) -> Result<&Element> {
        self.document
            .root()
            .ok_or_else(|| self.project_missing())
    }

    /// Mutable access to the `Project` element.
    fn project_mut(&mut self) -> Result<&mut Element> {
        let error = self.project_missing();
        self.document.root_mut().ok_or(error)
    }

    /// Error reported when the project element has gone missing.
    fn project_missing(&self) -> anyhow::Error {
        SyncError::ProjectElementMissing {
            path: self.path.clone(),
        }
        .into()
    }

    /// Number of `ItemGroup` elements directly under `Project`.
    ///
    /// # Errors
    ///
    /// Returns an error if the project element is missing.
    pub fn group_count(&self) -> Result<usize> {
        let project = self.project()?;
        Ok(project
            .child_elements()
            .filter(|element| self.namespace.is(element, ITEM_GROUP_ELEMENT))
            .count())
    }

    /// Children of every `ItemGroup`, flattened in document order.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingInclude`] for a `Folder` or `Content`
    /// element without `Include`.
    pub fn items(&self) -> Result<Vec<GroupItem>> {
        let project = self.project()?;
        let groups = project
            .child_elements()
            .filter(|element| self.namespace.is(element, ITEM_GROUP_ELEMENT));

        let mut items = Vec::new();
        for (group_index, group) in groups.enumerate() {
            for (position, node) in group.children.iter().enumerate() {
                items.push(GroupItem::from_node(
                    node.clone(),
                    &self.namespace,
                    group_index,
                    position,
                )?);
            }
        }
        Ok(items)
    }

    /// Replaces every `ItemGroup` with one group holding `items`.
    ///
    /// The new group is appended as the last child of `Project`. Items are
    /// ordered by element name descending with a stable sort, which puts all
    /// `Folder` entries ahead of all `Content` entries and keeps the relative
    /// order inside each name.
    ///
    /// # Errors
    ///
    /// Returns an error if the project element is missing.
    pub fn consolidate(&mut self, mut items: Vec<GroupItem>) -> Result<()> {
        items.sort_by(|a, b| b.sort_name().cmp(a.sort_name()));

        let mut group = Element::new(self.namespace.qualify(ITEM_GROUP_ELEMENT));
        group.children = items.into_iter().map(GroupItem::into_node).collect();

        let namespace = self.namespace.clone();
        let project = self.project_mut()?;
        project.children.retain(|node| match node {
            Node::Element(element) => !namespace.is(element, ITEM_GROUP_ELEMENT),
            _ => true,
        });
        project.children.push(Node::Element(group));
        Ok(())
    }

    /// Serializes the manifest using the configured formatting.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_xml_string(&self, config: &ManifestConfig) -> Result<String> {
        let crlf = match config.line_ending {
            LineEnding::Preserve => self.document.crlf,
            LineEnding::Lf => false,
            LineEnding::Crlf => true,
        };

        self.document.to_xml_string(WriteOptions {
            indent: config.indent,
            crlf,
        })
    }

    /// Writes the manifest back to the file it was loaded from.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, config: &ManifestConfig) -> Result<()> {
        let text = self.to_xml_string(config)?;

        if config.atomic_write {
            persist::atomic_write(&self.path, &text)?;
        } else {
            persist::overwrite(&self.path, &text)?;
        }

        debug!(path = %self.path.display(), bytes = text.len(), "wrote project file");
        Ok(())
    }
}
