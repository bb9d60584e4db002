//! Metadata store: the collaborator that reads and writes structured image metadata.
//!
//! The batch pipeline only talks to [`MetadataStore`] through a [`StoreSession`], which
//! releases the image on every exit path (commit, or abort on drop).

pub mod memory;
pub mod xmp;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use memory::MemoryStore;
pub use xmp::XmpSidecarStore;

/// Value of one metadata field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List { kind: ListKind, items: Vec<ListItem> },
}

/// One `rdf:li` entry, with its optional `xml:lang` qualifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListItem {
    pub value: String,
    pub lang: Option<String>,
}

impl ListItem {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            lang: None,
        }
    }

    pub fn with_lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            lang: Some(lang.into()),
        }
    }
}

/// RDF container used for a list field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    /// Unordered set (`rdf:Bag`), e.g. `dc:subject`.
    Bag,
    /// Ordered list (`rdf:Seq`).
    Seq,
    /// Alternatives (`rdf:Alt`), e.g. localized `dc:title`.
    Alt,
}

impl FieldValue {
    /// Unqualified list of plain values (e.g. what `write_field` stores).
    pub fn plain_list(kind: ListKind, values: Vec<String>) -> Self {
        FieldValue::List {
            kind,
            items: values.into_iter().map(ListItem::new).collect(),
        }
    }

    /// List item values in order, or `None` for a simple text value.
    pub fn as_list(&self) -> Option<Vec<String>> {
        match self {
            FieldValue::List { items, .. } => {
                Some(items.iter().map(|item| item.value.clone()).collect())
            }
            FieldValue::Text(_) => None,
        }
    }
}

/// Field id (`Xmp.<prefix>.<name>`) → value.
pub type Fields = BTreeMap<String, FieldValue>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: malformed metadata: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
    #[error("{}: unsupported metadata structure: {reason}", path.display())]
    Unsupported { path: PathBuf, reason: String },
    #[error("invalid field id '{0}' (expected Xmp.<prefix>.<name>)")]
    InvalidField(String),
    #[error("no namespace known for prefix '{0}'")]
    UnknownNamespace(String),
    #[error("{}: no open session to commit", .0.display())]
    NotOpen(PathBuf),
    #[error("{}: commit failed: {reason}", path.display())]
    Commit { path: PathBuf, reason: String },
}

/// Read field / write field / commit contract for image metadata.
///
/// `write_field` stages a change; nothing reaches disk until `commit`. `abort` drops
/// whatever is staged for the image and must be safe to call when nothing is.
pub trait MetadataStore {
    fn read_fields(&mut self, image: &Path) -> Result<Fields, StoreError>;

    /// Replace `field_id` entirely with `values`.
    fn write_field(
        &mut self,
        image: &Path,
        field_id: &str,
        values: Vec<String>,
    ) -> Result<(), StoreError>;

    fn commit(&mut self, image: &Path) -> Result<(), StoreError>;

    fn abort(&mut self, image: &Path);
}

/// Scoped access to one image in a store. Aborts staged changes on drop unless committed.
pub struct StoreSession<'a, S: MetadataStore + ?Sized> {
    store: &'a mut S,
    image: &'a Path,
    committed: bool,
}

impl<'a, S: MetadataStore + ?Sized> StoreSession<'a, S> {
    pub fn open(store: &'a mut S, image: &'a Path) -> Self {
        Self {
            store,
            image,
            committed: false,
        }
    }

    pub fn read_fields(&mut self) -> Result<Fields, StoreError> {
        self.store.read_fields(self.image)
    }

    pub fn write_field(&mut self, field_id: &str, values: Vec<String>) -> Result<(), StoreError> {
        self.store.write_field(self.image, field_id, values)
    }

    pub fn commit(mut self) -> Result<(), StoreError> {
        let result = self.store.commit(self.image);
        // A failed commit still goes through abort in Drop.
        self.committed = result.is_ok();
        result
    }
}

impl<S: MetadataStore + ?Sized> Drop for StoreSession<'_, S> {
    fn drop(&mut self) {
        if !self.committed {
            log::debug!("Releasing uncommitted session for {}", self.image.display());
            self.store.abort(self.image);
        }
    }
}

/// Split `Xmp.<prefix>.<name>` into `(prefix, name)`.
pub fn split_field_id(field_id: &str) -> Result<(&str, &str), StoreError> {
    let mut parts = field_id.splitn(3, '.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Xmp"), Some(prefix), Some(name))
            if !prefix.is_empty() && !name.is_empty() && !name.contains('.') =>
        {
            Ok((prefix, name))
        }
        _ => Err(StoreError::InvalidField(field_id.to_string())),
    }
}
