//! In-memory store, used by tests and by library callers that want no files touched.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{FieldValue, Fields, ListKind, MetadataStore, StoreError, split_field_id};

#[derive(Debug, Default)]
pub struct MemoryStore {
    committed: HashMap<PathBuf, Fields>,
    staged: HashMap<PathBuf, Fields>,
    commits: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed committed fields for an image (e.g. pre-existing metadata).
    pub fn insert(&mut self, image: &Path, fields: Fields) {
        self.committed.insert(image.to_path_buf(), fields);
    }

    /// Committed fields for `image`.
    pub fn fields(&self, image: &Path) -> Option<&Fields> {
        self.committed.get(image)
    }

    /// Committed list value of `field_id` for `image`.
    pub fn list(&self, image: &Path, field_id: &str) -> Option<Vec<String>> {
        self.fields(image)?.get(field_id)?.as_list()
    }

    /// Number of successful commits so far.
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Images with staged, uncommitted changes.
    pub fn open_sessions(&self) -> usize {
        self.staged.len()
    }
}

impl MetadataStore for MemoryStore {
    fn read_fields(&mut self, image: &Path) -> Result<Fields, StoreError> {
        let fields = self
            .staged
            .entry(image.to_path_buf())
            .or_insert_with(|| self.committed.get(image).cloned().unwrap_or_default());
        Ok(fields.clone())
    }

    fn write_field(
        &mut self,
        image: &Path,
        field_id: &str,
        values: Vec<String>,
    ) -> Result<(), StoreError> {
        split_field_id(field_id)?;
        let fields = self
            .staged
            .entry(image.to_path_buf())
            .or_insert_with(|| self.committed.get(image).cloned().unwrap_or_default());
        fields.insert(
            field_id.to_string(),
            FieldValue::plain_list(ListKind::Bag, values),
        );
        Ok(())
    }

    fn commit(&mut self, image: &Path) -> Result<(), StoreError> {
        let fields = self
            .staged
            .remove(image)
            .ok_or_else(|| StoreError::NotOpen(image.to_path_buf()))?;
        self.committed.insert(image.to_path_buf(), fields);
        self.commits += 1;
        Ok(())
    }

    fn abort(&mut self, image: &Path) {
        self.staged.remove(image);
    }
}
