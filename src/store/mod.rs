//! In-memory template store.
//!
//! Durable persistence belongs to the platform's storage service; this
//! process holds the working set of response groups, optionally seeded from a
//! JSON file at boot. All mutations go through the write lock, which
//! serializes concurrent admin edits; the last write wins. Reads taken during
//! a concurrent edit may observe either version, which is acceptable for a
//! best-effort classification step.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::response_group::ResponseGroup;

#[derive(Debug, Default)]
pub struct TemplateStore {
    groups: RwLock<HashMap<Uuid, ResponseGroup>>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored groups.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// All groups ordered by group_name, so list output and multi-group
    /// classification are deterministic.
    pub fn all(&self) -> Vec<ResponseGroup> {
        let mut groups: Vec<ResponseGroup> = self.read().values().cloned().collect();
        groups.sort_by(|a, b| a.group_name.cmp(&b.group_name));
        groups
    }

    pub fn get(&self, id: Uuid) -> Option<ResponseGroup> {
        self.read().get(&id).cloned()
    }

    pub fn find_by_name(&self, group_name: &str) -> Option<ResponseGroup> {
        self.read()
            .values()
            .find(|g| g.group_name == group_name)
            .cloned()
    }

    /// Insert a new group. Fails with `Conflict` when the name is taken.
    pub fn insert(&self, group: ResponseGroup) -> Result<ResponseGroup, AppError> {
        let mut groups = self.write();
        if groups.values().any(|g| g.group_name == group.group_name) {
            return Err(AppError::Conflict(format!(
                "Response group '{}' already exists",
                group.group_name
            )));
        }
        groups.insert(group.id, group.clone());
        Ok(group)
    }

    /// Replace a stored group with an edited version carrying the same id.
    ///
    /// Fails with `NotFound` for unknown ids and `Conflict` when a rename
    /// collides with another group's name.
    pub fn replace(&self, group: ResponseGroup) -> Result<ResponseGroup, AppError> {
        let mut groups = self.write();
        if !groups.contains_key(&group.id) {
            return Err(AppError::NotFound("Response group not found".to_string()));
        }
        if groups
            .values()
            .any(|g| g.id != group.id && g.group_name == group.group_name)
        {
            return Err(AppError::Conflict(format!(
                "Response group '{}' already exists",
                group.group_name
            )));
        }
        groups.insert(group.id, group.clone());
        Ok(group)
    }

    /// Remove a group permanently. There is no soft delete.
    pub fn remove(&self, id: Uuid) -> Option<ResponseGroup> {
        self.write().remove(&id)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, ResponseGroup>> {
        self.groups.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, ResponseGroup>> {
        self.groups.write().unwrap_or_else(|e| e.into_inner())
    }
}
