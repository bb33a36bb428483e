use crate::error::PrismError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Opaque identifier for a sample group. Ids are unique for the lifetime of
/// a partition and never reused, so a stale widget reference to a deleted
/// group can never address a group created later. The control sample name is
/// a display attribute, not the group's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(u64);

/// One partition member: a control sample plus the experimental samples
/// assigned to it, in assignment order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGroup {
    id: GroupId,
    control: String,
    experimental: Vec<String>,
}

impl SampleGroup {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn control(&self) -> &str {
        &self.control
    }

    pub fn experimental(&self) -> &[String] {
        &self.experimental
    }

    /// Consumes the group and yields every member name, control included.
    fn dissolve(self) -> impl Iterator<Item = String> {
        std::iter::once(self.control).chain(self.experimental)
    }
}

/// The authoritative grouping state. Every sample name lives in exactly one
/// place at all times: the unassigned pool, or exactly one group. Each
/// mutation is a move between those two owners, never a copy, which is what
/// keeps the no-duplicate-assignment invariant intact after arbitrarily many
/// operations and makes `delete_group` a lossless inverse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartitionManager {
    catalog_order: Vec<String>,
    pool: HashSet<String>,
    groups: Vec<SampleGroup>,
    group_id_counter: u64,
}

impl PartitionManager {
    /// Starts a fresh partition with every catalog name unassigned.
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let catalog_order: Vec<String> = names.into_iter().collect();
        let pool = catalog_order.iter().cloned().collect();
        Self {
            catalog_order,
            pool,
            groups: Vec::new(),
            group_id_counter: 0,
        }
    }

    /// Names currently unassigned, in catalog order. Selector widgets derive
    /// their options from this on every render instead of mirroring
    /// add/remove calls.
    pub fn pooled_names(&self) -> Vec<&str> {
        self.catalog_order
            .iter()
            .filter(|name| self.pool.contains(*name))
            .map(String::as_str)
            .collect()
    }

    pub fn is_pooled(&self, name: &str) -> bool {
        self.pool.contains(name)
    }

    /// Groups in creation order.
    pub fn groups(&self) -> &[SampleGroup] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&SampleGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Promotes a pooled sample to control of a new, empty group.
    pub fn create_group(&mut self, control: &str) -> Result<GroupId, PrismError> {
        if !self.pool.remove(control) {
            return Err(PrismError::InvalidSelection(format!(
                "'{control}' is not in the unassigned pool"
            )));
        }
        self.group_id_counter += 1;
        let id = GroupId(self.group_id_counter);
        self.groups.push(SampleGroup {
            id,
            control: control.to_string(),
            experimental: Vec::new(),
        });
        Ok(id)
    }

    /// Moves a pooled sample into a group's experimental set. Assignment
    /// order is user-visible and preserved.
    pub fn assign_sample(&mut self, id: GroupId, name: &str) -> Result<(), PrismError> {
        // Locate the group before touching the pool, so that a failure on
        // either precondition leaves the partition unchanged.
        let index = self.find_group(id)?;
        if !self.pool.remove(name) {
            return Err(PrismError::InvalidSelection(format!(
                "'{name}' is not in the unassigned pool"
            )));
        }
        self.groups[index].experimental.push(name.to_string());
        Ok(())
    }

    /// Removes a group and returns its control and all experimental names to
    /// the pool. Full inverse of the group's creation and assignments.
    pub fn delete_group(&mut self, id: GroupId) -> Result<(), PrismError> {
        let index = self.find_group(id)?;
        let group = self.groups.remove(index);
        self.pool.extend(group.dissolve());
        Ok(())
    }

    /// The submission gate: true exactly when nothing is left unassigned.
    pub fn is_complete(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn unassigned_count(&self) -> usize {
        self.pool.len()
    }

    fn find_group(&self, id: GroupId) -> Result<usize, PrismError> {
        self.groups
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| PrismError::NotFound(format!("no sample group with id {}", id.0)))
    }
}
