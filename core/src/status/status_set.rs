//! Enabled / disabled status id sets
//!
//! Every known status lives in exactly one of the two lists. The only
//! mutations move ids between lists, and they happen between ticks.

use std::collections::BTreeMap;

use hashbrown::HashSet;

use crate::observer::StatusId;

/// Which of the two lists an entry lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusList {
    Enabled,
    Disabled,
}

impl StatusList {
    pub fn other(self) -> Self {
        match self {
            StatusList::Enabled => StatusList::Disabled,
            StatusList::Disabled => StatusList::Enabled,
        }
    }
}

/// A status as shown in a settings listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub id: StatusId,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSet {
    enabled: BTreeMap<StatusId, String>,
    disabled: BTreeMap<StatusId, String>,
}

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a catalog of known statuses. Ids in `disabled_ids` start
    /// out disabled, everything else is monitored.
    pub fn from_catalog(
        catalog: impl IntoIterator<Item = (StatusId, String)>,
        disabled_ids: &[StatusId],
    ) -> Self {
        let disabled_ids: HashSet<StatusId> = disabled_ids.iter().copied().collect();
        let mut set = Self::new();
        for (id, name) in catalog {
            let list = if disabled_ids.contains(&id) {
                StatusList::Disabled
            } else {
                StatusList::Enabled
            };
            set.insert(id, name, list);
        }
        set
    }

    /// Add or move a status. Keeps the lists exclusive.
    pub fn insert(&mut self, id: StatusId, name: String, list: StatusList) {
        self.enabled.remove(&id);
        self.disabled.remove(&id);
        self.map_mut(list).insert(id, name);
    }

    pub fn len(&self) -> usize {
        self.enabled.len() + self.disabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty() && self.disabled.is_empty()
    }

    pub fn is_watched(&self, id: StatusId) -> bool {
        self.enabled.contains_key(&id)
    }

    pub fn list_of(&self, id: StatusId) -> Option<StatusList> {
        if self.enabled.contains_key(&id) {
            Some(StatusList::Enabled)
        } else if self.disabled.contains_key(&id) {
            Some(StatusList::Disabled)
        } else {
            None
        }
    }

    pub fn enabled(&self) -> impl Iterator<Item = (StatusId, &str)> {
        self.enabled.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn disabled(&self) -> impl Iterator<Item = (StatusId, &str)> {
        self.disabled.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// Lowest monitored id, if any
    pub fn first_enabled(&self) -> Option<StatusId> {
        self.enabled.keys().next().copied()
    }

    /// Ids to persist in the config file
    pub fn disabled_ids(&self) -> Vec<StatusId> {
        self.disabled.keys().copied().collect()
    }

    pub fn name(&self, id: StatusId) -> Option<&str> {
        self.enabled
            .get(&id)
            .or_else(|| self.disabled.get(&id))
            .map(String::as_str)
    }

    /// Move `id` to the other list. Returns the list it ended up in, or
    /// `None` when the id is unknown.
    pub fn swap(&mut self, id: StatusId) -> Option<StatusList> {
        let from = self.list_of(id)?;
        let to = from.other();
        let name = self.map_mut(from).remove(&id)?;
        self.map_mut(to).insert(id, name);
        tracing::debug!(id, list = ?to, "Status moved");
        Some(to)
    }

    /// Disable every status
    pub fn clear_enabled_list(&mut self) {
        let moved = std::mem::take(&mut self.enabled);
        self.disabled.extend(moved);
    }

    /// Monitor every status
    pub fn clear_disabled_list(&mut self) {
        let moved = std::mem::take(&mut self.disabled);
        self.enabled.extend(moved);
    }

    /// Entries of `list` for display: filtered by a case-insensitive match
    /// on name or id, one entry per distinct name (lowest id wins), sorted
    /// by name.
    pub fn visible_entries(&self, list: StatusList, filter: &str) -> Vec<StatusEntry> {
        let needle = filter.trim().to_lowercase();
        let mut seen_names: HashSet<&str> = HashSet::new();

        let mut entries: Vec<StatusEntry> = self
            .map(list)
            .iter()
            .filter(|&(id, name)| {
                needle.is_empty()
                    || name.to_lowercase().contains(&needle)
                    || id.to_string().contains(&needle)
            })
            .filter(|&(_, name)| seen_names.insert(name.as_str()))
            .map(|(id, name)| StatusEntry {
                id: *id,
                name: name.clone(),
            })
            .collect();

        entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        entries
    }

    fn map(&self, list: StatusList) -> &BTreeMap<StatusId, String> {
        match list {
            StatusList::Enabled => &self.enabled,
            StatusList::Disabled => &self.disabled,
        }
    }

    fn map_mut(&mut self, list: StatusList) -> &mut BTreeMap<StatusId, String> {
        match list {
            StatusList::Enabled => &mut self.enabled,
            StatusList::Disabled => &mut self.disabled,
        }
    }
}
