use crate::config::Config;
use crate::error::{AtlasError, Result};
use crate::item::{Item, NewItem};
use crate::markdown;
use crate::paths;
use crate::score;
use crate::transition::{self, Transition};
use crate::types::{ItemType, Status, TypeFilter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// BacklogMetadata (the persisted document)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacklogMetadata {
    #[serde(default = "first_id")]
    pub next_feature_id: u32,
    #[serde(default = "first_id")]
    pub next_bug_id: u32,
    #[serde(default = "first_id")]
    pub next_tech_debt_id: u32,
    #[serde(default = "first_id")]
    pub next_epic_id: u32,
    #[serde(default)]
    pub features: Vec<Item>,
    #[serde(default)]
    pub bugs: Vec<Item>,
    #[serde(default)]
    pub tech_debt: Vec<Item>,
    #[serde(default)]
    pub epics: Vec<Item>,
}

fn first_id() -> u32 {
    1
}

impl Default for BacklogMetadata {
    fn default() -> Self {
        Self {
            next_feature_id: 1,
            next_bug_id: 1,
            next_tech_debt_id: 1,
            next_epic_id: 1,
            features: Vec::new(),
            bugs: Vec::new(),
            tech_debt: Vec::new(),
            epics: Vec::new(),
        }
    }
}

impl BacklogMetadata {
    pub fn items(&self, item_type: ItemType) -> &[Item] {
        match item_type {
            ItemType::Feature => &self.features,
            ItemType::Bug => &self.bugs,
            ItemType::TechDebt => &self.tech_debt,
            ItemType::Epic => &self.epics,
        }
    }

    fn items_mut(&mut self, item_type: ItemType) -> &mut Vec<Item> {
        match item_type {
            ItemType::Feature => &mut self.features,
            ItemType::Bug => &mut self.bugs,
            ItemType::TechDebt => &mut self.tech_debt,
            ItemType::Epic => &mut self.epics,
        }
    }

    fn counter_mut(&mut self, item_type: ItemType) -> &mut u32 {
        match item_type {
            ItemType::Feature => &mut self.next_feature_id,
            ItemType::Bug => &mut self.next_bug_id,
            ItemType::TechDebt => &mut self.next_tech_debt_id,
            ItemType::Epic => &mut self.next_epic_id,
        }
    }

    /// Hand out the next sequence number for `item_type`. Numbers are never
    /// reused, even if records are removed from the document by hand.
    fn next_sequence(&mut self, item_type: ItemType) -> Result<u32> {
        let counter = self.counter_mut(item_type);
        let seq = (*counter).max(1);
        *counter = seq
            .checked_add(1)
            .ok_or(AtlasError::IdsExhausted(item_type))?;
        Ok(seq)
    }

    /// All items in type order (features, bugs, tech debt, epics), each in
    /// insertion order.
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        ItemType::all().iter().flat_map(|t| self.items(*t).iter())
    }
}

// ---------------------------------------------------------------------------
// Ranked
// ---------------------------------------------------------------------------

/// An item paired with the score it had when the list was built.
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a> {
    pub score: u32,
    pub item: &'a Item,
}

// ---------------------------------------------------------------------------
// StatusChange
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub item_id: String,
    pub item_type: ItemType,
    pub old_status: Status,
    pub new_status: Status,
    pub file_renamed: bool,
    pub file_path: String,
    pub item: Item,
    /// Set when the status was saved but the artifact could not be rewritten.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// ---------------------------------------------------------------------------
// Backlog (the store)
// ---------------------------------------------------------------------------

/// Backlog store rooted at a project directory. One instance per invocation:
/// load, mutate, save.
#[derive(Debug, Clone)]
pub struct Backlog {
    root: PathBuf,
    config: Config,
    metadata: BacklogMetadata,
}

impl Backlog {
    /// Open the store under `root`, reading `.atlas/config.yaml` if present.
    pub fn open(root: &Path) -> Result<Self> {
        let config = Config::load(root)?;
        Self::open_with_config(root, config)
    }

    pub fn open_with_config(root: &Path, config: Config) -> Result<Self> {
        let path = paths::metadata_path(root);
        let metadata = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            BacklogMetadata::default()
        };
        Ok(Self {
            root: root.to_path_buf(),
            config,
            metadata,
        })
    }

    /// Build a store around an already-loaded document. Nothing is read from
    /// disk; [`Backlog::save`] still writes under `root`.
    pub fn from_parts(root: &Path, config: Config, metadata: BacklogMetadata) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            metadata,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn metadata(&self) -> &BacklogMetadata {
        &self.metadata
    }

    pub fn save(&self) -> Result<()> {
        let path = paths::metadata_path(&self.root);
        let data = serde_json::to_string_pretty(&self.metadata)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Create an item, write its markdown artifact and persist the document.
    pub fn create(&mut self, new: NewItem) -> Result<Item> {
        self.create_at(new, Utc::now())
    }

    pub fn create_at(&mut self, mut new: NewItem, now: DateTime<Utc>) -> Result<Item> {
        let item_type = new.item_type();
        new.title = new.title.trim().to_string();
        if new.title.is_empty() {
            new.title = item_type.untitled().to_string();
        }

        let seq = self.metadata.next_sequence(item_type)?;
        // IDs are zero-padded to four digits and widen past 9999.
        let id = format!("{}{:04}", item_type.prefix(), seq);
        let slug = paths::slugify(&new.title, self.config.slug_max_len);
        let file_path = paths::type_dir(&self.config.backlog_dir, item_type)
            .join(paths::artifact_file_name(&id, &slug))
            .to_string_lossy()
            .into_owned();

        let item = Item::new(id, new, file_path, now);
        let artifact = paths::resolve(&self.root, &item.file_path);
        if let Err(e) = markdown::write_artifact(&artifact, &item, score::score_at(&item, now)) {
            *self.metadata.counter_mut(item_type) = seq;
            return Err(e);
        }

        self.metadata.items_mut(item_type).push(item.clone());
        if let Err(e) = self.save() {
            // Leave neither a record nor an artifact behind.
            self.metadata.items_mut(item_type).pop();
            *self.metadata.counter_mut(item_type) = seq;
            if let Err(undo) = std::fs::remove_file(&artifact) {
                tracing::warn!(path = %artifact.display(), error = %undo, "could not remove artifact");
            }
            return Err(e);
        }
        tracing::debug!(id = %item.id, path = %item.file_path, "created backlog item");
        Ok(item)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get(&self, id: &str) -> Result<&Item> {
        let (item_type, index) = self.locate(id)?;
        Ok(&self.metadata.items(item_type)[index])
    }

    /// Items matching the filters, in insertion order.
    pub fn list(&self, filter: TypeFilter, status: Option<Status>) -> Vec<&Item> {
        self.metadata
            .all_items()
            .filter(|i| filter.matches(i.item_type()))
            .filter(|i| status.map_or(true, |s| i.status == s))
            .collect()
    }

    /// Items matching the filters, highest score first. Ties keep insertion
    /// order. Scores are computed fresh on every call.
    pub fn prioritized(&self, filter: TypeFilter, status: Option<Status>) -> Vec<Ranked<'_>> {
        self.prioritized_at(filter, status, Utc::now())
    }

    pub fn prioritized_at(
        &self,
        filter: TypeFilter,
        status: Option<Status>,
        now: DateTime<Utc>,
    ) -> Vec<Ranked<'_>> {
        let mut ranked: Vec<Ranked<'_>> = self
            .list(filter, status)
            .into_iter()
            .map(|item| Ranked {
                score: score::score_at(item, now),
                item,
            })
            .collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    // -----------------------------------------------------------------------
    // Status transitions
    // -----------------------------------------------------------------------

    pub fn update_status(&mut self, id: &str, target: Status) -> Result<StatusChange> {
        self.update_status_at(id, target, Utc::now())
    }

    /// Move an item to `target`: rename its artifact across the done
    /// boundary, stamp timestamps, persist, then regenerate the artifact
    /// from the updated record.
    ///
    /// An unknown ID changes nothing. If the document cannot be saved, the
    /// rename is undone so file name and stored status still agree. A failure
    /// to regenerate the artifact after a successful save is reported in
    /// [`StatusChange::warning`].
    pub fn update_status_at(
        &mut self,
        id: &str,
        target: Status,
        now: DateTime<Utc>,
    ) -> Result<StatusChange> {
        let (item_type, index) = self.locate(id)?;
        let previous = self.metadata.items(item_type)[index].clone();
        let planned: Transition = transition::plan(&previous, target);

        let from = paths::resolve(&self.root, &planned.old_file_path);
        let to = paths::resolve(&self.root, &planned.new_file_path);
        let mut moved = false;
        if planned.file_renamed() {
            moved = crate::io::rename_if_exists(&from, &to)?;
            if moved {
                tracing::debug!(from = %from.display(), to = %to.display(), "renamed artifact");
            } else {
                tracing::warn!(id, path = %planned.old_file_path, "artifact missing, rename skipped");
            }
        }

        let mut item = previous.clone();
        transition::apply(&mut item, &planned, now);
        self.metadata.items_mut(item_type)[index] = item.clone();
        if let Err(e) = self.save() {
            self.metadata.items_mut(item_type)[index] = previous;
            if moved {
                if let Err(undo) = std::fs::rename(&to, &from) {
                    tracing::error!(from = %to.display(), to = %from.display(), error = %undo, "could not undo artifact rename");
                }
            }
            return Err(e);
        }

        let warning = match markdown::write_artifact(&to, &item, score::score_at(&item, now)) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(id, path = %to.display(), error = %e, "artifact not regenerated");
                Some(format!("status saved, but artifact {} was not rewritten: {e}", item.file_path))
            }
        };

        Ok(StatusChange {
            item_id: item.id.clone(),
            item_type,
            old_status: planned.old_status,
            new_status: planned.new_status,
            file_renamed: planned.file_renamed(),
            file_path: item.file_path.clone(),
            item,
            warning,
        })
    }

    /// Find an item by ID, searching the list its prefix names first.
    fn locate(&self, id: &str) -> Result<(ItemType, usize)> {
        let hinted = ItemType::from_id(id);
        hinted
            .iter()
            .chain(ItemType::all().iter().filter(|t| Some(**t) != hinted))
            .find_map(|t| {
                self.metadata
                    .items(*t)
                    .iter()
                    .position(|i| i.id == id)
                    .map(|idx| (*t, idx))
            })
            .ok_or_else(|| AtlasError::ItemNotFound(id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
