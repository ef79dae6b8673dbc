use rand::Rng;
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    ListAlbums,
    GetAlbum,
    CreateAlbum,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [
        TaskKind::ListAlbums,
        TaskKind::GetAlbum,
        TaskKind::CreateAlbum,
    ];

    #[must_use]
    pub const fn default_weight(self) -> u32 {
        match self {
            TaskKind::ListAlbums | TaskKind::GetAlbum => 3,
            TaskKind::CreateAlbum => 1,
        }
    }

    /// Request name used in logs and the summary table.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TaskKind::ListAlbums => "GET /albums",
            TaskKind::GetAlbum => "GET /albums/{id}",
            TaskKind::CreateAlbum => "POST /albums",
        }
    }
}

/// Relative task weights. A weight of zero disables the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TaskWeights {
    pub list_albums: u32,
    pub get_album: u32,
    pub create_album: u32,
}

impl Default for TaskWeights {
    fn default() -> Self {
        Self {
            list_albums: TaskKind::ListAlbums.default_weight(),
            get_album: TaskKind::GetAlbum.default_weight(),
            create_album: TaskKind::CreateAlbum.default_weight(),
        }
    }
}

impl TaskWeights {
    #[must_use]
    pub const fn weight(&self, kind: TaskKind) -> u32 {
        match kind {
            TaskKind::ListAlbums => self.list_albums,
            TaskKind::GetAlbum => self.get_album,
            TaskKind::CreateAlbum => self.create_album,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskSet {
    tasks: Vec<(TaskKind, u32)>,
    /// Summed as `u64` so three `u32::MAX` weights cannot overflow.
    index: WeightedIndex<u64>,
}

impl TaskSet {
    /// Registers every task with a non-zero weight.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has a positive weight.
    pub fn new(weights: &TaskWeights) -> Result<Self, ValidationError> {
        let tasks: Vec<(TaskKind, u32)> = TaskKind::ALL
            .iter()
            .map(|kind| (*kind, weights.weight(*kind)))
            .filter(|(_, weight)| *weight > 0)
            .collect();
        let index = WeightedIndex::new(tasks.iter().map(|(_, weight)| u64::from(*weight))).map_err(
            |err| match err {
                WeightedError::NoItem | WeightedError::AllWeightsZero => {
                    ValidationError::NoTasksEnabled
                }
                WeightedError::InvalidWeight | WeightedError::TooMany => {
                    ValidationError::InvalidTaskWeights {
                        message: err.to_string(),
                    }
                }
            },
        )?;
        Ok(Self { tasks, index })
    }

    #[must_use]
    pub fn tasks(&self) -> &[(TaskKind, u32)] {
        &self.tasks
    }

    #[must_use]
    pub fn weight(&self, kind: TaskKind) -> u32 {
        self.tasks
            .iter()
            .find(|(task, _)| *task == kind)
            .map_or(0, |(_, weight)| *weight)
    }

    /// Picks a task with probability proportional to its weight.
    pub fn pick<R>(&self, rng: &mut R) -> TaskKind
    where
        R: Rng + ?Sized,
    {
        let selected = self.index.sample(rng);
        self.tasks
            .get(selected)
            .map_or(TaskKind::ListAlbums, |(kind, _)| *kind)
    }
}

/// Ids that `GET /albums/{id}` chooses from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumIds(Vec<String>);

impl AlbumIds {
    /// # Errors
    ///
    /// Returns an error when the list is empty or contains a blank id.
    pub fn new(ids: Vec<String>) -> Result<Self, ValidationError> {
        if ids.is_empty() {
            return Err(ValidationError::AlbumIdsEmpty);
        }
        let mut trimmed = Vec::with_capacity(ids.len());
        for id in ids {
            let id = id.trim();
            if id.is_empty() {
                return Err(ValidationError::AlbumIdBlank);
            }
            trimmed.push(id.to_owned());
        }
        Ok(Self(trimmed))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Uniform choice over the configured ids.
    pub fn choose<R>(&self, rng: &mut R) -> &str
    where
        R: Rng + ?Sized,
    {
        self.0.choose(rng).map_or("1", String::as_str)
    }
}

impl Default for AlbumIds {
    fn default() -> Self {
        Self(vec!["1".to_owned(), "2".to_owned(), "3".to_owned()])
    }
}
