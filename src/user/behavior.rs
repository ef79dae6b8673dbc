use rand::Rng;

use crate::albums::{Album, AlbumGenerator};
use crate::error::ValidationError;

use super::{AlbumIds, TaskKind, TaskSet, TaskWeights, UserProfile, WaitTime};

/// One concrete request a user is about to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    ListAlbums,
    GetAlbum { id: String },
    CreateAlbum { album: Album },
}

impl TaskAction {
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        match self {
            TaskAction::ListAlbums => TaskKind::ListAlbums,
            TaskAction::GetAlbum { .. } => TaskKind::GetAlbum,
            TaskAction::CreateAlbum { .. } => TaskKind::CreateAlbum,
        }
    }
}

/// Shared, immutable behavior definition. Every simulated user runs the same
/// definition with its own RNG.
#[derive(Debug, Clone)]
pub struct UserBehavior {
    profile: UserProfile,
    tasks: TaskSet,
    wait: WaitTime,
    album_ids: AlbumIds,
    generator: AlbumGenerator,
}

impl UserBehavior {
    /// # Errors
    ///
    /// Returns an error when no task has a positive weight.
    pub fn new(
        profile: UserProfile,
        weights: &TaskWeights,
        wait: WaitTime,
        album_ids: AlbumIds,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            profile,
            tasks: TaskSet::new(weights)?,
            wait,
            album_ids,
            generator: AlbumGenerator::new(profile.payload_style()),
        })
    }

    #[must_use]
    pub const fn profile(&self) -> UserProfile {
        self.profile
    }

    #[must_use]
    pub const fn tasks(&self) -> &TaskSet {
        &self.tasks
    }

    #[must_use]
    pub const fn wait(&self) -> WaitTime {
        self.wait
    }

    /// Picks the next task and fills in its random inputs.
    pub fn next_action<R>(&self, rng: &mut R) -> TaskAction
    where
        R: Rng + ?Sized,
    {
        match self.tasks.pick(rng) {
            TaskKind::ListAlbums => TaskAction::ListAlbums,
            TaskKind::GetAlbum => TaskAction::GetAlbum {
                id: self.album_ids.choose(rng).to_owned(),
            },
            TaskKind::CreateAlbum => TaskAction::CreateAlbum {
                album: self.generator.generate(rng),
            },
        }
    }
}
