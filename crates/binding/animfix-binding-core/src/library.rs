//! In-memory clip storage keyed by [`ClipId`].

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::clip::{AnimationClip, CurveStore};
use crate::error::ClipError;
use crate::ids::ClipId;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AnimationClip>", into = "Vec<AnimationClip>")]
pub struct ClipLibrary {
    clips: IndexMap<ClipId, AnimationClip>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a clip, returning the previous clip with that id.
    pub fn insert(&mut self, clip: AnimationClip) -> Option<AnimationClip> {
        self.clips.insert(clip.id().clone(), clip)
    }

    pub fn get(&self, id: &ClipId) -> Option<&AnimationClip> {
        self.clips.get(id)
    }

    pub fn get_mut(&mut self, id: &ClipId) -> Option<&mut AnimationClip> {
        self.clips.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ClipId> {
        self.clips.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimationClip> {
        self.clips.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AnimationClip> {
        self.clips.values_mut()
    }

    /// Fail on the first id that is not stored here.
    pub fn check(&self, ids: &IndexSet<ClipId>) -> Result<(), ClipError> {
        match ids.iter().find(|id| !self.clips.contains_key(*id)) {
            Some(id) => Err(ClipError::UnknownClip { clip: id.clone() }),
            None => Ok(()),
        }
    }

    /// Clips whose id is in `ids`, in library order. Unknown ids are skipped.
    pub fn select<'a>(
        &'a self,
        ids: &'a IndexSet<ClipId>,
    ) -> impl Iterator<Item = &'a AnimationClip> + 'a {
        self.clips.values().filter(move |c| ids.contains(c.id()))
    }

    pub fn select_mut<'a>(
        &'a mut self,
        ids: &'a IndexSet<ClipId>,
    ) -> impl Iterator<Item = &'a mut AnimationClip> + 'a {
        self.clips.values_mut().filter(move |c| ids.contains(c.id()))
    }
}

impl TryFrom<Vec<AnimationClip>> for ClipLibrary {
    type Error = ClipError;

    fn try_from(clips: Vec<AnimationClip>) -> Result<Self, Self::Error> {
        let mut lib = ClipLibrary::new();
        for clip in clips {
            let id = clip.id().clone();
            if lib.insert(clip).is_some() {
                return Err(ClipError::DuplicateClip { clip: id });
            }
        }
        Ok(lib)
    }
}

impl From<ClipLibrary> for Vec<AnimationClip> {
    fn from(lib: ClipLibrary) -> Self {
        lib.clips.into_values().collect()
    }
}

impl FromIterator<AnimationClip> for ClipLibrary {
    fn from_iter<T: IntoIterator<Item = AnimationClip>>(iter: T) -> Self {
        let mut lib = ClipLibrary::new();
        for clip in iter {
            lib.insert(clip);
        }
        lib
    }
}
