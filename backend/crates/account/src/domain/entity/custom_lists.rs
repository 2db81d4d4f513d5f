//! Custom Lists
//!
//! The owner's collection of game lists. Every operation here is pure and
//! returns a typed [`ListError`] instead of panicking or mutating on failure.

use chrono::{DateTime, Utc};
use kernel::id::ListId;
use thiserror::Error;

use crate::domain::entity::game_list::GameList;
use crate::domain::value_object::{
    game::{GameId, GameRef},
    list::{ListDescription, ListName},
};

/// Failure kinds of list operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("List not found")]
    NotFound,

    #[error("A list with this name already exists")]
    DuplicateName,

    #[error("Invalid list name: {0}")]
    InvalidName(String),

    #[error("Invalid list description: {0}")]
    InvalidDescription(String),
}

/// Validated input for a new list
#[derive(Debug, Clone)]
pub struct ListDraft {
    pub name: ListName,
    pub description: ListDescription,
    pub is_public: bool,
}

impl ListDraft {
    /// `is_public` defaults to `false`
    pub fn parse(
        name: &str,
        description: Option<&str>,
        is_public: Option<bool>,
    ) -> Result<Self, ListError> {
        let name = ListName::new(name).map_err(|e| ListError::InvalidName(e.message().into()))?;
        let description = description
            .map(ListDescription::new)
            .transpose()
            .map_err(|e| ListError::InvalidDescription(e.message().into()))?
            .unwrap_or_default();
        Ok(Self {
            name,
            description,
            is_public: is_public.unwrap_or(false),
        })
    }
}

/// Validated partial update of a list
#[derive(Debug, Clone, Default)]
pub struct ListChanges {
    pub name: Option<ListName>,
    pub description: Option<ListDescription>,
    pub is_public: Option<bool>,
}

impl ListChanges {
    pub fn parse(
        name: Option<&str>,
        description: Option<&str>,
        is_public: Option<bool>,
    ) -> Result<Self, ListError> {
        let name = name
            .map(ListName::new)
            .transpose()
            .map_err(|e| ListError::InvalidName(e.message().into()))?;
        let description = description
            .map(ListDescription::new)
            .transpose()
            .map_err(|e| ListError::InvalidDescription(e.message().into()))?;
        Ok(Self {
            name,
            description,
            is_public,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.is_public.is_none()
    }
}

/// Ordered lists of one owner
///
/// # Invariants
/// - No two lists share a case-insensitive name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomLists(Vec<GameList>);

impl CustomLists {
    /// Rebuild from stored lists (assumed to satisfy the invariants)
    pub fn from_db(lists: Vec<GameList>) -> Self {
        Self(lists)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameList> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, list_id: ListId) -> Result<&GameList, ListError> {
        self.0
            .iter()
            .find(|l| l.list_id == list_id)
            .ok_or(ListError::NotFound)
    }

    fn get_mut(&mut self, list_id: ListId) -> Result<&mut GameList, ListError> {
        self.0
            .iter_mut()
            .find(|l| l.list_id == list_id)
            .ok_or(ListError::NotFound)
    }

    fn name_taken(&self, name: &ListName, except: Option<ListId>) -> bool {
        self.0
            .iter()
            .filter(|l| Some(l.list_id) != except)
            .any(|l| l.name.same_as(name))
    }

    /// Append a new empty list
    pub fn create(&mut self, draft: ListDraft, now: DateTime<Utc>) -> Result<&GameList, ListError> {
        if self.name_taken(&draft.name, None) {
            return Err(ListError::DuplicateName);
        }
        self.0
            .push(GameList::new(draft.name, draft.description, draft.is_public, now));
        self.0.last().ok_or(ListError::NotFound)
    }

    /// Apply a partial update; any accepted call bumps `updated_at`
    pub fn update(
        &mut self,
        list_id: ListId,
        changes: ListChanges,
        now: DateTime<Utc>,
    ) -> Result<&GameList, ListError> {
        if let Some(name) = &changes.name {
            let current = &self.get(list_id)?.name;
            if !current.same_as(name) && self.name_taken(name, Some(list_id)) {
                return Err(ListError::DuplicateName);
            }
        }

        let list = self.get_mut(list_id)?;
        if let Some(name) = changes.name {
            list.name = name;
        }
        if let Some(description) = changes.description {
            list.description = description;
        }
        if let Some(is_public) = changes.is_public {
            list.is_public = is_public;
        }
        list.updated_at = now;
        Ok(list)
    }

    /// Remove a list irrevocably
    pub fn delete(&mut self, list_id: ListId) -> Result<GameList, ListError> {
        let index = self
            .0
            .iter()
            .position(|l| l.list_id == list_id)
            .ok_or(ListError::NotFound)?;
        Ok(self.0.remove(index))
    }

    /// Add a game; a duplicate is a silent no-op. The flag reports whether
    /// the list changed.
    pub fn add_game(
        &mut self,
        list_id: ListId,
        game: GameRef,
        now: DateTime<Utc>,
    ) -> Result<(&GameList, bool), ListError> {
        let list = self.get_mut(list_id)?;
        let added = list.add_game(game, now);
        Ok((list, added))
    }

    /// Remove a game; an absent entry is a silent no-op. The flag reports
    /// whether the list changed.
    pub fn remove_game(
        &mut self,
        list_id: ListId,
        game_id: GameId,
        now: DateTime<Utc>,
    ) -> Result<(&GameList, bool), ListError> {
        let list = self.get_mut(list_id)?;
        let removed = list.remove_game(game_id, now);
        Ok((list, removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::game::GameName;
    use chrono::Duration;

    fn draft(name: &str) -> ListDraft {
        ListDraft::parse(name, None, None).unwrap()
    }

    fn game(id: u64, name: &str) -> GameRef {
        GameRef {
            game_id: GameId::new(id),
            game_name: GameName::new(name).unwrap(),
            game_image: None,
        }
    }

    #[test]
    fn test_create_rejects_case_insensitive_duplicate() {
        let mut lists = CustomLists::default();
        let now = Utc::now();
        lists.create(draft("Backlog"), now).unwrap();
        assert_eq!(
            lists.create(draft("BACKLOG"), now).unwrap_err(),
            ListError::DuplicateName
        );
        assert_eq!(
            lists.create(draft("  backlog  "), now).unwrap_err(),
            ListError::DuplicateName
        );
        assert_eq!(lists.len(), 1);
    }

    #[test]
    fn test_draft_validation() {
        assert!(matches!(
            ListDraft::parse("   ", None, None),
            Err(ListError::InvalidName(_))
        ));
        assert!(matches!(
            ListDraft::parse("ok", Some(&"d".repeat(201)), None),
            Err(ListError::InvalidDescription(_))
        ));
        let d = ListDraft::parse("ok", Some("desc"), None).unwrap();
        assert!(!d.is_public);
        assert_eq!(d.description.as_str(), "desc");
    }

    #[test]
    fn test_rename_checks_other_lists_only() {
        let mut lists = CustomLists::default();
        let now = Utc::now();
        let a = lists.create(draft("Backlog"), now).unwrap().list_id;
        lists.create(draft("Favorites"), now).unwrap();

        // Changing only the case of its own name is fine
        let changes = ListChanges::parse(Some("BACKLOG"), None, None).unwrap();
        let renamed = lists.update(a, changes, now).unwrap();
        assert_eq!(renamed.name.as_str(), "BACKLOG");

        let changes = ListChanges::parse(Some("favorites"), None, None).unwrap();
        assert_eq!(
            lists.update(a, changes, now).unwrap_err(),
            ListError::DuplicateName
        );
        assert_eq!(lists.get(a).unwrap().name.as_str(), "BACKLOG");
    }

    #[test]
    fn test_update_bumps_updated_at() {
        let mut lists = CustomLists::default();
        let t0 = Utc::now();
        let id = lists.create(draft("Backlog"), t0).unwrap().list_id;
        let t1 = t0 + Duration::minutes(1);

        let changes = ListChanges::parse(None, None, Some(true)).unwrap();
        let list = lists.update(id, changes, t1).unwrap();
        assert!(list.is_public);
        assert_eq!(list.updated_at, t1);
        assert_eq!(list.created_at, t0);
    }

    #[test]
    fn test_missing_list_is_not_found() {
        let mut lists = CustomLists::default();
        let ghost = ListId::new();
        let now = Utc::now();
        assert_eq!(lists.get(ghost).unwrap_err(), ListError::NotFound);
        assert_eq!(lists.delete(ghost).unwrap_err(), ListError::NotFound);
        assert_eq!(
            lists.add_game(ghost, game(1, "Go"), now).unwrap_err(),
            ListError::NotFound
        );
        assert_eq!(
            lists
                .update(ghost, ListChanges::default(), now)
                .unwrap_err(),
            ListError::NotFound
        );
    }

    #[test]
    fn test_add_game_is_idempotent() {
        let mut lists = CustomLists::default();
        let t0 = Utc::now();
        let id = lists.create(draft("Backlog"), t0).unwrap().list_id;

        let t1 = t0 + Duration::seconds(1);
        let (_, added) = lists.add_game(id, game(42, "Chess"), t1).unwrap();
        assert!(added);

        let t2 = t0 + Duration::seconds(2);
        let (list, added) = lists.add_game(id, game(42, "Chess"), t2).unwrap();
        assert!(!added);
        assert_eq!(list.games.len(), 1);
        assert_eq!(list.updated_at, t1);
    }

    #[test]
    fn test_delete_removes_list() {
        let mut lists = CustomLists::default();
        let now = Utc::now();
        let id = lists.create(draft("Backlog"), now).unwrap().list_id;
        let deleted = lists.delete(id).unwrap();
        assert_eq!(deleted.name.as_str(), "Backlog");
        assert!(lists.is_empty());
        // Name is free again
        assert!(lists.create(draft("backlog"), now).is_ok());
    }
}
