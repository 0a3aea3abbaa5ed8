//! Ordered, mutable collection of upload items.
//!
//! The queue owns the items exclusively; insertion order is submission order.
//! Items are addressed by stable id, never by position, so removal cannot
//! corrupt unrelated progress or error state.

use thiserror::Error;
use uuid::Uuid;

use crate::item::{FileHandle, ItemField, UploadItem};

/// Errors from queue operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// No item with the given id exists.
    #[error("item not found: {0}")]
    ItemNotFound(Uuid),

    /// The last remaining item cannot be removed.
    #[error("cannot remove the last remaining item")]
    LastItem,

    /// The field is not editable through `update_field`.
    #[error("field {0:?} is set through set_file, not update_field")]
    FieldNotEditable(ItemField),
}

/// Ordered queue of upload items.
///
/// Always holds at least one item: a fresh queue starts with one empty slot
/// and `remove` refuses to delete the last one.
#[derive(Debug)]
pub struct ItemQueue {
    items: Vec<UploadItem>,
}

impl ItemQueue {
    /// Creates a queue with a single empty item.
    pub fn new() -> Self {
        Self {
            items: vec![UploadItem::new()],
        }
    }

    /// Appends a new empty item in `Idle` status and returns its id.
    pub fn add(&mut self) -> Uuid {
        let item = UploadItem::new();
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Whether the item may be removed (always false for the last item).
    pub fn can_remove(&self, id: Uuid) -> bool {
        self.items.len() > 1 && self.items.iter().any(|i| i.id == id)
    }

    /// Removes the item with the given id.
    pub fn remove(&mut self, id: Uuid) -> Result<(), QueueError> {
        if self.items.len() == 1 {
            return Err(QueueError::LastItem);
        }
        let position = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(QueueError::ItemNotFound(id))?;
        self.items.remove(position);
        Ok(())
    }

    /// Updates a text field and clears exactly that field's error.
    pub fn update_field(
        &mut self,
        id: Uuid,
        field: ItemField,
        value: &str,
    ) -> Result<(), QueueError> {
        let item = self.get_mut(id)?;
        match field {
            ItemField::Title => item.title = value.to_string(),
            ItemField::Description => item.description = value.to_string(),
            ItemField::File => return Err(QueueError::FieldNotEditable(field)),
        }
        item.errors.remove(&field);
        Ok(())
    }

    /// Replaces the item's file, clearing its file error and prior progress.
    ///
    /// The caller is responsible for resetting the item's speed window so
    /// samples from the previous file do not survive the swap.
    pub fn set_file(&mut self, id: Uuid, file: FileHandle) -> Result<(), QueueError> {
        let item = self.get_mut(id)?;
        item.file = Some(file);
        item.errors.remove(&ItemField::File);
        item.progress = None;
        Ok(())
    }

    /// Returns the item with the given id.
    pub fn get(&self, id: Uuid) -> Result<&UploadItem, QueueError> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or(QueueError::ItemNotFound(id))
    }

    /// Returns a mutable reference to the item with the given id.
    pub fn get_mut(&mut self, id: Uuid) -> Result<&mut UploadItem, QueueError> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(QueueError::ItemNotFound(id))
    }

    /// All items in submission order.
    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    /// Mutable access for the orchestrator's status/progress updates.
    pub(crate) fn items_mut(&mut self) -> &mut [UploadItem] {
        &mut self.items
    }

    /// Ids of all items in submission order.
    pub fn ids(&self) -> Vec<Uuid> {
        self.items.iter().map(|i| i.id).collect()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: the queue keeps at least one item.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ItemQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemStatus;
    use std::path::PathBuf;

    fn file(name: &str) -> FileHandle {
        FileHandle {
            name: name.to_string(),
            path: PathBuf::from("/videos").join(name),
            size_bytes: 1024,
            mime_type: "video/mp4".to_string(),
        }
    }

    #[test]
    fn test_new_queue_has_one_idle_item() {
        let queue = ItemQueue::new();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.items()[0].status, ItemStatus::Idle);
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut queue = ItemQueue::new();
        let second = queue.add();
        let third = queue.add();
        assert_eq!(queue.ids()[1], second);
        assert_eq!(queue.ids()[2], third);
    }

    #[test]
    fn test_cannot_remove_last_item() {
        let mut queue = ItemQueue::new();
        let only = queue.ids()[0];
        assert!(!queue.can_remove(only));
        assert_eq!(queue.remove(only), Err(QueueError::LastItem));
    }

    #[test]
    fn test_can_remove_iff_more_than_one() {
        let mut queue = ItemQueue::new();
        let first = queue.ids()[0];
        let second = queue.add();
        assert!(queue.can_remove(first));
        assert!(queue.can_remove(second));

        queue.remove(second).unwrap();
        assert!(!queue.can_remove(first));
    }

    #[test]
    fn test_remove_preserves_sibling_identity() {
        let mut queue = ItemQueue::new();
        let first = queue.ids()[0];
        let second = queue.add();
        let third = queue.add();

        queue.remove(second).unwrap();
        assert_eq!(queue.ids(), vec![first, third]);
    }

    #[test]
    fn test_add_then_remove_round_trips() {
        let mut queue = ItemQueue::new();
        let before = queue.ids();
        let added = queue.add();
        queue.remove(added).unwrap();
        assert_eq!(queue.ids(), before);
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut queue = ItemQueue::new();
        queue.add();
        let unknown = Uuid::new_v4();
        assert_eq!(queue.remove(unknown), Err(QueueError::ItemNotFound(unknown)));
    }

    #[test]
    fn test_update_field_clears_only_that_error() {
        let mut queue = ItemQueue::new();
        let id = queue.ids()[0];
        {
            let item = queue.get_mut(id).unwrap();
            item.errors.insert(ItemField::Title, "Title is required".into());
            item.errors
                .insert(ItemField::Description, "Description is required".into());
        }

        queue.update_field(id, ItemField::Title, "Lesson 1").unwrap();

        let item = queue.get(id).unwrap();
        assert_eq!(item.title, "Lesson 1");
        assert!(!item.errors.contains_key(&ItemField::Title));
        assert!(item.errors.contains_key(&ItemField::Description));
    }

    #[test]
    fn test_file_field_not_editable_as_text() {
        let mut queue = ItemQueue::new();
        let id = queue.ids()[0];
        assert_eq!(
            queue.update_field(id, ItemField::File, "nope"),
            Err(QueueError::FieldNotEditable(ItemField::File))
        );
    }

    #[test]
    fn test_set_file_clears_file_error_and_progress() {
        let mut queue = ItemQueue::new();
        let id = queue.ids()[0];
        {
            let item = queue.get_mut(id).unwrap();
            item.errors
                .insert(ItemField::File, "A media file is required".into());
            item.progress = Some(crate::item::UploadProgress::from_bytes(10, 100));
        }

        queue.set_file(id, file("replacement.mp4")).unwrap();

        let item = queue.get(id).unwrap();
        assert_eq!(item.file.as_ref().unwrap().name, "replacement.mp4");
        assert!(!item.errors.contains_key(&ItemField::File));
        assert!(item.progress.is_none());
    }
}
