#![forbid(unsafe_code)]

//! Todo list state.
//!
//! Each helper builds a new `Vec` and hands it to `set`, so every observer
//! of the list (including nested subscribers over the items) is notified
//! once per call.

use std::fmt;

use tether_reactive::{Observable, Publisher, publisher};

/// One entry of the list. Both fields are independently observable.
#[derive(Clone)]
pub struct TodoItem {
    pub text: Publisher<String>,
    pub completed: Publisher<bool>,
}

impl TodoItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: publisher(text.into()),
            completed: publisher(false),
        }
    }

    /// An item that starts out completed.
    pub fn done(text: impl Into<String>) -> Self {
        let item = Self::new(text);
        item.completed.set(true);
        item
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }
}

impl fmt::Debug for TodoItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoItem")
            .field("text", &self.text.get())
            .field("completed", &self.completed.get())
            .finish()
    }
}

/// The shared list cell, threaded explicitly through every widget.
pub type TodoList = Publisher<Vec<TodoItem>>;

/// A list cell holding `items`.
pub fn todo_list(items: Vec<TodoItem>) -> TodoList {
    publisher(items)
}

/// Append a new, incomplete item.
pub fn add_item(text: impl Into<String>, list: &TodoList) {
    let mut items = list.get();
    items.push(TodoItem::new(text));
    tracing::debug!(message = "todo.add", len = items.len());
    list.set(items);
}

/// Remove the item at `index`. Out-of-range indices leave the list alone.
pub fn remove_item(index: usize, list: &TodoList) {
    let mut items = list.get();
    if index >= items.len() {
        tracing::debug!(message = "todo.remove.out_of_range", index, len = items.len());
        return;
    }
    items.remove(index);
    tracing::debug!(message = "todo.remove", index, len = items.len());
    list.set(items);
}

/// Drop every completed item, keeping the rest in order.
pub fn clear_completed(list: &TodoList) {
    let items: Vec<TodoItem> = list
        .get()
        .into_iter()
        .filter(|item| !item.is_completed())
        .collect();
    tracing::debug!(message = "todo.clear_completed", len = items.len());
    list.set(items);
}

/// Set every item's completion flag to `completed`.
pub fn set_all_completed(list: &TodoList, completed: bool) {
    for item in list.get() {
        item.completed.set(completed);
    }
}

/// Observable list of the items' completion flags.
pub fn completed_flags(list: &TodoList) -> Observable<Vec<Observable<bool>>> {
    list.map(|items| items.iter().map(|item| item.completed.observe()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(list: &TodoList) -> Vec<String> {
        list.with(|items| items.iter().map(|i| i.text.get()).collect())
    }

    #[test]
    fn add_appends_incomplete_item() {
        let list = todo_list(Vec::new());
        add_item("a", &list);
        add_item("b", &list);
        assert_eq!(texts(&list), ["a", "b"]);
        assert!(!list.with(|items| items[1].is_completed()));
        assert_eq!(list.version(), 2);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let list = todo_list(vec![TodoItem::new("a")]);
        let before = list.version();
        remove_item(3, &list);
        assert_eq!(list.version(), before);
        remove_item(0, &list);
        assert!(list.with(Vec::is_empty));
    }

    #[test]
    fn clear_completed_keeps_order() {
        let list = todo_list(vec![
            TodoItem::done("a"),
            TodoItem::new("b"),
            TodoItem::done("c"),
            TodoItem::new("d"),
        ]);
        clear_completed(&list);
        assert_eq!(texts(&list), ["b", "d"]);
    }

    #[test]
    fn set_all_completed_touches_every_item() {
        let list = todo_list(vec![TodoItem::new("a"), TodoItem::done("b")]);
        set_all_completed(&list, true);
        assert!(list.with(|items| items.iter().all(TodoItem::is_completed)));
        set_all_completed(&list, false);
        assert!(list.with(|items| items.iter().all(|i| !i.is_completed())));
    }

    #[test]
    fn completed_flags_share_item_identity() {
        let item = TodoItem::new("a");
        let list = todo_list(vec![item.clone()]);
        let flags = completed_flags(&list).get();
        assert_eq!(flags[0].id(), item.completed.id());
        item.completed.set(true);
        assert!(flags[0].get());
    }
}
