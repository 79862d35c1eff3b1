//! In-memory todo repository.

use super::{lock_poisoned, paginate};
use crate::tracker::{
    domain::{IssueId, Todo, TodoId},
    ports::{
        Page, PageRequest, TodoFilter, TodoRepository, TrackerRepositoryError,
        TrackerRepositoryResult,
    },
};
use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory todo repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    todos: Arc<RwLock<HashMap<TodoId, Todo>>>,
}

impl InMemoryTodoRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored todos.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn len(&self) -> TrackerRepositoryResult<usize> {
        Ok(self.todos.read().map_err(lock_poisoned)?.len())
    }

    /// Returns `true` when no todos are stored.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn is_empty(&self) -> TrackerRepositoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn store(&self, todo: &Todo) -> TrackerRepositoryResult<()> {
        let mut todos = self.todos.write().map_err(lock_poisoned)?;
        if todos.contains_key(&todo.id()) {
            return Err(TrackerRepositoryError::DuplicateTodo(todo.id()));
        }
        todos.insert(todo.id(), todo.clone());
        Ok(())
    }

    async fn update(&self, todo: &Todo) -> TrackerRepositoryResult<()> {
        let mut todos = self.todos.write().map_err(lock_poisoned)?;
        let stored = todos
            .get_mut(&todo.id())
            .ok_or(TrackerRepositoryError::TodoNotFound(todo.id()))?;
        stored.clone_from(todo);
        Ok(())
    }

    async fn find_by_id(&self, id: TodoId) -> TrackerRepositoryResult<Option<Todo>> {
        let todos = self.todos.read().map_err(lock_poisoned)?;
        Ok(todos.get(&id).cloned())
    }

    async fn delete(&self, id: TodoId) -> TrackerRepositoryResult<()> {
        let mut todos = self.todos.write().map_err(lock_poisoned)?;
        todos
            .remove(&id)
            .map(|_| ())
            .ok_or(TrackerRepositoryError::TodoNotFound(id))
    }

    async fn delete_by_originating_issue(&self, issue_id: IssueId) -> TrackerRepositoryResult<u64> {
        let mut todos = self.todos.write().map_err(lock_poisoned)?;
        let before = todos.len();
        todos.retain(|_, todo| todo.originating_issue() != issue_id);
        Ok((before - todos.len()) as u64)
    }

    async fn find_page(
        &self,
        filter: &TodoFilter,
        page: PageRequest,
    ) -> TrackerRepositoryResult<Page<Todo>> {
        let todos = self.todos.read().map_err(lock_poisoned)?;
        let mut matching: Vec<Todo> = todos
            .values()
            .filter(|todo| filter.matches(todo))
            .cloned()
            .collect();
        matching.sort_by_key(|todo| (todo.due_date(), Reverse(todo.created_at()), todo.id()));
        Ok(paginate(matching, page))
    }
}
