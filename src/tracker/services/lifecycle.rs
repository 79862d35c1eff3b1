//! Orchestration of the issue and todo lifecycles.

use super::{
    error::{TrackerError, TrackerResult},
    requests::{ConvertIssueRequest, IssueListQuery, TodoListQuery},
};
use crate::tracker::{
    domain::{
        Issue, IssueId, IssuePatch, IssueSummary, IssueType, SYSTEM_ACTOR, Todo, TodoId,
        TodoPatch, TodoView,
    },
    ports::{
        DEFAULT_PAGE_LIMIT, IssueRepository, MAX_PAGE_LIMIT, Page, TodoRepository,
    },
};
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tracker service over trait-object repositories and the system clock.
pub type DynTrackerService = TrackerService<dyn IssueRepository, dyn TodoRepository, DefaultClock>;

/// Issue and todo lifecycle orchestration service.
///
/// Every write reads the current instant from the injected clock once and
/// hands it to the domain rules, so a single operation sees a single "now".
pub struct TrackerService<I: ?Sized, T: ?Sized, C: ?Sized> {
    issues: Arc<I>,
    todos: Arc<T>,
    clock: Arc<C>,
    default_limit: u32,
    max_limit: u32,
}

impl<I: ?Sized, T: ?Sized, C: ?Sized> Clone for TrackerService<I, T, C> {
    fn clone(&self) -> Self {
        Self {
            issues: Arc::clone(&self.issues),
            todos: Arc::clone(&self.todos),
            clock: Arc::clone(&self.clock),
            default_limit: self.default_limit,
            max_limit: self.max_limit,
        }
    }
}

impl<I, T, C> TrackerService<I, T, C>
where
    I: IssueRepository + ?Sized,
    T: TodoRepository + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    /// Creates a new tracker service with the default page limits.
    #[must_use]
    pub const fn new(issues: Arc<I>, todos: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            issues,
            todos,
            clock,
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
        }
    }

    /// Overrides the page size used when a listing omits `limit`, and the
    /// largest page size a listing may request.
    #[must_use]
    pub const fn with_page_limits(mut self, default_limit: u32, max_limit: u32) -> Self {
        self.default_limit = default_limit;
        self.max_limit = max_limit;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Lists issues, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] for malformed filters or paging,
    /// or [`TrackerError::Persistence`] when the lookup fails.
    pub async fn list_issues(&self, query: &IssueListQuery) -> TrackerResult<Page<Issue>> {
        let (filter, request) = query.resolve(self.default_limit, self.max_limit)?;
        let page = self.issues.find_page(&filter, request).await?;
        debug!(total = page.total(), page = request.page(), "listed issues");
        Ok(page)
    }

    /// Retrieves one issue.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::IssueNotFound`] when the issue does not exist.
    pub async fn get_issue(&self, id: IssueId) -> TrackerResult<Issue> {
        self.load_issue(id).await
    }

    /// Creates an issue. `createdBy` defaults to `system`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] listing every violated field, or
    /// [`TrackerError::Persistence`] when the store fails.
    pub async fn create_issue(&self, patch: IssuePatch) -> TrackerResult<Issue> {
        let issue = Issue::create(patch.or_created_by(SYSTEM_ACTOR), self.now())?;
        self.issues.store(&issue).await?;
        info!(issue_id = %issue.id(), issue_type = %issue.issue_type(), "created issue");
        Ok(issue)
    }

    /// Applies `patch` to an existing issue.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::IssueNotFound`], [`TrackerError::Validation`]
    /// or [`TrackerError::Persistence`].
    pub async fn update_issue(&self, id: IssueId, patch: IssuePatch) -> TrackerResult<Issue> {
        let mut issue = self.load_issue(id).await?;
        let was_resolved = issue.status().is_terminal();
        issue.apply_patch(patch, self.now())?;
        self.issues.update(&issue).await?;
        if !was_resolved && issue.status().is_terminal() {
            info!(issue_id = %id, "resolved issue");
        } else {
            debug!(issue_id = %id, "updated issue");
        }
        Ok(issue)
    }

    /// Deletes an issue and then every todo that originated from it.
    ///
    /// Returns the number of todos removed.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::IssueNotFound`] when the issue does not exist,
    /// in which case no todos are touched.
    pub async fn delete_issue(&self, id: IssueId) -> TrackerResult<u64> {
        self.issues.delete(id).await?;
        let removed = self.todos.delete_by_originating_issue(id).await?;
        info!(issue_id = %id, removed_todos = removed, "deleted issue");
        Ok(removed)
    }

    /// Moves an issue to the given planning horizon. Moving to the current
    /// horizon only refreshes `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::IssueNotFound`], [`TrackerError::Validation`]
    /// or [`TrackerError::Persistence`].
    pub async fn move_issue_type(&self, id: IssueId, issue_type: IssueType) -> TrackerResult<Issue> {
        let mut issue = self.load_issue(id).await?;
        issue.move_to(issue_type, self.now())?;
        self.issues.update(&issue).await?;
        info!(issue_id = %id, issue_type = %issue_type, "moved issue");
        Ok(issue)
    }

    /// Converts an issue into a todo and resolves the issue.
    ///
    /// Both records are validated before anything is written. The todo is
    /// stored first; if resolving the issue then fails, the todo is kept and
    /// reported through [`TrackerError::PartialWorkflow`].
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::IssueNotFound`], [`TrackerError::Validation`],
    /// [`TrackerError::Persistence`] or [`TrackerError::PartialWorkflow`].
    pub async fn convert_issue_to_todo(
        &self,
        id: IssueId,
        request: ConvertIssueRequest,
    ) -> TrackerResult<TodoView> {
        let issue = self.load_issue(id).await?;
        let now = self.now();
        let todo = Todo::create(request.into_todo_patch(&issue), now)?;
        let mut resolved = issue;
        resolved.resolve(now)?;

        self.todos.store(&todo).await?;
        if let Err(source) = self.issues.update(&resolved).await {
            warn!(
                issue_id = %id,
                todo_id = %todo.id(),
                error = %source,
                "todo created but issue could not be resolved"
            );
            return Err(TrackerError::PartialWorkflow {
                todo: Box::new(todo),
                issue_id: id,
                source,
            });
        }

        info!(issue_id = %id, todo_id = %todo.id(), "converted issue to todo");
        Ok(TodoView::new(todo, Some(IssueSummary::brief(&resolved))))
    }

    /// Lists todos, earliest due date first, with their originating issues.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] for malformed filters or paging,
    /// or [`TrackerError::Persistence`] when a lookup fails.
    pub async fn list_todos(&self, query: &TodoListQuery) -> TrackerResult<Page<TodoView>> {
        let now = self.now();
        let (filter, request) = query.resolve(now, self.default_limit, self.max_limit)?;
        let page = self.todos.find_page(&filter, request).await?;

        let mut issue_ids: Vec<IssueId> =
            page.items().iter().map(Todo::originating_issue).collect();
        issue_ids.sort_unstable();
        issue_ids.dedup();
        let summaries: HashMap<IssueId, IssueSummary> = self
            .issues
            .find_by_ids(&issue_ids)
            .await?
            .iter()
            .map(|issue| (issue.id(), IssueSummary::brief(issue)))
            .collect();

        debug!(total = page.total(), page = request.page(), "listed todos");
        Ok(page.map(|todo| {
            let summary = summaries.get(&todo.originating_issue()).cloned();
            TodoView::new(todo.observed_at(now), summary)
        }))
    }

    /// Retrieves one todo with a detailed summary of its originating issue.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::TodoNotFound`] when the todo does not exist.
    pub async fn get_todo(&self, id: TodoId) -> TrackerResult<TodoView> {
        let todo = self.load_todo(id).await?.observed_at(self.now());
        let summary = self
            .issues
            .find_by_id(todo.originating_issue())
            .await?
            .map(|issue| IssueSummary::detailed(&issue));
        Ok(TodoView::new(todo, summary))
    }

    /// Creates a todo. `assignedBy` defaults to `system`.
    ///
    /// The originating issue is not required to exist.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] listing every violated field, or
    /// [`TrackerError::Persistence`] when the store fails.
    pub async fn create_todo(&self, patch: TodoPatch) -> TrackerResult<TodoView> {
        let todo = Todo::create(patch.or_assigned_by(SYSTEM_ACTOR), self.now())?;
        self.todos.store(&todo).await?;
        info!(todo_id = %todo.id(), status = %todo.status(), "created todo");
        self.with_brief_summary(todo).await
    }

    /// Applies `patch` to an existing todo.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::TodoNotFound`], [`TrackerError::Validation`]
    /// or [`TrackerError::Persistence`].
    pub async fn update_todo(&self, id: TodoId, patch: TodoPatch) -> TrackerResult<TodoView> {
        let mut todo = self.load_todo(id).await?;
        todo.apply_patch(patch, self.now())?;
        self.todos.update(&todo).await?;
        debug!(todo_id = %id, status = %todo.status(), "updated todo");
        self.with_brief_summary(todo).await
    }

    /// Deletes a todo. The originating issue is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::TodoNotFound`] when the todo does not exist.
    pub async fn delete_todo(&self, id: TodoId) -> TrackerResult<()> {
        self.todos.delete(id).await?;
        info!(todo_id = %id, "deleted todo");
        Ok(())
    }

    /// Marks a todo completed. Completing twice keeps the first
    /// `completedAt`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::TodoNotFound`], [`TrackerError::Validation`]
    /// or [`TrackerError::Persistence`].
    pub async fn complete_todo(&self, id: TodoId) -> TrackerResult<TodoView> {
        let mut todo = self.load_todo(id).await?;
        todo.complete(self.now())?;
        self.todos.update(&todo).await?;
        info!(todo_id = %id, "completed todo");
        self.with_brief_summary(todo).await
    }

    async fn load_issue(&self, id: IssueId) -> TrackerResult<Issue> {
        self.issues
            .find_by_id(id)
            .await?
            .ok_or(TrackerError::IssueNotFound(id))
    }

    async fn load_todo(&self, id: TodoId) -> TrackerResult<Todo> {
        self.todos
            .find_by_id(id)
            .await?
            .ok_or(TrackerError::TodoNotFound(id))
    }

    async fn with_brief_summary(&self, todo: Todo) -> TrackerResult<TodoView> {
        let summary = self
            .issues
            .find_by_id(todo.originating_issue())
            .await?
            .map(|issue| IssueSummary::brief(&issue));
        Ok(TodoView::new(todo, summary))
    }
}
