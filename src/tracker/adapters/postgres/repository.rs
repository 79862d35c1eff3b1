//! `PostgreSQL` repository implementations for issue and todo storage.

use super::{
    models::{IssueRow, IssueWriteRow, TodoRow, TodoWriteRow},
    schema::{issues, todos},
};
use crate::tracker::{
    domain::{
        Issue, IssueId, IssuePriority, IssueStatus, IssueType, PersistedIssueData,
        PersistedTodoData, Todo, TodoId, TodoStatus, WireValue,
    },
    ports::{
        IssueFilter, IssueRepository, Page, PageRequest, TodoFilter, TodoRepository,
        TrackerRepositoryError, TrackerRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by tracker adapters.
pub type TrackerPgPool = Pool<ConnectionManager<PgConnection>>;

async fn run_blocking<F, T>(pool: &TrackerPgPool, operation: F) -> TrackerRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> TrackerRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let shared_pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared_pool.get().map_err(TrackerRepositoryError::persistence)?;
        operation(&mut connection)
    })
    .await
    .map_err(TrackerRepositoryError::persistence)?
}

/// `PostgreSQL`-backed issue repository.
#[derive(Debug, Clone)]
pub struct PostgresIssueRepository {
    pool: TrackerPgPool,
}

impl PostgresIssueRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TrackerPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IssueRepository for PostgresIssueRepository {
    async fn store(&self, issue: &Issue) -> TrackerRepositoryResult<()> {
        let issue_id = issue.id();
        let row = to_issue_row(issue);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(issues::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TrackerRepositoryError::DuplicateIssue(issue_id)
                    }
                    _ => TrackerRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, issue: &Issue) -> TrackerRepositoryResult<()> {
        let issue_id = issue.id();
        let row = to_issue_row(issue);
        run_blocking(&self.pool, move |connection| {
            let updated_count = diesel::update(issues::table.find(issue_id.into_inner()))
                .set(&row)
                .execute(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(TrackerRepositoryError::IssueNotFound(issue_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: IssueId) -> TrackerRepositoryResult<Option<Issue>> {
        run_blocking(&self.pool, move |connection| {
            let row = issues::table
                .find(id.into_inner())
                .select(IssueRow::as_select())
                .first::<IssueRow>(connection)
                .optional()
                .map_err(TrackerRepositoryError::persistence)?;
            row.map(row_to_issue).transpose()
        })
        .await
    }

    async fn find_by_ids(&self, ids: &[IssueId]) -> TrackerRepositoryResult<Vec<Issue>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let lookup: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        run_blocking(&self.pool, move |connection| {
            issues::table
                .filter(issues::id.eq_any(lookup))
                .select(IssueRow::as_select())
                .load::<IssueRow>(connection)
                .map_err(TrackerRepositoryError::persistence)?
                .into_iter()
                .map(row_to_issue)
                .collect()
        })
        .await
    }

    async fn delete(&self, id: IssueId) -> TrackerRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let deleted = diesel::delete(issues::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TrackerRepositoryError::IssueNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_page(
        &self,
        filter: &IssueFilter,
        page: PageRequest,
    ) -> TrackerRepositoryResult<Page<Issue>> {
        let criteria = *filter;
        let (offset, limit) = window(page)?;
        run_blocking(&self.pool, move |connection| {
            let total = filtered_issues(&criteria)
                .count()
                .get_result::<i64>(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            let rows = filtered_issues(&criteria)
                .order((issues::created_at.desc(), issues::id.asc()))
                .offset(offset)
                .limit(limit)
                .select(IssueRow::as_select())
                .load::<IssueRow>(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            let items = rows
                .into_iter()
                .map(row_to_issue)
                .collect::<TrackerRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, count_to_total(total)?, page))
        })
        .await
    }
}

/// `PostgreSQL`-backed todo repository.
#[derive(Debug, Clone)]
pub struct PostgresTodoRepository {
    pool: TrackerPgPool,
}

impl PostgresTodoRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TrackerPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn store(&self, todo: &Todo) -> TrackerRepositoryResult<()> {
        let todo_id = todo.id();
        let row = to_todo_row(todo);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(todos::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TrackerRepositoryError::DuplicateTodo(todo_id)
                    }
                    _ => TrackerRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, todo: &Todo) -> TrackerRepositoryResult<()> {
        let todo_id = todo.id();
        let row = to_todo_row(todo);
        run_blocking(&self.pool, move |connection| {
            let updated_count = diesel::update(todos::table.find(todo_id.into_inner()))
                .set(&row)
                .execute(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(TrackerRepositoryError::TodoNotFound(todo_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TodoId) -> TrackerRepositoryResult<Option<Todo>> {
        run_blocking(&self.pool, move |connection| {
            let row = todos::table
                .find(id.into_inner())
                .select(TodoRow::as_select())
                .first::<TodoRow>(connection)
                .optional()
                .map_err(TrackerRepositoryError::persistence)?;
            row.map(row_to_todo).transpose()
        })
        .await
    }

    async fn delete(&self, id: TodoId) -> TrackerRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let deleted = diesel::delete(todos::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TrackerRepositoryError::TodoNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_by_originating_issue(&self, issue_id: IssueId) -> TrackerRepositoryResult<u64> {
        run_blocking(&self.pool, move |connection| {
            let deleted = diesel::delete(
                todos::table.filter(todos::originating_issue.eq(issue_id.into_inner())),
            )
            .execute(connection)
            .map_err(TrackerRepositoryError::persistence)?;
            u64::try_from(deleted).map_err(TrackerRepositoryError::persistence)
        })
        .await
    }

    async fn find_page(
        &self,
        filter: &TodoFilter,
        page: PageRequest,
    ) -> TrackerRepositoryResult<Page<Todo>> {
        let criteria = filter.clone();
        let (offset, limit) = window(page)?;
        run_blocking(&self.pool, move |connection| {
            let total = filtered_todos(&criteria)
                .count()
                .get_result::<i64>(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            let rows = filtered_todos(&criteria)
                .order((
                    todos::due_date.asc(),
                    todos::created_at.desc(),
                    todos::id.asc(),
                ))
                .offset(offset)
                .limit(limit)
                .select(TodoRow::as_select())
                .load::<TodoRow>(connection)
                .map_err(TrackerRepositoryError::persistence)?;
            let items = rows
                .into_iter()
                .map(row_to_todo)
                .collect::<TrackerRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, count_to_total(total)?, page))
        })
        .await
    }
}

fn filtered_issues(filter: &IssueFilter) -> issues::BoxedQuery<'static, Pg> {
    let mut query = issues::table.into_boxed();
    if let Some(issue_type) = filter.issue_type {
        query = query.filter(issues::issue_type.eq(issue_type.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(issues::status.eq(status.as_str()));
    }
    if let Some(priority) = filter.priority {
        query = query.filter(issues::priority.eq(priority.as_str()));
    }
    query
}

/// Builds the todo listing query. Status matches the status each row has at
/// `as_of`, so stored `pending` rows past their due date count as `late`.
fn filtered_todos(filter: &TodoFilter) -> todos::BoxedQuery<'static, Pg> {
    let mut query = todos::table.into_boxed();
    if let Some(assigned_to) = filter.assigned_to.clone() {
        query = query.filter(todos::assigned_to.eq(assigned_to));
    }
    if let Some(assigned_by) = filter.assigned_by.clone() {
        query = query.filter(todos::assigned_by.eq(assigned_by));
    }
    let as_of = filter.as_of;
    let pending = TodoStatus::Pending.as_str();
    query = match filter.status {
        None => query,
        Some(TodoStatus::Completed) => {
            query.filter(todos::status.eq(TodoStatus::Completed.as_str()))
        }
        Some(TodoStatus::Pending) => query.filter(
            todos::status
                .eq(pending)
                .and(todos::due_date.ge(as_of)),
        ),
        Some(TodoStatus::Late) => query.filter(
            todos::status.eq(TodoStatus::Late.as_str()).or(todos::status
                .eq(pending)
                .and(todos::due_date.lt(as_of))),
        ),
    };
    query
}

fn window(page: PageRequest) -> TrackerRepositoryResult<(i64, i64)> {
    let offset = i64::try_from(page.offset()).map_err(TrackerRepositoryError::persistence)?;
    Ok((offset, i64::from(page.limit())))
}

fn count_to_total(count: i64) -> TrackerRepositoryResult<u64> {
    u64::try_from(count).map_err(TrackerRepositoryError::persistence)
}

fn to_issue_row(issue: &Issue) -> IssueWriteRow {
    IssueWriteRow {
        id: issue.id().into_inner(),
        title: issue.title().to_owned(),
        description: issue.description().map(ToOwned::to_owned),
        priority: issue.priority().as_str().to_owned(),
        issue_type: issue.issue_type().as_str().to_owned(),
        status: issue.status().as_str().to_owned(),
        created_by: issue.created_by().to_owned(),
        created_at: issue.created_at(),
        updated_at: issue.updated_at(),
        resolved_at: issue.resolved_at(),
    }
}

fn row_to_issue(row: IssueRow) -> TrackerRepositoryResult<Issue> {
    let IssueRow {
        id,
        title,
        description,
        priority,
        issue_type,
        status,
        created_by,
        created_at,
        updated_at,
        resolved_at,
    } = row;

    let data = PersistedIssueData {
        id: IssueId::from_uuid(id),
        title,
        description,
        priority: IssuePriority::try_from(priority.as_str())
            .map_err(TrackerRepositoryError::invalid_persisted_data)?,
        issue_type: IssueType::try_from(issue_type.as_str())
            .map_err(TrackerRepositoryError::invalid_persisted_data)?,
        status: IssueStatus::try_from(status.as_str())
            .map_err(TrackerRepositoryError::invalid_persisted_data)?,
        created_by,
        created_at,
        updated_at,
        resolved_at,
    };
    Ok(Issue::from_persisted(data))
}

fn to_todo_row(todo: &Todo) -> TodoWriteRow {
    TodoWriteRow {
        id: todo.id().into_inner(),
        title: todo.title().to_owned(),
        description: todo.description().map(ToOwned::to_owned),
        assigned_to: todo.assigned_to().to_owned(),
        assigned_by: todo.assigned_by().to_owned(),
        due_date: todo.due_date(),
        status: todo.status().as_str().to_owned(),
        originating_issue: todo.originating_issue().into_inner(),
        completed_at: todo.completed_at(),
        created_at: todo.created_at(),
        updated_at: todo.updated_at(),
    }
}

fn row_to_todo(row: TodoRow) -> TrackerRepositoryResult<Todo> {
    let TodoRow {
        id,
        title,
        description,
        assigned_to,
        assigned_by,
        due_date,
        status,
        originating_issue,
        completed_at,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTodoData {
        id: TodoId::from_uuid(id),
        title,
        description,
        assigned_to,
        assigned_by,
        due_date,
        status: TodoStatus::try_from(status.as_str())
            .map_err(TrackerRepositoryError::invalid_persisted_data)?,
        originating_issue: IssueId::from_uuid(originating_issue),
        completed_at,
        created_at,
        updated_at,
    };
    Ok(Todo::from_persisted(data))
}
