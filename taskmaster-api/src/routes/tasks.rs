/// Owner-scoped task endpoints
///
/// - `GET /api/tasks` - List the caller's tasks, newest first
/// - `POST /api/tasks` - Create a task owned by the caller
/// - `PATCH /api/tasks/:id` - Partially update an owned task
/// - `DELETE /api/tasks/:id` - Delete an owned task
///
/// The owner is always the authenticated identity; client input never picks
/// it. Update and delete filter by `(id AND owner_id)`, so a task that
/// doesn't exist and a task owned by someone else produce the same 404.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use taskmaster_shared::{
    auth::middleware::AuthContext,
    models::{
        task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
        user::User,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create-task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    /// Due date, RFC 3339 or plain YYYY-MM-DD
    pub due_date: Option<String>,

    pub description: Option<String>,

    /// "high" | "medium" | "low" (default medium)
    pub priority: Option<String>,

    /// "pending" | "in-progress" | "completed" (default pending)
    pub status: Option<String>,

    pub assignee: Option<String>,
}

/// Partial-update request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,

    pub due_date: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
}

/// Task mutation response
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub message: String,
    pub task: Task,
}

/// Delete response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTaskResponse {
    pub message: String,
    pub task_id: Uuid,
}

/// Parses a due date from its wire form
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_due_date(value: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    if let Ok(date) = value.parse::<NaiveDate>() {
        let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        return Ok(DateTime::from_naive_utc_and_offset(midnight, Utc));
    }

    Err(ApiError::BadRequest(format!("Invalid due date: {}", value)))
}

fn parse_priority(value: &str) -> Result<TaskPriority, ApiError> {
    value
        .parse::<TaskPriority>()
        .map_err(ApiError::BadRequest)
}

fn parse_status(value: &str) -> Result<TaskStatus, ApiError> {
    value.parse::<TaskStatus>().map_err(ApiError::BadRequest)
}

/// List the caller's tasks, newest-created first
///
/// # Endpoint
///
/// ```text
/// GET /api/tasks
/// Authorization: Bearer <token>
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_owner(&state.db, auth.user_id).await?;
    Ok(Json(tasks))
}

/// Create a task owned by the caller
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "title": "Buy milk",
///   "dueDate": "2025-01-01",
///   "priority": "high"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing title, unparseable due date, or unknown
///   priority/status
/// - `401/403`: Authentication failures (handled by the authorizer layer)
///
/// On success a best-effort email notification is dispatched to the owner in
/// the background; its failure never affects the response, which has already
/// acknowledged the durably created task.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    req.validate()?;

    let due_date = match req.due_date.as_deref() {
        Some(raw) => parse_due_date(raw)?,
        None => return Err(ApiError::BadRequest("Due date is required".to_string())),
    };

    let priority = match req.priority.as_deref() {
        Some(raw) => parse_priority(raw)?,
        None => TaskPriority::default(),
    };

    let status = match req.status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => TaskStatus::default(),
    };

    let task = Task::create(
        &state.db,
        CreateTask {
            owner_id: auth.user_id,
            title: req.title,
            description: req.description,
            due_date,
            priority,
            status,
            assignee: req.assignee,
        },
    )
    .await?;

    // Fire-and-forget: the task is committed, the notification is a side
    // channel that must never fail or delay the response
    let notifier = state.notifier.clone();
    let db = state.db.clone();
    let owner_id = auth.user_id;
    let notify_task = task.clone();
    tokio::spawn(async move {
        match User::find_by_id(&db, owner_id).await {
            Ok(Some(owner)) => {
                if let Err(e) = notifier.task_created(&owner.email, &notify_task).await {
                    tracing::warn!(task_id = %notify_task.id, "Task-created notification failed: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(task_id = %notify_task.id, "Failed to load owner for notification: {}", e);
            }
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created".to_string(),
            task,
        }),
    ))
}

/// Partially update an owned task
///
/// # Endpoint
///
/// ```text
/// PATCH /api/tasks/:id
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "status": "completed" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Non-UUID id, bad status/priority/due date
/// - `404 Not Found`: No task with that id owned by the caller
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    req.validate()?;

    let update = UpdateTask {
        title: req.title,
        description: req.description.map(Some),
        due_date: req.due_date.as_deref().map(parse_due_date).transpose()?,
        priority: req.priority.as_deref().map(parse_priority).transpose()?,
        status: req.status.as_deref().map(parse_status).transpose()?,
        assignee: req.assignee.map(Some),
    };

    let task = Task::update(&state.db, id, auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskResponse {
        message: "Task updated".to_string(),
        task,
    }))
}

/// Delete an owned task
///
/// # Endpoint
///
/// ```text
/// DELETE /api/tasks/:id
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Non-UUID id
/// - `404 Not Found`: No task with that id owned by the caller
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    let deleted = Task::delete(&state.db, id, auth.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(DeleteTaskResponse {
        message: "Task deleted".to_string(),
        task_id: id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_due_date_rfc3339() {
        let parsed = parse_due_date("2025-01-01T12:30:00Z").unwrap();
        assert_eq!(parsed.timestamp(), 1735734600);
    }

    #[test]
    fn test_parse_due_date_plain_date() {
        let parsed = parse_due_date("2025-01-01").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_due_date_garbage() {
        assert!(parse_due_date("next tuesday").is_err());
        assert!(parse_due_date("").is_err());
    }

    #[test]
    fn test_parse_priority_and_status() {
        assert_eq!(parse_priority("high").unwrap(), TaskPriority::High);
        assert!(parse_priority("urgent").is_err());
        assert_eq!(parse_status("in-progress").unwrap(), TaskStatus::InProgress);
        assert!(parse_status("done").is_err());
    }
}
