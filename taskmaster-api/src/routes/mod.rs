/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `tasks`: Owner-scoped task CRUD
/// - `user`: Profile and password self-service
/// - `team`: Flat team directory

pub mod auth;
pub mod health;
pub mod tasks;
pub mod team;
pub mod user;
