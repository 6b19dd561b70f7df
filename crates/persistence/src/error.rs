// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested audit event was not found.
    EventNotFound(i64),
    /// The uniqueness constraint on active assignments rejected an
    /// insert: some active-duty assignment already covers the route for
    /// this user or another.
    ActiveAssignmentExists {
        /// The contested route.
        route_id: i64,
    },
    /// The uniqueness constraint on completed checkpoints rejected an
    /// insert: the checkpoint is already recorded for the assignment.
    DuplicateCompletion {
        /// The assignment.
        assignment_id: i64,
        /// The checkpoint.
        checkpoint_id: i64,
    },
    /// A guarded status update matched no row (the assignment was not in
    /// the expected status).
    UnexpectedAssignmentStatus {
        /// The assignment.
        assignment_id: i64,
    },
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::EventNotFound(id) => write!(f, "Event not found: {id}"),
            Self::ActiveAssignmentExists { route_id } => {
                write!(
                    f,
                    "An active assignment already exists for route {route_id}"
                )
            }
            Self::DuplicateCompletion {
                assignment_id,
                checkpoint_id,
            } => {
                write!(
                    f,
                    "Checkpoint {checkpoint_id} is already recorded for assignment {assignment_id}"
                )
            }
            Self::UnexpectedAssignmentStatus { assignment_id } => {
                write!(
                    f,
                    "Assignment {assignment_id} was not in the expected status"
                )
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
