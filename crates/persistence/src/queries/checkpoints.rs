// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Checkpoint queries.

use crate::data_models::CheckpointRow;
use crate::diesel_schema::checkpoints;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// Looks up a checkpoint by id, active or not.
pub fn get_checkpoint(
    conn: &mut _,
    checkpoint_id: i64,
) -> Result<Option<CheckpointRow>, PersistenceError> {
    checkpoints::table
        .filter(checkpoints::checkpoint_id.eq(checkpoint_id))
        .first::<CheckpointRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_checkpoint: {e}")))
}

}

backend_fn! {

/// Returns which of the given checkpoint ids resolve to active
/// checkpoints.
pub fn get_active_checkpoint_ids(
    conn: &mut _,
    checkpoint_ids: &[i64],
) -> Result<Vec<i64>, PersistenceError> {
    checkpoints::table
        .filter(checkpoints::checkpoint_id.eq_any(checkpoint_ids))
        .filter(checkpoints::is_active.eq(1))
        .select(checkpoints::checkpoint_id)
        .load::<i64>(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("get_active_checkpoint_ids: {e}"))
        })
}

}

backend_fn! {

/// Lists active checkpoints for a station.
pub fn list_active_checkpoints_for_station(
    conn: &mut _,
    station_id: i64,
) -> Result<Vec<CheckpointRow>, PersistenceError> {
    checkpoints::table
        .filter(checkpoints::station_id.eq(station_id))
        .filter(checkpoints::is_active.eq(1))
        .order(checkpoints::checkpoint_id.asc())
        .load::<CheckpointRow>(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!(
                "list_active_checkpoints_for_station: {e}"
            ))
        })
}

}
