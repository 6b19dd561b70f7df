// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Checkpoint administration mutations.
//!
//! Checkpoints are soft-deleted only: routes may keep referencing a
//! deactivated checkpoint, and scan history must stay resolvable.

use crate::backend::PersistenceBackend;
use crate::data_models::{NewCheckpoint, format_timestamp};
use crate::diesel_schema::checkpoints;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::OffsetDateTime;
use vigil_domain::Checkpoint;

backend_fn! {

/// Inserts a checkpoint and returns its assigned ID.
pub fn create_checkpoint(
    conn: &mut _,
    checkpoint: &Checkpoint,
) -> Result<i64, PersistenceError> {
    let record = NewCheckpoint {
        name: checkpoint.name.clone(),
        position: checkpoint.position.to_storage_string(),
        scan_radius_m: checkpoint.scan_radius_m,
        station_id: checkpoint.station_id,
        is_active: i32::from(checkpoint.is_active),
        created_at: format_timestamp(OffsetDateTime::now_utc())?,
    };
    diesel::insert_into(checkpoints::table)
        .values(&record)
        .execute(conn)?;
    conn.get_last_insert_rowid()
}

}

backend_fn! {

/// Updates a checkpoint's editable fields.
pub fn update_checkpoint(
    conn: &mut _,
    checkpoint_id: i64,
    checkpoint: &Checkpoint,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(
        checkpoints::table.filter(checkpoints::checkpoint_id.eq(checkpoint_id)),
    )
    .set((
        checkpoints::name.eq(checkpoint.name.clone()),
        checkpoints::position.eq(checkpoint.position.to_storage_string()),
        checkpoints::scan_radius_m.eq(checkpoint.scan_radius_m),
        checkpoints::is_active.eq(i32::from(checkpoint.is_active)),
    ))
    .execute(conn)?;
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Checkpoint {checkpoint_id}"
        )));
    }
    Ok(())
}

}

backend_fn! {

/// Flips a checkpoint's active flag off (soft delete).
pub fn deactivate_checkpoint(
    conn: &mut _,
    checkpoint_id: i64,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(
        checkpoints::table.filter(checkpoints::checkpoint_id.eq(checkpoint_id)),
    )
    .set(checkpoints::is_active.eq(0))
    .execute(conn)?;
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Checkpoint {checkpoint_id}"
        )));
    }
    Ok(())
}

}
