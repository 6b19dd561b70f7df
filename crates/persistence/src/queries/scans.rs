// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Checkpoint scan queries.

use crate::data_models::{ScanMediaRow, ScanRow};
use crate::diesel_schema::{checkpoint_scans, scan_media};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// Lists an assignment's scan rows in scan order.
pub fn list_scans_for_assignment(
    conn: &mut _,
    assignment_id: i64,
) -> Result<Vec<ScanRow>, PersistenceError> {
    checkpoint_scans::table
        .filter(checkpoint_scans::assignment_id.eq(assignment_id))
        .order(checkpoint_scans::scan_id.asc())
        .load::<ScanRow>(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("list_scans_for_assignment: {e}"))
        })
}

}

backend_fn! {

/// Lists the media rows attached to a scan.
pub fn list_media_for_scan(
    conn: &mut _,
    scan_id: i64,
) -> Result<Vec<ScanMediaRow>, PersistenceError> {
    scan_media::table
        .filter(scan_media::scan_id.eq(scan_id))
        .order(scan_media::id.asc())
        .load::<ScanMediaRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_media_for_scan: {e}")))
}

}
