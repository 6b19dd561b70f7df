// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MySQL/MariaDB backend validation tests.
//!
//! These tests are explicitly opt-in:
//!
//! 1. They are marked `#[ignore]` and never run under plain `cargo test`
//! 2. They require a `DATABASE_URL` environment variable pointing at a
//!    running `MySQL`/`MariaDB` server with an empty database
//! 3. Run them with `cargo test -p vigil-persistence -- --ignored`
//!
//! They verify the `MySQL` migrations, the generated-column uniqueness
//! constraints, and basic round trips — everything else is covered by the
//! standard `SQLite` tests, which exercise the same backend-agnostic
//! Diesel code.

use crate::Persistence;
use crate::error::PersistenceError;

use super::helpers::{assignment_creation, seed_world};

fn mysql_persistence() -> Persistence {
    let database_url: String =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for MySQL validation");
    Persistence::new_with_mysql(&database_url).expect("Failed to connect to MySQL")
}

#[test]
#[ignore = "requires a running MySQL/MariaDB server (set DATABASE_URL)"]
fn test_mysql_initialization_and_foreign_keys() {
    let mut persistence = mysql_persistence();
    persistence
        .verify_foreign_key_enforcement()
        .expect("Foreign key enforcement must be enabled");
}

#[test]
#[ignore = "requires a running MySQL/MariaDB server (set DATABASE_URL)"]
fn test_mysql_assignment_conflict_constraint() {
    let mut persistence = mysql_persistence();
    let world = seed_world(&mut persistence);

    persistence
        .create_assignment(&assignment_creation(&world))
        .expect("First assignment must succeed");

    // The generated-column unique key stands in for SQLite's partial
    // index; the second active assignment must be rejected.
    let mut second = assignment_creation(&world);
    second.assignment.user_id = world.user_id + 1000;
    let result = persistence.create_assignment(&second);

    assert!(matches!(
        result.unwrap_err(),
        PersistenceError::ActiveAssignmentExists { .. }
    ));
}

#[test]
#[ignore = "requires a running MySQL/MariaDB server (set DATABASE_URL)"]
fn test_mysql_checkpoint_round_trip() {
    let mut persistence = mysql_persistence();
    let world = seed_world(&mut persistence);

    let fetched = persistence
        .get_checkpoint(world.checkpoint_ids[0])
        .expect("Query must succeed")
        .expect("Checkpoint must exist");
    assert!(fetched.is_active);
}
