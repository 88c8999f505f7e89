// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use examsched_domain::{ReferenceId, ReferenceKind};
use tracing::info;

use crate::diesel_schema::reference_entities;
use crate::error::PersistenceError;

/// Registers a reference entity, or renames it if already present.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_reference(
    conn: &mut SqliteConnection,
    kind: ReferenceKind,
    id: &ReferenceId,
    display_name: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_into(reference_entities::table)
        .values((
            reference_entities::kind.eq(kind.as_str()),
            reference_entities::reference_id.eq(id.value()),
            reference_entities::display_name.eq(display_name),
        ))
        .on_conflict((reference_entities::kind, reference_entities::reference_id))
        .do_update()
        .set(reference_entities::display_name.eq(display_name))
        .execute(conn)?;

    info!(kind = %kind, id = %id, display_name, "Registered reference");
    Ok(())
}

/// Removes a reference entity. Exams keep the identifier, which then reads
/// back unresolved.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_reference(
    conn: &mut SqliteConnection,
    kind: ReferenceKind,
    id: &ReferenceId,
) -> Result<bool, PersistenceError> {
    let deleted: usize = diesel::delete(
        reference_entities::table
            .filter(reference_entities::kind.eq(kind.as_str()))
            .filter(reference_entities::reference_id.eq(id.value())),
    )
    .execute(conn)?;

    info!(kind = %kind, id = %id, deleted, "Removed reference");
    Ok(deleted > 0)
}
