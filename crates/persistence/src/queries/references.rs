// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use examsched_domain::{Reference, ReferenceId, ReferenceKind};
use tracing::debug;

use crate::diesel_schema::reference_entities;
use crate::error::PersistenceError;

/// Returns whether a reference of `kind` with identifier `id` is registered.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn reference_exists(
    conn: &mut SqliteConnection,
    kind: ReferenceKind,
    id: &ReferenceId,
) -> Result<bool, PersistenceError> {
    let exists: bool = diesel::select(diesel::dsl::exists(
        reference_entities::table
            .filter(reference_entities::kind.eq(kind.as_str()))
            .filter(reference_entities::reference_id.eq(id.value())),
    ))
    .get_result(conn)?;

    debug!(kind = %kind, id = %id, exists, "Checked reference");
    Ok(exists)
}

/// Resolves a stored identifier to a `Reference`.
///
/// Identifiers whose entity has since been removed stay unresolved.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn resolve_reference(
    conn: &mut SqliteConnection,
    kind: ReferenceKind,
    id: ReferenceId,
) -> Result<Reference, PersistenceError> {
    let display_name: Option<String> = reference_entities::table
        .filter(reference_entities::kind.eq(kind.as_str()))
        .filter(reference_entities::reference_id.eq(id.value()))
        .select(reference_entities::display_name)
        .first(conn)
        .optional()?;

    Ok(match display_name {
        Some(display_name) => Reference::Resolved { id, display_name },
        None => Reference::Unresolved { id },
    })
}

/// Lists every registered reference of `kind`, ordered by identifier.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_references(
    conn: &mut SqliteConnection,
    kind: ReferenceKind,
) -> Result<Vec<Reference>, PersistenceError> {
    let rows: Vec<(String, String)> = reference_entities::table
        .filter(reference_entities::kind.eq(kind.as_str()))
        .select((
            reference_entities::reference_id,
            reference_entities::display_name,
        ))
        .order(reference_entities::reference_id.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(id, display_name)| Reference::Resolved {
            id: ReferenceId::new(id),
            display_name,
        })
        .collect())
}
