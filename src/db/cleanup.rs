use std::marker::PhantomData;

use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::TableEntity;

/// An explicit parent-to-child relation used by the orphan cleaners.
/// The child is reachable from the parent through a single foreign-key
/// column; there is no runtime association registry.
pub struct Association<P: TableEntity, C: TableEntity> {
    pub foreign_key: &'static str,
    _tables: PhantomData<fn() -> (P, C)>,
}

impl<P: TableEntity, C: TableEntity> Association<P, C> {
    pub const fn new(foreign_key: &'static str) -> Self {
        Self {
            foreign_key,
            _tables: PhantomData,
        }
    }

    /// Ids of parent rows whose child still exists but is soft-deleted.
    pub fn soft_deleted_query(&self) -> String {
        self.orphan_ids_query(&format!("{}.deleted = true", C::TABLE))
    }

    /// Ids of parent rows whose child row is gone entirely.
    pub fn hard_deleted_query(&self) -> String {
        self.orphan_ids_query(&format!("{}.id IS NULL", C::TABLE))
    }

    fn orphan_ids_query(&self, predicate: &str) -> String {
        format!(
            "SELECT {parent}.id FROM {parent} \
             LEFT JOIN {child} ON {child}.id = {parent}.{fk} \
             WHERE {predicate}",
            parent = P::TABLE,
            child = C::TABLE,
            fk = self.foreign_key,
            predicate = predicate,
        )
    }
}

/// Relations the maintenance tooling knows how to clean.
pub const PERMISSIONS_RESOURCE: Association<
    crate::models::permission::Permission,
    crate::models::resource::Resource,
> = Association::new("resource_id");

pub const PERMISSIONS_USER: Association<
    crate::models::permission::Permission,
    crate::models::user::User,
> = Association::new("user_id");

/// Delete parent rows whose associated child entity is soft deleted.
/// Returns the number of affected rows; in dry-run mode, the number of
/// rows that would have been deleted. `query` replaces the default id
/// selection when a call site needs a narrower predicate.
pub async fn cleanup_soft_deleted<P: TableEntity, C: TableEntity>(
    pool: &PgPool,
    association: &Association<P, C>,
    dry_run: bool,
    query: Option<String>,
) -> Result<u64, sqlx::Error> {
    let sql = query.unwrap_or_else(|| association.soft_deleted_query());
    delete_by_id_query::<P>(pool, &sql, dry_run).await
}

/// Delete parent rows whose associated child entity no longer exists.
pub async fn cleanup_hard_deleted<P: TableEntity, C: TableEntity>(
    pool: &PgPool,
    association: &Association<P, C>,
    dry_run: bool,
    query: Option<String>,
) -> Result<u64, sqlx::Error> {
    let sql = query.unwrap_or_else(|| association.hard_deleted_query());
    delete_by_id_query::<P>(pool, &sql, dry_run).await
}

/// What a cleanup pass does with the ids it selected.
#[derive(Debug, PartialEq, Eq)]
enum CleanupAction {
    /// Dry run: report the count, touch nothing.
    Report(u64),
    /// Nothing matched; no delete is issued.
    Skip,
    /// Delete exactly these parent rows.
    Delete(Vec<Uuid>),
}

fn resolve_cleanup_action(ids: Vec<Uuid>, dry_run: bool) -> CleanupAction {
    if dry_run {
        return CleanupAction::Report(ids.len() as u64);
    }
    if ids.is_empty() {
        return CleanupAction::Skip;
    }
    CleanupAction::Delete(ids)
}

async fn delete_by_id_query<P: TableEntity>(
    pool: &PgPool,
    id_query: &str,
    dry_run: bool,
) -> Result<u64, sqlx::Error> {
    let selected: Vec<Uuid> = sqlx::query_scalar(id_query).fetch_all(pool).await?;

    let ids = match resolve_cleanup_action(selected, dry_run) {
        CleanupAction::Report(count) => return Ok(count),
        CleanupAction::Skip => return Ok(0),
        CleanupAction::Delete(ids) => ids,
    };

    debug!(table = P::TABLE, count = ids.len(), "deleting orphan rows");

    let delete_sql = format!("DELETE FROM {} WHERE id = ANY($1)", P::TABLE);
    let result = sqlx::query(&delete_sql).bind(&ids).execute(pool).await?;

    Ok(result.rows_affected())
}

/// Extracts the entity name from a dotted association path, for call
/// sites that still address relations by name: text after the last dot.
pub fn model_name_from_association(association: &str) -> &str {
    association
        .rsplit_once('.')
        .map(|(_, name)| name)
        .unwrap_or(association)
}
