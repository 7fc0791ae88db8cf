use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::marker::PhantomData;
use std::time::Duration;

/// A provider-backed entity cached per location. Implementors name the
/// column holding the location foreign key and the fetch timestamp so a
/// single repository can serve every resource table.
pub trait CachedResource: EntityTrait {
    fn location_column() -> Self::Column;
    fn fetched_at_column() -> Self::Column;
}

macro_rules! cached_resource {
    ($entity:ty, $module:ident) => {
        impl CachedResource for $entity {
            fn location_column() -> Self::Column {
                crate::entities::$module::Column::LocationId
            }

            fn fetched_at_column() -> Self::Column {
                crate::entities::$module::Column::FetchedAt
            }
        }
    };
}

cached_resource!(crate::entities::weathers::Entity, weathers);
cached_resource!(crate::entities::events::Entity, events);
cached_resource!(crate::entities::movies::Entity, movies);
cached_resource!(crate::entities::yelps::Entity, yelps);

/// Cache-aside storage for one resource table: rows newer than the TTL
/// count as a hit, everything else is purged and refetched by the caller.
pub struct ResourceCache<E: CachedResource> {
    conn: DatabaseConnection,
    ttl: Duration,
    _entity: PhantomData<E>,
}

impl<E: CachedResource> ResourceCache<E> {
    #[must_use]
    pub const fn new(conn: DatabaseConnection, ttl: Duration) -> Self {
        Self {
            conn,
            ttl,
            _entity: PhantomData,
        }
    }

    fn cutoff(&self) -> String {
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::zero());
        (chrono::Utc::now() - ttl).to_rfc3339()
    }

    /// Rows cached for the location that are still within the TTL.
    /// Expired rows are deleted first (opportunistic cleanup; ideally a
    /// background sweep, but this keeps the table bounded).
    pub async fn fresh(&self, location_id: i32) -> Result<Vec<E::Model>> {
        let cutoff = self.cutoff();

        let _ = E::delete_many()
            .filter(E::location_column().eq(location_id))
            .filter(E::fetched_at_column().lt(cutoff.as_str()))
            .exec(&self.conn)
            .await;

        let rows = E::find()
            .filter(E::location_column().eq(location_id))
            .filter(E::fetched_at_column().gte(cutoff.as_str()))
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Swap the cached set for a location: delete whatever is stored,
    /// then insert the fresh rows. Repeated refreshes therefore never
    /// accumulate duplicates.
    pub async fn replace(&self, location_id: i32, rows: Vec<E::ActiveModel>) -> Result<()> {
        E::delete_many()
            .filter(E::location_column().eq(location_id))
            .exec(&self.conn)
            .await?;

        if rows.is_empty() {
            return Ok(());
        }

        E::insert_many(rows).exec(&self.conn).await?;
        Ok(())
    }
}
