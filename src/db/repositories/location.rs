use crate::entities::{locations, prelude::*};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use tracing::info;

/// Repository for geocoded locations. Unlike the per-location resource
/// caches, locations are keyed by the raw search string and never expire.
pub struct LocationRepository {
    conn: DatabaseConnection,
}

impl LocationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_query(&self, search_query: &str) -> Result<Option<locations::Model>> {
        let row = Locations::find()
            .filter(locations::Column::SearchQuery.eq(search_query))
            .one(&self.conn)
            .await?;
        Ok(row)
    }

    /// Insert a geocoded location, ignoring the insert when the search
    /// query already exists, and return the full stored row either way.
    pub async fn insert_or_get(
        &self,
        search_query: &str,
        formatted_query: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<locations::Model> {
        let active_model = locations::ActiveModel {
            search_query: Set(search_query.to_string()),
            formatted_query: Set(formatted_query.to_string()),
            latitude: Set(latitude),
            longitude: Set(longitude),
            ..Default::default()
        };

        let insert = Locations::insert(active_model)
            .on_conflict(
                OnConflict::column(locations::Column::SearchQuery)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.conn)
            .await;

        match insert {
            Ok(_) => info!("Stored location for query '{}'", search_query),
            // Conflicting search_query: another save already won, reuse its row.
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        self.find_by_query(search_query)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Location '{search_query}' missing after insert"))
    }
}
