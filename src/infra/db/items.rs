use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        CreateItemParams, ItemsRepo, ItemsWriteRepo, RepoError, UpdateItemParams,
    },
    domain::items::ItemRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const ITEM_COLUMNS: &str = "id, image, company, item_name, original_price, current_price, \
     discount_percentage, return_period, delivery_date, rating_stars, rating_count, \
     created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    image: String,
    company: String,
    item_name: String,
    original_price: i64,
    current_price: i64,
    discount_percentage: i32,
    return_period: i32,
    delivery_date: String,
    rating_stars: f64,
    rating_count: i64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ItemRow> for ItemRecord {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            image: row.image,
            company: row.company,
            item_name: row.item_name,
            original_price: row.original_price,
            current_price: row.current_price,
            discount_percentage: row.discount_percentage,
            return_period: row.return_period,
            delivery_date: row.delivery_date,
            rating_stars: row.rating_stars,
            rating_count: row.rating_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ItemsRepo for PostgresRepositories {
    async fn list_all(&self) -> Result<Vec<ItemRecord>, RepoError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, ItemRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ItemRecord::from).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<ItemRecord>, RepoError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1");
        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(ItemRecord::from))
    }
}

#[async_trait]
impl ItemsWriteRepo for PostgresRepositories {
    async fn create_item(&self, params: CreateItemParams) -> Result<ItemRecord, RepoError> {
        let sql = format!(
            "INSERT INTO items (image, company, item_name, original_price, current_price, \
             discount_percentage, return_period, delivery_date, rating_stars, rating_count) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(params.image)
            .bind(params.company)
            .bind(params.item_name)
            .bind(params.original_price)
            .bind(params.current_price)
            .bind(params.discount_percentage)
            .bind(params.return_period)
            .bind(params.delivery_date)
            .bind(params.rating_stars)
            .bind(params.rating_count)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(ItemRecord::from(row))
    }

    async fn update_item(
        &self,
        id: Uuid,
        params: UpdateItemParams,
    ) -> Result<ItemRecord, RepoError> {
        // updated_at is always bumped; an empty patch is a valid touch.
        let mut qb = QueryBuilder::new("UPDATE items SET updated_at = now()");

        if let Some(image) = params.image {
            qb.push(", image = ");
            qb.push_bind(image);
        }
        if let Some(company) = params.company {
            qb.push(", company = ");
            qb.push_bind(company);
        }
        if let Some(item_name) = params.item_name {
            qb.push(", item_name = ");
            qb.push_bind(item_name);
        }
        if let Some(original_price) = params.original_price {
            qb.push(", original_price = ");
            qb.push_bind(original_price);
        }
        if let Some(current_price) = params.current_price {
            qb.push(", current_price = ");
            qb.push_bind(current_price);
        }
        if let Some(discount_percentage) = params.discount_percentage {
            qb.push(", discount_percentage = ");
            qb.push_bind(discount_percentage);
        }
        if let Some(return_period) = params.return_period {
            qb.push(", return_period = ");
            qb.push_bind(return_period);
        }
        if let Some(delivery_date) = params.delivery_date {
            qb.push(", delivery_date = ");
            qb.push_bind(delivery_date);
        }
        if let Some(rating_stars) = params.rating_stars {
            qb.push(", rating_stars = ");
            qb.push_bind(rating_stars);
        }
        if let Some(rating_count) = params.rating_count {
            qb.push(", rating_count = ");
            qb.push_bind(rating_count);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING ");
        qb.push(ITEM_COLUMNS);

        let row = qb
            .build_query_as::<ItemRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        Ok(ItemRecord::from(row))
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
