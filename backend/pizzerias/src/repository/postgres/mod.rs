use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    domain::achievement::{ReviewHistoryEntry, UserAchievement},
    domain::dough_style::{CuisineStyleChange, DoughStyle, DoughStyleTag, TagStatus},
    domain::geo::{BoundingBox, Coordinates},
    domain::pizzeria::Pizzeria,
    domain::rating::PizzeriaRating,
    domain::saved::SavedPizzeria,
    domain::user::UserLocation,
    repository::errors::RepositoryError,
    usecase::contracts::{
        AchievementRepository, DoughStyleRepository, PizzeriaRepository, RatingRepository,
        SavedPizzeriaRepository, UserLocationRepository,
    },
};

const PIZZERIA_COLUMNS: &str = "id, name, address, city, state, postal_code, latitude, longitude, \
    verified, phone, website, opening_hours, cuisine_styles, photos, source, external_id, \
    created_by, created_at, updated_at";

const RATING_COLUMNS: &str =
    "id, pizzeria_id, user_id, overall, crust, review, photos, created_at, updated_at";

const TAG_COLUMNS: &str =
    "id, pizzeria_id, style, status, upvotes, downvotes, suggested_by, created_at";

#[derive(Clone)]
pub struct PostgresPizzeriaRepository {
    pool: PgPool,
}

impl PostgresPizzeriaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PizzeriaRepository for PostgresPizzeriaRepository {
    #[tracing::instrument(skip(self, pizzeria), fields(pizzeria_id = %pizzeria.id, external_id = ?pizzeria.external_id))]
    async fn create(&self, pizzeria: &Pizzeria) -> Result<(), RepositoryError> {
        tracing::debug!("creating pizzeria");

        sqlx::query(
            r#"
            INSERT INTO pizzerias (id, name, address, city, state, postal_code, latitude, longitude,
                                   verified, phone, website, opening_hours, cuisine_styles, photos,
                                   source, external_id, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(pizzeria.id)
        .bind(&pizzeria.name)
        .bind(&pizzeria.address)
        .bind(&pizzeria.city)
        .bind(&pizzeria.state)
        .bind(&pizzeria.postal_code)
        .bind(pizzeria.latitude)
        .bind(pizzeria.longitude)
        .bind(pizzeria.verified)
        .bind(&pizzeria.phone)
        .bind(&pizzeria.website)
        .bind(&pizzeria.opening_hours)
        .bind(&pizzeria.cuisine_styles)
        .bind(&pizzeria.photos)
        .bind(pizzeria.source)
        .bind(&pizzeria.external_id)
        .bind(pizzeria.created_by)
        .bind(pizzeria.created_at)
        .bind(pizzeria.updated_at)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        tracing::debug!(pizzeria_id = %pizzeria.id, "pizzeria created successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pizzeria>, RepositoryError> {
        tracing::debug!("finding pizzeria by id");

        let query = format!("SELECT {PIZZERIA_COLUMNS} FROM pizzerias WHERE id = $1");
        let pizzeria = sqlx::query_as::<_, Pizzeria>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(pizzeria)
    }

    #[tracing::instrument(skip(self, bounds), fields(lat = center.latitude, lng = center.longitude, limit))]
    async fn find_in_bounds(
        &self,
        bounds: &BoundingBox,
        center: Coordinates,
        limit: i64,
    ) -> Result<Vec<Pizzeria>, RepositoryError> {
        tracing::debug!("finding pizzerias in bounding box");

        // Equirectangular distance is enough to rank rows nearest first
        let query = format!(
            r#"
            SELECT {PIZZERIA_COLUMNS}
            FROM pizzerias
            WHERE latitude BETWEEN $1 AND $2
              AND longitude BETWEEN $3 AND $4
            ORDER BY power(latitude - $5, 2)
                   + power((longitude - $6) * cos(radians($5)), 2)
            LIMIT $7
            "#
        );
        let pizzerias = sqlx::query_as::<_, Pizzeria>(&query)
            .bind(bounds.min_latitude)
            .bind(bounds.max_latitude)
            .bind(bounds.min_longitude)
            .bind(bounds.max_longitude)
            .bind(center.latitude)
            .bind(center.longitude)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = pizzerias.len(), "found pizzerias in bounding box");
        Ok(pizzerias)
    }
}

#[derive(Clone)]
pub struct PostgresRatingRepository {
    pool: PgPool,
}

impl PostgresRatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RatingRepository for PostgresRatingRepository {
    #[tracing::instrument(skip(self, rating), fields(pizzeria_id = %rating.pizzeria_id, user_id = %rating.user_id, overall = rating.overall, crust = rating.crust))]
    async fn upsert(&self, rating: &PizzeriaRating) -> Result<PizzeriaRating, RepositoryError> {
        tracing::debug!("upserting pizzeria rating");

        let query = format!(
            r#"
            INSERT INTO pizzeria_ratings (id, pizzeria_id, user_id, overall, crust, review, photos, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (pizzeria_id, user_id)
            DO UPDATE SET overall = EXCLUDED.overall,
                          crust = EXCLUDED.crust,
                          review = EXCLUDED.review,
                          photos = EXCLUDED.photos,
                          updated_at = EXCLUDED.updated_at
            RETURNING {RATING_COLUMNS}
            "#
        );
        let stored = sqlx::query_as::<_, PizzeriaRating>(&query)
            .bind(rating.id)
            .bind(rating.pizzeria_id)
            .bind(rating.user_id)
            .bind(rating.overall)
            .bind(rating.crust)
            .bind(&rating.review)
            .bind(&rating.photos)
            .bind(rating.created_at)
            .bind(rating.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(rating_id = %stored.id, "pizzeria rating upserted successfully");
        Ok(stored)
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id, user_id = %user_id))]
    async fn delete_by_pizzeria_and_user(
        &self,
        pizzeria_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), RepositoryError> {
        tracing::debug!("deleting pizzeria rating");

        let result = sqlx::query(
            r#"
            DELETE FROM pizzeria_ratings
            WHERE pizzeria_id = $1 AND user_id = $2
            "#,
        )
        .bind(pizzeria_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::debug!("pizzeria rating deleted successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id, user_id = %user_id))]
    async fn find_by_pizzeria_and_user(
        &self,
        pizzeria_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<PizzeriaRating>, RepositoryError> {
        tracing::debug!("finding pizzeria rating by pizzeria and user");

        let query = format!(
            "SELECT {RATING_COLUMNS} FROM pizzeria_ratings WHERE pizzeria_id = $1 AND user_id = $2"
        );
        let rating = sqlx::query_as::<_, PizzeriaRating>(&query)
            .bind(pizzeria_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(rating)
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id, limit, offset))]
    async fn find_by_pizzeria_id(
        &self,
        pizzeria_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PizzeriaRating>, RepositoryError> {
        tracing::debug!("finding ratings by pizzeria");

        let query = format!(
            r#"
            SELECT {RATING_COLUMNS}
            FROM pizzeria_ratings
            WHERE pizzeria_id = $1
            ORDER BY updated_at DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let ratings = sqlx::query_as::<_, PizzeriaRating>(&query)
            .bind(pizzeria_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = ratings.len(), "found ratings");
        Ok(ratings)
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id))]
    async fn get_aggregate(&self, pizzeria_id: Uuid) -> Result<(f64, f64, i64), RepositoryError> {
        tracing::debug!("getting rating aggregate");

        let result: (Option<f64>, Option<f64>, i64) = sqlx::query_as(
            r#"
            SELECT AVG(overall::float8), AVG(crust::float8), COUNT(*)
            FROM pizzeria_ratings
            WHERE pizzeria_id = $1
            "#,
        )
        .bind(pizzeria_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let (overall, crust, count) = (result.0.unwrap_or(0.0), result.1.unwrap_or(0.0), result.2);
        tracing::debug!(overall, crust, count, "rating aggregate retrieved");
        Ok((overall, crust, count))
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn find_history_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ReviewHistoryEntry>, RepositoryError> {
        tracing::debug!("loading review history");

        let history = sqlx::query_as::<_, ReviewHistoryEntry>(
            r#"
            SELECT r.pizzeria_id,
                   COALESCE(cardinality(r.photos), 0) > 0 AS has_photos,
                   p.cuisine_styles,
                   p.latitude,
                   p.longitude,
                   r.created_at AS reviewed_at
            FROM pizzeria_ratings r
            JOIN pizzerias p ON p.id = r.pizzeria_id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = history.len(), "review history loaded");
        Ok(history)
    }
}

#[derive(Clone)]
pub struct PostgresDoughStyleRepository {
    pool: PgPool,
}

impl PostgresDoughStyleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DoughStyleRepository for PostgresDoughStyleRepository {
    #[tracing::instrument(skip(self), fields(tag_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DoughStyleTag>, RepositoryError> {
        let query = format!("SELECT {TAG_COLUMNS} FROM dough_style_tags WHERE id = $1");
        let tag = sqlx::query_as::<_, DoughStyleTag>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(tag)
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id, style = %style))]
    async fn find_by_pizzeria_and_style(
        &self,
        pizzeria_id: Uuid,
        style: DoughStyle,
    ) -> Result<Option<DoughStyleTag>, RepositoryError> {
        let query = format!(
            "SELECT {TAG_COLUMNS} FROM dough_style_tags WHERE pizzeria_id = $1 AND style = $2"
        );
        let tag = sqlx::query_as::<_, DoughStyleTag>(&query)
            .bind(pizzeria_id)
            .bind(style)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(tag)
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id, status = ?status))]
    async fn find_by_pizzeria_and_status(
        &self,
        pizzeria_id: Uuid,
        status: TagStatus,
    ) -> Result<Vec<DoughStyleTag>, RepositoryError> {
        let query = format!(
            r#"
            SELECT {TAG_COLUMNS}
            FROM dough_style_tags
            WHERE pizzeria_id = $1 AND status = $2
            ORDER BY upvotes - downvotes DESC, created_at ASC
            "#
        );
        let tags = sqlx::query_as::<_, DoughStyleTag>(&query)
            .bind(pizzeria_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = tags.len(), "found dough style tags");
        Ok(tags)
    }

    #[tracing::instrument(skip(self, tag), fields(tag_id = %tag.id, pizzeria_id = %tag.pizzeria_id))]
    async fn create(&self, tag: &DoughStyleTag) -> Result<(), RepositoryError> {
        tracing::debug!("creating dough style tag");

        sqlx::query(
            r#"
            INSERT INTO dough_style_tags (id, pizzeria_id, style, status, upvotes, downvotes, suggested_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(tag.id)
        .bind(tag.pizzeria_id)
        .bind(tag.style)
        .bind(tag.status)
        .bind(tag.upvotes)
        .bind(tag.downvotes)
        .bind(tag.suggested_by)
        .bind(tag.created_at)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(tag_id = %id, upvote))]
    async fn record_vote(&self, id: Uuid, upvote: bool) -> Result<DoughStyleTag, RepositoryError> {
        tracing::debug!("recording dough style vote");

        let query = format!(
            r#"
            UPDATE dough_style_tags
            SET upvotes = upvotes + CASE WHEN $2 THEN 1 ELSE 0 END,
                downvotes = downvotes + CASE WHEN $2 THEN 0 ELSE 1 END
            WHERE id = $1
            RETURNING {TAG_COLUMNS}
            "#
        );
        let tag = sqlx::query_as::<_, DoughStyleTag>(&query)
            .bind(id)
            .bind(upvote)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tag.ok_or(RepositoryError::NotFound)
    }

    #[tracing::instrument(skip(self, tag), fields(tag_id = %tag.id, pizzeria_id = %tag.pizzeria_id, status = ?status, change = ?change))]
    async fn moderate(
        &self,
        tag: &DoughStyleTag,
        status: TagStatus,
        change: Option<CuisineStyleChange>,
    ) -> Result<DoughStyleTag, RepositoryError> {
        tracing::debug!("moderating dough style tag");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let query = format!(
            r#"
            UPDATE dough_style_tags
            SET status = $2
            WHERE id = $1 AND status = $3
            RETURNING {TAG_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, DoughStyleTag>(&query)
            .bind(tag.id)
            .bind(status)
            .bind(tag.status)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .ok_or_else(|| {
                RepositoryError::Conflict("Style tag was modified concurrently".to_string())
            })?;

        let style_update = match change {
            Some(CuisineStyleChange::Add(style)) => Some((
                style,
                r#"
                UPDATE pizzerias
                SET cuisine_styles = array_append(cuisine_styles, $2), updated_at = NOW()
                WHERE id = $1 AND NOT ($2 = ANY(cuisine_styles))
                "#,
            )),
            Some(CuisineStyleChange::Remove(style)) => Some((
                style,
                r#"
                UPDATE pizzerias
                SET cuisine_styles = array_remove(cuisine_styles, $2), updated_at = NOW()
                WHERE id = $1 AND $2 = ANY(cuisine_styles)
                "#,
            )),
            None => None,
        };
        if let Some((style, statement)) = style_update {
            sqlx::query(statement)
                .bind(tag.pizzeria_id)
                .bind(style.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!("dough style tag moderated successfully");
        Ok(updated)
    }
}

#[derive(Clone)]
pub struct PostgresSavedPizzeriaRepository {
    pool: PgPool,
}

impl PostgresSavedPizzeriaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SavedPizzeriaRepository for PostgresSavedPizzeriaRepository {
    #[tracing::instrument(skip(self, saved), fields(user_id = %saved.user_id, pizzeria_id = %saved.pizzeria_id))]
    async fn create(&self, saved: &SavedPizzeria) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO saved_pizzerias (user_id, pizzeria_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, pizzeria_id) DO NOTHING
            "#,
        )
        .bind(saved.user_id)
        .bind(saved.pizzeria_id)
        .bind(saved.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, pizzeria_id = %pizzeria_id))]
    async fn delete(&self, user_id: Uuid, pizzeria_id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM saved_pizzerias WHERE user_id = $1 AND pizzeria_id = $2",
        )
        .bind(user_id)
        .bind(pizzeria_id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, pizzeria_id = %pizzeria_id))]
    async fn exists(&self, user_id: Uuid, pizzeria_id: Uuid) -> Result<bool, RepositoryError> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(SELECT 1 FROM saved_pizzerias WHERE user_id = $1 AND pizzeria_id = $2)
            "#,
        )
        .bind(user_id)
        .bind(pizzeria_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(exists.0)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn find_pizzerias_by_user(&self, user_id: Uuid) -> Result<Vec<Pizzeria>, RepositoryError> {
        tracing::debug!("finding saved pizzerias");

        let pizzerias = sqlx::query_as::<_, Pizzeria>(
            r#"
            SELECT p.id, p.name, p.address, p.city, p.state, p.postal_code, p.latitude, p.longitude,
                   p.verified, p.phone, p.website, p.opening_hours, p.cuisine_styles, p.photos,
                   p.source, p.external_id, p.created_by, p.created_at, p.updated_at
            FROM saved_pizzerias s
            JOIN pizzerias p ON p.id = s.pizzeria_id
            WHERE s.user_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = pizzerias.len(), "found saved pizzerias");
        Ok(pizzerias)
    }
}

#[derive(Clone)]
pub struct PostgresAchievementRepository {
    pool: PgPool,
}

impl PostgresAchievementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AchievementRepository for PostgresAchievementRepository {
    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<UserAchievement>, RepositoryError> {
        let achievements = sqlx::query_as::<_, UserAchievement>(
            r#"
            SELECT id, user_id, achievement_type, earned_at
            FROM user_achievements
            WHERE user_id = $1
            ORDER BY earned_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(achievements)
    }

    #[tracing::instrument(skip(self, achievement), fields(user_id = %achievement.user_id, achievement = %achievement.achievement_type))]
    async fn create(&self, achievement: &UserAchievement) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_achievements (id, user_id, achievement_type, earned_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, achievement_type) DO NOTHING
            "#,
        )
        .bind(achievement.id)
        .bind(achievement.user_id)
        .bind(achievement.achievement_type)
        .bind(achievement.earned_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }
}

#[derive(Clone)]
pub struct PostgresUserLocationRepository {
    pool: PgPool,
}

impl PostgresUserLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserLocationRepository for PostgresUserLocationRepository {
    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<UserLocation>, RepositoryError> {
        let location = sqlx::query_as::<_, UserLocation>(
            "SELECT user_id, latitude, longitude, updated_at FROM user_locations WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(location)
    }

    #[tracing::instrument(skip(self, location), fields(user_id = %location.user_id))]
    async fn upsert(&self, location: &UserLocation) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO user_locations (user_id, latitude, longitude, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id)
            DO UPDATE SET latitude = EXCLUDED.latitude,
                          longitude = EXCLUDED.longitude,
                          updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(location.user_id)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(location.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
