use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Executor, Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
    time::Duration,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use shared::{
    domain::{default_items, Item, ItemId, NewItem},
    reorder::{ensure_dense, plan_move, reindex, RankChange},
};

/// Owned handle to the item collection. Cloning shares the pool.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
    // Reorders read the whole collection before writing, so they run one at a time.
    reorder_lock: Arc<Mutex<()>>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to `sqlite::memory:` opens its own empty database.
        let in_memory = database_url.starts_with("sqlite::memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .idle_timeout(if in_memory { None } else { Some(Duration::from_secs(600)) })
            .max_lifetime(if in_memory { None } else { Some(Duration::from_secs(1800)) })
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self {
            pool,
            reorder_lock: Arc::new(Mutex::new(())),
        })
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn item_count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Inserts `items` in list order when the collection is empty. Returns the
    /// number of rows written, zero if the collection already had items.
    pub async fn seed_items(&self, items: &[NewItem]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            debug!(existing, "item collection already populated; skipping seed");
            return Ok(0);
        }

        for (position, item) in items.iter().enumerate() {
            sqlx::query("INSERT INTO items (id, name, position) VALUES (?, ?, ?)")
                .bind(item.id.as_str())
                .bind(&item.name)
                .bind(i64::try_from(position)?)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to seed item '{}'", item.id))?;
        }
        tx.commit().await?;

        info!(count = items.len(), "seeded item collection");
        Ok(items.len())
    }

    pub async fn seed_default_items(&self) -> Result<usize> {
        self.seed_items(&default_items()).await
    }

    /// All items, sorted by rank.
    pub async fn list_items(&self) -> Result<Vec<Item>> {
        load_items(&self.pool).await
    }

    pub async fn find_item(&self, id: &ItemId) -> Result<Option<Item>> {
        let row = sqlx::query("SELECT id, name, position FROM items WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(item_from_row).transpose()
    }

    /// Moves `moved_id` from `from_index` to `to_index` and persists the new
    /// ranks in one transaction. Only rows whose rank changes are written.
    ///
    /// Rejected moves leave the collection untouched; the rejection is a
    /// [`shared::reorder::ReindexError`] inside the returned error.
    pub async fn reorder_item(
        &self,
        moved_id: &ItemId,
        from_index: u32,
        to_index: u32,
    ) -> Result<Vec<Item>> {
        let _guard = self.reorder_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let items = load_items(&mut *tx).await?;
        let changes = plan_move(&items, moved_id, from_index, to_index)?;
        let reordered = reindex(&items, moved_id, from_index, to_index)?;

        for RankChange { id, to, .. } in &changes {
            sqlx::query("UPDATE items SET position = ? WHERE id = ?")
                .bind(i64::from(*to))
                .bind(id.as_str())
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to update rank of item '{id}'"))?;
        }
        tx.commit().await?;

        debug!(
            moved_id = %moved_id,
            from_index,
            to_index,
            rows_written = changes.len(),
            "persisted reorder"
        );
        Ok(reordered)
    }

    /// Fails when stored ranks are not exactly `0..len`.
    pub async fn verify_dense(&self) -> Result<()> {
        let items = self.list_items().await?;
        ensure_dense(&items).context("stored item ranks are inconsistent")?;
        Ok(())
    }
}

async fn load_items<'e, E>(executor: E) -> Result<Vec<Item>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("SELECT id, name, position FROM items ORDER BY position ASC, id ASC")
        .fetch_all(executor)
        .await?;
    rows.iter().map(item_from_row).collect()
}

fn item_from_row(row: &SqliteRow) -> Result<Item> {
    let position: i64 = row.try_get("position")?;
    Ok(Item {
        id: ItemId(row.try_get("id")?),
        name: row.try_get("name")?,
        order: u32::try_from(position)
            .with_context(|| format!("stored position {position} does not fit a rank"))?,
    })
}

pub fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
