//! SQL page store
//!
//! Pages live in a single `pages` table. Structural sections are stored as
//! JSON text and timestamps as RFC 3339 strings with nanosecond precision,
//! so creation order survives a text sort on every backend.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fotobudka_cms::store::{PageStore, SqlPageStore};
//!
//! # async fn example() {
//! let store = SqlPageStore::new("sqlite::memory:", 1).await.unwrap();
//! store.create_table().await.unwrap();
//! assert!(store.select_all().await.unwrap().is_empty());
//! # }
//! # tokio_test::block_on(example());
//! ```

use super::{PAGES_TABLE, PageStore};
use crate::error::{CmsError, CmsResult};
use crate::pages::{PageId, PageRow};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sea_query::{
	Alias, ColumnDef, Expr, ExprTrait, Index, Order, PostgresQueryBuilder, Query,
	QueryStatementWriter, SchemaStatementBuilder, SqliteQueryBuilder, Table,
};
use serde_json::Value;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};
use std::sync::Arc;

const COLUMNS: [&str; 15] = [
	"id",
	"name",
	"slug",
	"is_main",
	"seo_title",
	"seo_description",
	"navigation",
	"videos",
	"welcome_section",
	"stats",
	"gallery",
	"locations",
	"footer",
	"created_at",
	"updated_at",
];

const JSON_COLUMNS: [&str; 7] = [
	"navigation",
	"videos",
	"welcome_section",
	"stats",
	"gallery",
	"locations",
	"footer",
];

/// SQL flavour the statements are rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
	Sqlite,
	Postgres,
}

impl Dialect {
	fn from_url(database_url: &str) -> Self {
		if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
			Dialect::Postgres
		} else {
			Dialect::Sqlite
		}
	}

	fn query(self, stmt: &impl QueryStatementWriter) -> String {
		match self {
			Dialect::Sqlite => stmt.to_string(SqliteQueryBuilder),
			Dialect::Postgres => stmt.to_string(PostgresQueryBuilder),
		}
	}

	fn schema(self, stmt: &impl SchemaStatementBuilder) -> String {
		match self {
			Dialect::Sqlite => stmt.to_string(SqliteQueryBuilder),
			Dialect::Postgres => stmt.to_string(PostgresQueryBuilder),
		}
	}
}

/// Page store over a sqlx `Any` pool (SQLite or PostgreSQL).
#[derive(Clone)]
pub struct SqlPageStore {
	pool: Arc<AnyPool>,
	dialect: Dialect,
}

impl std::fmt::Debug for SqlPageStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SqlPageStore")
			.field("dialect", &self.dialect)
			.finish_non_exhaustive()
	}
}

impl SqlPageStore {
	/// Connect to `database_url`.
	///
	/// An in-memory SQLite database is private to its connection, so it is
	/// opened with a single connection that is never recycled.
	pub async fn new(database_url: &str, max_connections: u32) -> CmsResult<Self> {
		sqlx::any::install_default_drivers();

		let options = if database_url.contains(":memory:") {
			AnyPoolOptions::new()
				.max_connections(1)
				.idle_timeout(None)
				.max_lifetime(None)
		} else {
			AnyPoolOptions::new().max_connections(Ord::max(max_connections, 1))
		};

		let pool = options
			.connect(database_url)
			.await
			.map_err(|e| CmsError::Storage(format!("Database connection error: {}", e)))?;

		Ok(Self {
			pool: Arc::new(pool),
			dialect: Dialect::from_url(database_url),
		})
	}

	/// Create a store from an existing pool connected to `database_url`.
	pub fn from_pool(pool: Arc<AnyPool>, database_url: &str) -> Self {
		Self {
			pool,
			dialect: Dialect::from_url(database_url),
		}
	}

	/// Create the pages table if it doesn't exist.
	pub async fn create_table(&self) -> CmsResult<()> {
		let mut table = Table::create();
		table
			.table(Alias::new(PAGES_TABLE))
			.if_not_exists()
			.col(
				ColumnDef::new(Alias::new("id"))
					.string_len(36)
					.not_null()
					.primary_key(),
			)
			.col(ColumnDef::new(Alias::new("name")).text().not_null())
			.col(
				ColumnDef::new(Alias::new("slug"))
					.string_len(255)
					.not_null()
					.unique_key(),
			)
			.col(
				ColumnDef::new(Alias::new("is_main"))
					.big_integer()
					.not_null()
					.default(0),
			)
			.col(ColumnDef::new(Alias::new("seo_title")).text())
			.col(ColumnDef::new(Alias::new("seo_description")).text());
		for column in JSON_COLUMNS {
			table.col(ColumnDef::new(Alias::new(column)).text());
		}
		table
			.col(ColumnDef::new(Alias::new("created_at")).string_len(64).not_null())
			.col(ColumnDef::new(Alias::new("updated_at")).string_len(64));
		let sql = self.dialect.schema(&table);

		sqlx::query(&sql)
			.execute(&*self.pool)
			.await
			.map_err(|e| CmsError::Storage(format!("Failed to create table: {}", e)))?;

		let idx = Index::create()
			.if_not_exists()
			.name("idx_pages_is_main_created_at")
			.table(Alias::new(PAGES_TABLE))
			.col(Alias::new("is_main"))
			.col(Alias::new("created_at"))
			.to_owned();
		let sql = self.dialect.schema(&idx);

		sqlx::query(&sql)
			.execute(&*self.pool)
			.await
			.map_err(|e| CmsError::Storage(format!("Failed to create index: {}", e)))?;

		Ok(())
	}
}

fn timestamp(value: DateTime<Utc>) -> String {
	value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn json_text(value: &Option<Value>) -> Option<String> {
	value.as_ref().map(Value::to_string)
}

fn column_error(column: &str, e: impl std::fmt::Display) -> CmsError {
	CmsError::Storage(format!("Invalid {} column: {}", column, e))
}

fn json_column(row: &AnyRow, id: PageId, column: &str) -> CmsResult<Option<Value>> {
	let raw: Option<String> = row.try_get(column).map_err(|e| column_error(column, e))?;
	Ok(raw.and_then(|text| match serde_json::from_str::<Value>(&text) {
		Ok(value) => Some(value),
		Err(e) => {
			tracing::warn!(page_id = %id, column, error = %e, "Unreadable JSON column");
			None
		}
	}))
}

fn time_column(row: &AnyRow, column: &str) -> CmsResult<Option<DateTime<Utc>>> {
	let raw: Option<String> = row.try_get(column).map_err(|e| column_error(column, e))?;
	raw.map(|text| {
		DateTime::parse_from_rfc3339(&text)
			.map(|dt| dt.with_timezone(&Utc))
			.map_err(|e| column_error(column, e))
	})
	.transpose()
}

fn decode_row(row: &AnyRow) -> CmsResult<PageRow> {
	let id: String = row.try_get("id").map_err(|e| column_error("id", e))?;
	let id = id.parse::<PageId>().map_err(|e| column_error("id", e))?;
	// 0 or 1
	let is_main: i64 = row
		.try_get("is_main")
		.map_err(|e| column_error("is_main", e))?;

	Ok(PageRow {
		id,
		name: row.try_get("name").map_err(|e| column_error("name", e))?,
		slug: row.try_get("slug").map_err(|e| column_error("slug", e))?,
		is_main: is_main != 0,
		seo_title: row
			.try_get("seo_title")
			.map_err(|e| column_error("seo_title", e))?,
		seo_description: row
			.try_get("seo_description")
			.map_err(|e| column_error("seo_description", e))?,
		navigation: json_column(row, id, "navigation")?,
		videos: json_column(row, id, "videos")?,
		welcome_section: json_column(row, id, "welcome_section")?,
		stats: json_column(row, id, "stats")?,
		gallery: json_column(row, id, "gallery")?,
		locations: json_column(row, id, "locations")?,
		footer: json_column(row, id, "footer")?,
		created_at: time_column(row, "created_at")?,
		updated_at: time_column(row, "updated_at")?,
	})
}

#[async_trait]
impl PageStore for SqlPageStore {
	async fn select_all(&self) -> CmsResult<Vec<PageRow>> {
		let stmt = Query::select()
			.columns(COLUMNS.map(Alias::new))
			.from(Alias::new(PAGES_TABLE))
			.order_by(Alias::new("is_main"), Order::Desc)
			.order_by(Alias::new("created_at"), Order::Asc)
			.to_owned();
		let sql = self.dialect.query(&stmt);

		let rows = sqlx::query(&sql)
			.fetch_all(&*self.pool)
			.await
			.map_err(|e| CmsError::Storage(format!("Failed to load pages: {}", e)))?;

		rows.iter().map(decode_row).collect()
	}

	async fn update(&self, id: PageId, row: PageRow) -> CmsResult<u64> {
		let updated_at = row.updated_at.unwrap_or_else(Utc::now);
		let stmt = Query::update()
			.table(Alias::new(PAGES_TABLE))
			.value(Alias::new("name"), Expr::val(row.name.clone()))
			.value(Alias::new("slug"), Expr::val(row.slug.clone()))
			.value(Alias::new("is_main"), Expr::val(i64::from(row.is_main)))
			.value(Alias::new("seo_title"), Expr::val(row.seo_title.clone()))
			.value(
				Alias::new("seo_description"),
				Expr::val(row.seo_description.clone()),
			)
			.value(Alias::new("navigation"), Expr::val(json_text(&row.navigation)))
			.value(Alias::new("videos"), Expr::val(json_text(&row.videos)))
			.value(
				Alias::new("welcome_section"),
				Expr::val(json_text(&row.welcome_section)),
			)
			.value(Alias::new("stats"), Expr::val(json_text(&row.stats)))
			.value(Alias::new("gallery"), Expr::val(json_text(&row.gallery)))
			.value(Alias::new("locations"), Expr::val(json_text(&row.locations)))
			.value(Alias::new("footer"), Expr::val(json_text(&row.footer)))
			.value(Alias::new("updated_at"), Expr::val(timestamp(updated_at)))
			.and_where(Expr::col(Alias::new("id")).eq(id.to_string()))
			.to_owned();
		let sql = self.dialect.query(&stmt);

		let result = sqlx::query(&sql)
			.execute(&*self.pool)
			.await
			.map_err(|e| CmsError::Storage(format!("Failed to update page: {}", e)))?;

		Ok(result.rows_affected())
	}

	async fn insert(&self, mut row: PageRow) -> CmsResult<PageRow> {
		let now = Utc::now();
		let created_at = *row.created_at.get_or_insert(now);
		let updated_at = *row.updated_at.get_or_insert(now);

		let mut stmt = Query::insert();
		stmt.into_table(Alias::new(PAGES_TABLE))
			.columns(COLUMNS.map(Alias::new));
		stmt.values(vec![
			Expr::val(row.id.to_string()),
			Expr::val(row.name.clone()),
			Expr::val(row.slug.clone()),
			Expr::val(i64::from(row.is_main)),
			Expr::val(row.seo_title.clone()),
			Expr::val(row.seo_description.clone()),
			Expr::val(json_text(&row.navigation)),
			Expr::val(json_text(&row.videos)),
			Expr::val(json_text(&row.welcome_section)),
			Expr::val(json_text(&row.stats)),
			Expr::val(json_text(&row.gallery)),
			Expr::val(json_text(&row.locations)),
			Expr::val(json_text(&row.footer)),
			Expr::val(timestamp(created_at)),
			Expr::val(timestamp(updated_at)),
		])
		.map_err(|e| CmsError::Storage(format!("Failed to build insert: {}", e)))?;
		let sql = self.dialect.query(&stmt);

		sqlx::query(&sql)
			.execute(&*self.pool)
			.await
			.map_err(|e| CmsError::Storage(format!("Failed to insert page: {}", e)))?;

		Ok(row)
	}

	async fn delete_unless_main(&self, id: PageId) -> CmsResult<u64> {
		let stmt = Query::delete()
			.from_table(Alias::new(PAGES_TABLE))
			.and_where(Expr::col(Alias::new("id")).eq(id.to_string()))
			.and_where(Expr::col(Alias::new("is_main")).eq(0i64))
			.to_owned();
		let sql = self.dialect.query(&stmt);

		let result = sqlx::query(&sql)
			.execute(&*self.pool)
			.await
			.map_err(|e| CmsError::Storage(format!("Failed to delete page: {}", e)))?;

		Ok(result.rows_affected())
	}
}
