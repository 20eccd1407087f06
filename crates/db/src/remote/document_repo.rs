//! Remote document repository.

use async_trait::async_trait;
use defter_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::Postgres;

use crate::error::{StoreError, StoreResult};
use crate::models::{ArchivalDocument, DocumentFilter, DocumentPatch, NewDocument};
use crate::repositories::DocumentRepository;
use crate::DbPool;

use super::rows::DocumentRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, category, difficulty, year, image_url, words, created_at";

pub struct RemoteDocumentRepo {
    pool: DbPool,
}

impl RemoteDocumentRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Build the filtered list query. Filters are pushed into the WHERE clause
/// so the remote and local backends agree on semantics.
fn list_query(filter: &DocumentFilter) -> (String, Vec<String>) {
    let mut clauses = Vec::new();
    let mut binds = Vec::new();
    if let Some(category) = &filter.category {
        binds.push(category.clone());
        clauses.push(format!("category = ${}", binds.len()));
    }
    if let Some(difficulty) = filter.difficulty {
        binds.push(difficulty.as_str().to_string());
        clauses.push(format!("difficulty = ${}", binds.len()));
    }
    if let Some(year) = filter.year {
        binds.push(year.to_string());
        clauses.push(format!("year = ${}::int", binds.len()));
    }
    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {} ", clauses.join(" AND "))
    };
    let query = format!(
        "SELECT {COLUMNS} FROM documents {where_clause}ORDER BY created_at DESC"
    );
    (query, binds)
}

fn bind_all<'q>(
    mut query: QueryAs<'q, Postgres, DocumentRow, PgArguments>,
    binds: &'q [String],
) -> QueryAs<'q, Postgres, DocumentRow, PgArguments> {
    for bind in binds {
        query = query.bind(bind);
    }
    query
}

#[async_trait]
impl DocumentRepository for RemoteDocumentRepo {
    async fn list(&self, filter: &DocumentFilter) -> StoreResult<Vec<ArchivalDocument>> {
        let (query, binds) = list_query(filter);
        let rows = bind_all(sqlx::query_as::<_, DocumentRow>(&query), &binds)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: DbId) -> StoreResult<Option<ArchivalDocument>> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn create(&self, input: NewDocument) -> StoreResult<ArchivalDocument> {
        let query = format!(
            "INSERT INTO documents (title, category, difficulty, year, image_url, words)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(&input.title)
            .bind(&input.category)
            .bind(input.difficulty.as_str())
            .bind(input.year)
            .bind(&input.image_url)
            .bind(serde_json::to_value(&input.words)?)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update(&self, id: DbId, patch: DocumentPatch) -> StoreResult<ArchivalDocument> {
        let words = match &patch.words {
            Some(words) => Some(serde_json::to_value(words)?),
            None => None,
        };
        let query = format!(
            "UPDATE documents SET
                title = COALESCE($2, title),
                category = COALESCE($3, category),
                difficulty = COALESCE($4, difficulty),
                year = COALESCE($5, year),
                image_url = COALESCE($6, image_url),
                words = COALESCE($7, words)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.category)
            .bind(patch.difficulty.map(|d| d.as_str()))
            .bind(patch.year)
            .bind(&patch.image_url)
            .bind(words)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("document", id))?;
        Ok(row.into())
    }

    async fn delete(&self, id: DbId) -> StoreResult<()> {
        // Idempotent: zero rows affected is still success.
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_without_filters_has_no_where_clause() {
        let (query, binds) = list_query(&DocumentFilter::default());
        assert!(!query.contains("WHERE"));
        assert!(binds.is_empty());
    }

    #[test]
    fn list_query_numbers_placeholders_in_filter_order() {
        let filter = DocumentFilter {
            category: Some("ferman".into()),
            difficulty: Some(crate::models::Difficulty::Advanced),
            year: Some(1876),
        };
        let (query, binds) = list_query(&filter);
        assert!(query.contains("category = $1"));
        assert!(query.contains("difficulty = $2"));
        assert!(query.contains("year = $3::int"));
        assert_eq!(binds, vec!["ferman", "advanced", "1876"]);
    }
}
