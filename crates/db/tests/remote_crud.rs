//! Integration tests for the remote backend against real PostgreSQL.
//!
//! Ignored by default; run with a live database:
//! `DATABASE_URL=postgres://... cargo test -p defter-db -- --ignored`

use defter_db::models::{Difficulty, DocumentFilter, NewDocument, WordToken};
use defter_db::Storage;
use sqlx::PgPool;

fn sample_document() -> NewDocument {
    NewDocument {
        title: "Tapu senedi".to_string(),
        category: "tapu".to_string(),
        difficulty: Difficulty::Beginner,
        year: 1845,
        image_url: "/images/tapu.jpg".to_string(),
        words: vec![WordToken {
            id: 0,
            original: "دفتر".to_string(),
            modern: "defter".to_string(),
            note: None,
            coords: None,
        }],
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running PostgreSQL"]
async fn create_then_get_round_trips(pool: PgPool) {
    let storage = Storage::remote(pool);
    let created = storage.documents.create(sample_document()).await.unwrap();

    let fetched = storage.documents.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running PostgreSQL"]
async fn filtered_list_matches_local_semantics(pool: PgPool) {
    let storage = Storage::remote(pool);
    storage.documents.create(sample_document()).await.unwrap();
    let mut other = sample_document();
    other.category = "ferman".to_string();
    storage.documents.create(other).await.unwrap();

    let filtered = storage
        .documents
        .list(&DocumentFilter {
            category: Some("tapu".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].category, "tapu");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running PostgreSQL"]
async fn health_check_passes(pool: PgPool) {
    defter_db::health_check(&pool).await.unwrap();
}
