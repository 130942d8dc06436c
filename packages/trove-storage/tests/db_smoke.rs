use serde_json::json;

use trove_config::Postgres;
use trove_storage::{chunks, db::Db, models::NewChunk};
use trove_testkit::TestDatabase;

const DIM: u32 = 3;

fn pg_vector(values: &[f32]) -> String {
	let rendered: Vec<String> = values.iter().map(|value| value.to_string()).collect();

	format!("[{}]", rendered.join(","))
}

async fn bootstrapped_db(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1, vector_dim: DIM };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(DIM).await.expect("Failed to ensure schema.");

	db
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set TROVE_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some(base_dsn) = trove_testkit::env_dsn() else {
		eprintln!("Skipping schema_bootstrap_is_idempotent; set TROVE_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrapped_db(&test_db).await;

	db.ensure_schema(DIM).await.expect("Second bootstrap must succeed.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name = 'chunks'",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 1);

	drop(db);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set TROVE_PG_DSN to run."]
async fn ranks_and_replaces_chunks() {
	let Some(base_dsn) = trove_testkit::env_dsn() else {
		eprintln!("Skipping ranks_and_replaces_chunks; set TROVE_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrapped_db(&test_db).await;

	let rows = [
		("a.md", "Postgres powers the retrieval layer.", Some([1.0, 0.0, 0.0])),
		("a.md", "Completely unrelated cooking advice.", Some([0.0, 1.0, 0.0])),
		("b.md", "No embedding stored for this chunk yet.", None),
	];

	for (source, content, embedding) in rows {
		let chunk = NewChunk {
			content: content.to_string(),
			metadata: json!({}),
			embedding: embedding.map(|values| pg_vector(&values)),
		};

		chunks::insert_chunk(&db.pool, source, &chunk).await.expect("Failed to insert chunk.");
	}

	// Vector ranking excludes the embedding-less chunk and orders nearest first.
	let ids = chunks::vector_candidates(&db.pool, &pg_vector(&[1.0, 0.0, 0.0]), 10)
		.await
		.expect("Vector candidates failed.");

	assert_eq!(ids.len(), 2);

	let top = chunks::fetch_by_ids(&db.pool, &ids[..1]).await.expect("Fetch failed.");

	assert!(top[0].content.contains("Postgres"));

	// Lexical ranking only includes matching chunks.
	let ids = chunks::lexical_candidates(&db.pool, "retrieval layer", 10)
		.await
		.expect("Lexical candidates failed.");

	assert_eq!(ids.len(), 1);

	let stats = chunks::collection_stats(&db.pool).await.expect("Stats failed.");

	assert_eq!(stats.sources, 2);
	assert_eq!(stats.chunks, 3);
	assert_eq!(stats.embedded_chunks, 2);

	// Replace-by-source removes every chunk of that source.
	let removed = chunks::delete_by_source(&db.pool, "a.md").await.expect("Delete failed.");

	assert_eq!(removed, 2);

	let stats = chunks::collection_stats(&db.pool).await.expect("Stats failed.");

	assert_eq!(stats.chunks, 1);

	drop(db);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set TROVE_PG_DSN to run."]
async fn lexical_search_carries_native_scores() {
	let Some(base_dsn) = trove_testkit::env_dsn() else {
		eprintln!("Skipping lexical_search_carries_native_scores; set TROVE_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrapped_db(&test_db).await;
	let chunk = NewChunk {
		content: "Hybrid retrieval fuses vector and keyword rankings.".to_string(),
		metadata: json!({"lang": "en"}),
		embedding: None,
	};

	chunks::insert_chunk(&db.pool, "notes.md", &chunk).await.expect("Failed to insert chunk.");

	let hits =
		chunks::lexical_search(&db.pool, "hybrid retrieval", 5).await.expect("Search failed.");

	assert_eq!(hits.len(), 1);
	assert!(hits[0].score > 0.0);
	assert_eq!(hits[0].metadata["lang"], "en");

	let misses = chunks::lexical_search(&db.pool, "zeppelin", 5).await.expect("Search failed.");

	assert!(misses.is_empty());

	drop(db);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
