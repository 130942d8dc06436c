use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use trove_config::Error;

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml() -> String {
	SAMPLE_CONFIG_TEMPLATE_TOML.to_string()
}

fn sample_toml_with<F>(mutate: F) -> String
where
	F: FnOnce(&mut toml::Table),
{
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");

	mutate(root);

	toml::to_string(&value).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("trove_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load(payload: String) -> trove_config::Result<trove_config::Config> {
	let path = write_temp_config(payload);
	let result = trove_config::load(&path);

	let _ = fs::remove_file(&path);

	result
}

fn section<'a>(root: &'a mut toml::Table, name: &str) -> &'a mut toml::Table {
	root.get_mut(name)
		.and_then(Value::as_table_mut)
		.unwrap_or_else(|| panic!("Template config must include [{name}]."))
}

#[test]
fn loads_sample_config() {
	let cfg = load(sample_toml()).expect("Sample config must load.");

	assert_eq!(cfg.storage.postgres.vector_dim, 768);
	assert_eq!(cfg.search.top_k, 5);
	assert_eq!(cfg.search.rrf_k, 60);
	assert_eq!(cfg.search.overfetch_factor, 2);
}

#[test]
fn search_section_defaults_apply() {
	let payload = sample_toml_with(|root| {
		root.insert("search".to_string(), Value::Table(toml::Table::new()));
	});
	let cfg = load(payload).expect("Config with empty [search] must load.");

	assert_eq!(cfg.search.top_k, 5);
	assert_eq!(cfg.search.rrf_k, 60);
	assert_eq!(cfg.search.overfetch_factor, 2);
}

#[test]
fn rejects_dimension_disagreement() {
	let payload = sample_toml_with(|root| {
		let storage = section(root, "storage");
		let postgres = storage
			.get_mut("postgres")
			.and_then(Value::as_table_mut)
			.expect("Template config must include [storage.postgres].");

		postgres.insert("vector_dim".to_string(), Value::Integer(1_536));
	});
	let err = load(payload).expect_err("Mismatched dimensions must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));
	assert!(err.to_string().contains("dimensions"));
}

#[test]
fn rejects_zero_top_k() {
	let payload = sample_toml_with(|root| {
		section(root, "search").insert("top_k".to_string(), Value::Integer(0));
	});

	assert!(matches!(load(payload), Err(Error::Validation { .. })));
}

#[test]
fn rejects_zero_rrf_k() {
	let payload = sample_toml_with(|root| {
		section(root, "search").insert("rrf_k".to_string(), Value::Integer(0));
	});

	assert!(matches!(load(payload), Err(Error::Validation { .. })));
}

#[test]
fn rejects_zero_overfetch_factor() {
	let payload = sample_toml_with(|root| {
		section(root, "search").insert("overfetch_factor".to_string(), Value::Integer(0));
	});

	assert!(matches!(load(payload), Err(Error::Validation { .. })));
}

#[test]
fn rejects_min_chars_at_or_above_max_chars() {
	let payload = sample_toml_with(|root| {
		let chunking = section(root, "chunking");

		chunking.insert("max_chars".to_string(), Value::Integer(100));
		chunking.insert("min_chars".to_string(), Value::Integer(100));
	});

	assert!(matches!(load(payload), Err(Error::Validation { .. })));
}

#[test]
fn rejects_empty_api_key() {
	let payload = sample_toml_with(|root| {
		let providers = section(root, "providers");
		let embedding = providers
			.get_mut("embedding")
			.and_then(Value::as_table_mut)
			.expect("Template config must include [providers.embedding].");

		embedding.insert("api_key".to_string(), Value::String("  ".to_string()));
	});

	assert!(matches!(load(payload), Err(Error::Validation { .. })));
}

#[test]
fn normalizes_api_base_trailing_slash() {
	let payload = sample_toml_with(|root| {
		let providers = section(root, "providers");
		let embedding = providers
			.get_mut("embedding")
			.and_then(Value::as_table_mut)
			.expect("Template config must include [providers.embedding].");

		embedding
			.insert("api_base".to_string(), Value::String("https://api.test.dev/".to_string()));
		embedding.insert("path".to_string(), Value::String("embeddings".to_string()));
	});
	let cfg = load(payload).expect("Config must load.");

	assert_eq!(cfg.providers.embedding.api_base, "https://api.test.dev");
	assert_eq!(cfg.providers.embedding.path, "/embeddings");
}

#[test]
fn missing_file_is_a_read_error() {
	let mut path = env::temp_dir();

	path.push("trove_config_test_missing.toml");

	let _ = fs::remove_file(&path);

	assert!(matches!(trove_config::load(&path), Err(Error::ReadConfig { .. })));
}
