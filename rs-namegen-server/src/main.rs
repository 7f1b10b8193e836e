use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use log::{info, warn};
use serde::Deserialize;
use rs_namegen_core::io::{list_files, CORPUS_EXTENSION};
use rs_namegen_core::{GeneratorConfig, NameGenerator};

/// Default folder containing the corpus files.
const DATA_FOLDER: &str = "./data";

/// Maximum number of names returned by a single request.
const MAX_COUNT: usize = 100;

/// Rejected candidates allowed per name before giving up.
/// Keeps a request from spinning forever on an exhausted corpus.
const MAX_ATTEMPTS: usize = 100_000;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	corpus: Option<String>,
	count: Option<usize>
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>,
	order: Option<usize>,
	prior: Option<f64>
}

#[derive(Deserialize)]
struct ReseedQuery {
	seed: Option<u64>
}

/// One generator per loaded corpus, keyed by corpus name.
struct SharedData {
	data_folder: PathBuf,
	generators: BTreeMap<String, NameGenerator>
}

impl CorpusQuery {
	/// Builds the generator configuration from the query, falling back to defaults.
	fn config(&self) -> GeneratorConfig {
		let mut config = GeneratorConfig::default().with_max_attempts(MAX_ATTEMPTS);
		if let Some(order) = self.order {
			config = config.with_order(order);
		}
		if let Some(prior) = self.prior {
			config = config.with_prior(prior);
		}
		config
	}
}

/// Builds a generator for each named corpus of `data_folder`.
fn load_corpora(data_folder: &Path, names: &[&str], config: &GeneratorConfig) -> Result<BTreeMap<String, NameGenerator>, String> {
	let mut generators = BTreeMap::new();
	for name in names {
		let path = data_folder.join(format!("{}.{}", name, CORPUS_EXTENSION));
		let generator = NameGenerator::from_file(&path, config.clone())
			.map_err(|e| format!("Failed to load corpus {name}: {e}"))?;
		info!("Loaded corpus {} ({} names)", name, generator.known_count());
		generators.insert((*name).to_owned(), generator);
	}
	Ok(generators)
}

/// Lists the corpus names available in `data_folder`.
fn available_corpora(data_folder: &Path) -> std::io::Result<Vec<String>> {
	let suffix = format!(".{}", CORPUS_EXTENSION);
	Ok(list_files(data_folder, CORPUS_EXTENSION)?
		.into_iter()
		.map(|file| file.trim_end_matches(&suffix).to_owned())
		.collect())
}

/// Generates `count` names from `corpus`, holding the lock for the whole batch.
fn generate_names(data: &Mutex<SharedData>, corpus: &str, count: usize) -> Result<Vec<String>, (StatusCode, String)> {
	let mut shared_data = data
		.lock()
		.map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Generator lock failed".to_owned()))?;

	let generator = shared_data
		.generators
		.get_mut(corpus)
		.ok_or_else(|| (StatusCode::NOT_FOUND, format!("Corpus {corpus} not loaded")))?;

	generator.generate_batch(count).map_err(|e| {
		warn!("Generation failed for {}: {}", corpus, e);
		(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
	})
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates `count` new names from the requested corpus.
/// Returns the names as the response body, one per line.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let count = query.count.unwrap_or(1);
	if count == 0 || count > MAX_COUNT {
		return HttpResponse::BadRequest().body(format!("Count must be between 1 and {MAX_COUNT}"));
	}

	let corpus = match &query.corpus {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	// The rejection loop may run for a while, keep it off the async workers
	let corpus = corpus.to_owned();
	let shared = data.clone();
	match web::block(move || generate_names(&shared, &corpus, count)).await {
		Ok(Ok(names)) => HttpResponse::Ok().body(names.join("\n")),
		Ok(Err((status, message))) => HttpResponse::build(status).body(message),
		Err(_) => HttpResponse::InternalServerError().body("Generation task failed"),
	}
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let data_folder = match data.lock() {
		Ok(m) => m.data_folder.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	match available_corpora(&data_folder) {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora")
	}
}

#[get("/v1/loaded_corpora")]
async fn get_loaded_corpora(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	let names: Vec<&str> = shared_data.generators.keys().map(String::as_str).collect();
	HttpResponse::Ok().body(names.join("\n"))
}

#[put("/v1/load_corpora")]
async fn put_corpora(data: web::Data<Mutex<SharedData>>, query: web::Query<CorpusQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let config = query.config();
	if let Err(e) = config.validate() {
		return HttpResponse::BadRequest().body(e.to_string());
	}

	let corpus_names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();
	if corpus_names.is_empty() {
		return HttpResponse::BadRequest().body("Missing or empty corpus name");
	}

	let data_folder = match data.lock() {
		Ok(m) => m.data_folder.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};

	// Only corpora listed in the data folder can be loaded
	let available = match available_corpora(&data_folder) {
		Ok(available) => available,
		Err(_) => return HttpResponse::InternalServerError().body("Failed to list corpora"),
	};
	if let Some(unknown) = corpus_names.iter().find(|name| !available.iter().any(|a| a.as_str() == **name)) {
		return HttpResponse::NotFound().body(format!("Corpus {unknown} not found"));
	}

	// Build everything before touching the shared state
	let generators = match load_corpora(&data_folder, &corpus_names, &config) {
		Ok(generators) => generators,
		Err(e) => return HttpResponse::InternalServerError().body(e),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	shared_data.generators = generators;

	HttpResponse::Ok().body("Corpora loaded successfully")
}

#[put("/v1/reseed")]
async fn put_reseed(data: web::Data<Mutex<SharedData>>, query: web::Query<ReseedQuery>) -> impl Responder {
	let seed = match query.seed {
		Some(seed) => seed,
		None => return HttpResponse::BadRequest().body("Missing seed"),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	for generator in shared_data.generators.values_mut() {
		generator.reseed(seed);
	}

	HttpResponse::Ok().body("Generators reseeded")
}

/// Main entry point for the server.
///
/// Loads every corpus of `./data`, wraps the generators in a `Mutex`
/// and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - A missing data folder starts the server with no corpus loaded.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let data_folder = PathBuf::from(DATA_FOLDER);
	let names = available_corpora(&data_folder).unwrap_or_else(|e| {
		warn!("No corpus loaded from {}: {}", data_folder.display(), e);
		Vec::new()
	});
	let names: Vec<&str> = names.iter().map(String::as_str).collect();
	let config = GeneratorConfig::default().with_max_attempts(MAX_ATTEMPTS);
	let generators = load_corpora(&data_folder, &names, &config)
		.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

	let shared_data = web::Data::new(Mutex::new(SharedData { data_folder, generators }));

	info!("Listening on 127.0.0.1:5000");
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_generated)
			.service(get_corpora)
			.service(get_loaded_corpora)
			.service(put_corpora)
			.service(put_reseed)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
