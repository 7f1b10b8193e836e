use std::env;

use log::info;
use rs_namegen_core::io::{CORPUS_EXTENSION, get_filename, list_files, normalize_folder};
use rs_namegen_core::{GeneratorConfig, NameGenerator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Usage: rs-namegen-exemple [count] [data_dir]
    let mut args = env::args().skip(1);
    let count: usize = match args.next() {
        Some(value) => value.parse()?,
        None => 10,
    };
    let folder = normalize_folder(&args.next().unwrap_or_else(|| "./data".to_owned()));

    // Default configuration: order 3, prior 0.001, names of 4 to 8 characters,
    // no retry cap
    let config = GeneratorConfig::default();

    // One generator per corpus file, each keeps its own known names
    for file in list_files(&folder, CORPUS_EXTENSION)? {
        let path = folder.join(&file);
        let mut generator = NameGenerator::from_file(&path, config.clone())?;
        info!("Loaded {} names from {}", generator.known_count(), path.display());

        println!("== {}", get_filename(&path)?);
        for name in generator.generate_batch(count)? {
            println!("{}", name);
        }
    }

    Ok(())
}
