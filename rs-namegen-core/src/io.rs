use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Extension of corpus files (one name per line).
pub const CORPUS_EXTENSION: &str = "txt";

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/greek.txt"` → `"greek"`
/// - `"greek.txt"` → `"greek"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_file_lines() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("names.txt");
		fs::write(&path, "anna\r\nboris\n\ncarla").unwrap();

		assert_eq!(read_file(&path).unwrap(), vec!["anna", "boris", "", "carla"]);
	}

	#[test]
	fn test_get_filename() {
		assert_eq!(get_filename("./data/greek.txt").unwrap(), "greek");
		assert_eq!(get_filename("greek").unwrap(), "greek");
		assert!(get_filename("/").is_err());
	}

	#[test]
	fn test_normalize_folder() {
		assert_eq!(normalize_folder("data"), PathBuf::from("data"));
		assert_eq!(normalize_folder("."), env::current_dir().unwrap());
	}

	#[test]
	fn test_list_files_filters_extension() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("russian.txt"), "ivan").unwrap();
		fs::write(dir.path().join("greek.txt"), "nikos").unwrap();
		fs::write(dir.path().join("notes.md"), "skip").unwrap();
		fs::create_dir(dir.path().join("nested.txt")).unwrap();

		assert_eq!(
			list_files(dir.path(), CORPUS_EXTENSION).unwrap(),
			vec!["greek.txt", "russian.txt"]
		);
	}
}
