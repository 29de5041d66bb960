//! Project file discovery

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use ttlgen_core::Config;
use walkdir::WalkDir;

/// Files read from disk, with paths relative to the project root
#[derive(Debug, Default)]
pub struct ProjectFiles {
    pub sources: Vec<(PathBuf, String)>,
    pub schemas: Vec<(PathBuf, String)>,
}

/// Collect Rust sources under the source root and schema documents under the
/// schema directories
///
/// The output directory is skipped so generated files are never scanned.
pub fn discover(config: &Config) -> Result<ProjectFiles> {
    let output_dir = config.resolve(&config.output.directory);

    let sources = collect(config, &config.resolve(&config.binding.source_root), &output_dir, |path| {
        path.extension().is_some_and(|ext| ext == "rs")
    })?;

    let mut schemas = Vec::new();
    for directory in &config.schema.directories {
        schemas.extend(collect(config, &config.resolve(directory), &output_dir, |path| {
            ttlgen_schema::is_schema_file(path, &config.schema.extension)
        })?);
    }

    tracing::debug!(
        sources = sources.len(),
        schemas = schemas.len(),
        "discovered project files"
    );

    Ok(ProjectFiles { sources, schemas })
}

fn collect(
    config: &Config,
    root: &Path,
    skip: &Path,
    wanted: impl Fn(&Path) -> bool,
) -> Result<Vec<(PathBuf, String)>> {
    if !root.is_dir() {
        tracing::warn!(directory = %root.display(), "directory not found, skipping");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.path() != skip);

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !wanted(entry.path()) {
            continue;
        }

        let text = std::fs::read_to_string(entry.path())
            .with_context(|| format!("Failed to read {}", entry.path().display()))?;
        files.push((relative_to_root(config, entry.path()), text));
    }

    Ok(files)
}

fn relative_to_root(config: &Config, path: &Path) -> PathBuf {
    path.strip_prefix(&config.project_root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn write(root: &Path, relative: &str, text: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn finds_sources_and_schemas() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/lib.rs", "pub mod model;");
        write(dir.path(), "src/model.rs", "pub struct Person;");
        write(dir.path(), "src/generated/Person.g.rs", "impl Person {}");
        write(dir.path(), "src/notes.txt", "not rust");
        write(dir.path(), "schemas/person.ttl", "");
        write(dir.path(), "schemas/nested/ORDER.TTL", "");
        write(dir.path(), "schemas/readme.md", "");

        let config = Config {
            project_root: dir.path().to_path_buf(),
            ..Config::default()
        };
        let files = discover(&config).unwrap();

        let sources: Vec<PathBuf> = files.sources.into_iter().map(|(path, _)| path).collect();
        assert_eq!(sources, vec![PathBuf::from("src/lib.rs"), PathBuf::from("src/model.rs")]);

        let schemas: Vec<PathBuf> = files.schemas.into_iter().map(|(path, _)| path).collect();
        assert_eq!(
            schemas,
            vec![PathBuf::from("schemas/nested/ORDER.TTL"), PathBuf::from("schemas/person.ttl")]
        );
    }

    #[test]
    fn missing_directories_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            project_root: dir.path().to_path_buf(),
            ..Config::default()
        };

        let files = discover(&config).unwrap();
        assert!(files.sources.is_empty());
        assert!(files.schemas.is_empty());
    }
}
