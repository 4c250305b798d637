use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Scratch directory holding simulation scripts, logs, and sweep output.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp workspace"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("results")
    }

    pub fn log_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, body).expect("write script");
        path
    }

    /// Lines appended to a log file by the scripts, empty when absent.
    pub fn log_lines(&self, name: &str) -> Vec<String> {
        fs::read_to_string(self.log_path(name))
            .map(|text| text.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn seed_artifact(&self, file_name: &str, body: &str) {
        fs::create_dir_all(self.output_dir()).expect("create output dir");
        fs::write(self.output_dir().join(file_name), body).expect("seed artifact");
    }

    pub fn read_artifact(&self, file_name: &str) -> String {
        fs::read_to_string(self.output_dir().join(file_name)).expect("read artifact")
    }

    /// Sorted names of every file in the output directory.
    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(self.output_dir()) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}
