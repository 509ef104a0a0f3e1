use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Builds a throwaway monorepo on disk: a root manifest plus any number of
/// nested package manifests and an optional pnpm lockfile.
pub struct WorkspaceBuilder {
    dir: TempDir,
}

impl WorkspaceBuilder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp workspace"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn with_manifest(self, relative_dir: &str, content: &str) -> Self {
        let dir = if relative_dir == "." {
            self.dir.path().to_path_buf()
        } else {
            self.dir.path().join(relative_dir)
        };
        fs::create_dir_all(&dir).expect("create package dir");
        fs::write(dir.join("package.json"), content).expect("write manifest");
        self
    }

    pub fn with_lockfile(self, content: &str) -> Self {
        fs::write(self.dir.path().join("pnpm-lock.yaml"), content).expect("write lockfile");
        self
    }

    pub fn with_config(self, content: &str) -> Self {
        fs::write(self.dir.path().join("monodep.config.yml"), content).expect("write config");
        self
    }

    pub fn read_manifest(&self, relative_dir: &str) -> serde_json::Value {
        let dir = if relative_dir == "." {
            self.dir.path().to_path_buf()
        } else {
            self.dir.path().join(relative_dir)
        };
        let content = fs::read_to_string(dir.join("package.json")).expect("read manifest");
        serde_json::from_str(&content).expect("parse manifest")
    }
}
