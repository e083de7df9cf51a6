use std::path::{Path, PathBuf};

pub const ROOT_ENV: &str = "WEATHER_QA_ROOT";

/// Resolves project-relative files (config, store, reports, input sheet).
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Explicit root wins, then `WEATHER_QA_ROOT`, then the working directory.
    pub fn discover(explicit: Option<PathBuf>) -> Self {
        let root = explicit
            .or_else(|| std::env::var_os(ROOT_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve<I, S>(&self, parts: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        parts
            .into_iter()
            .fold(self.root.clone(), |path, part| path.join(part))
    }

    /// Relative config values are anchored at the root; absolute ones pass through.
    pub fn anchor(&self, value: &str) -> PathBuf {
        let path = Path::new(value);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_any_number_of_segments() {
        let paths = ProjectPaths::new("/srv/qa");
        assert_eq!(
            paths.resolve(["config", "config.toml"]),
            PathBuf::from("/srv/qa/config/config.toml")
        );
        assert_eq!(paths.resolve(["reports"]), PathBuf::from("/srv/qa/reports"));
        assert_eq!(paths.resolve(Vec::<&str>::new()), PathBuf::from("/srv/qa"));
    }

    #[test]
    fn explicit_root_beats_environment() {
        let paths = ProjectPaths::discover(Some(PathBuf::from("/explicit")));
        assert_eq!(paths.root(), Path::new("/explicit"));
    }

    #[test]
    fn anchor_keeps_absolute_paths() {
        let paths = ProjectPaths::new("/srv/qa");
        assert_eq!(paths.anchor("/tmp/data.db"), PathBuf::from("/tmp/data.db"));
        assert_eq!(paths.anchor("data.db"), PathBuf::from("/srv/qa/data.db"));
    }
}
