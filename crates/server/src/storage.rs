use shared::SYSTEMS_DIR;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Executable storage laid out as `<root>/sistemas/<name>/<version>/<file>`
#[derive(Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the directory holding one version of a system
    fn version_dir(&self, name: &str, version: i64) -> PathBuf {
        self.base_path
            .join(SYSTEMS_DIR)
            .join(name)
            .join(version.to_string())
    }

    /// Path an uploaded file is written to
    pub fn executable_path(&self, name: &str, version: i64, file_name: &str) -> PathBuf {
        self.version_dir(name, version).join(file_name)
    }

    /// Conventional `<name>.exe` location, used when the recorded path is gone
    pub fn conventional_path(&self, name: &str, version: i64) -> PathBuf {
        self.version_dir(name, version).join(format!("{}.exe", name))
    }

    /// Create (or truncate) the file at `path`, making parent directories as
    /// needed.
    pub async fn create(&self, path: &Path) -> io::Result<fs::File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::File::create(path).await
    }

    /// Find the file to serve for a system: the recorded path when it still
    /// exists, else the conventional path when that exists. Either must
    /// resolve to a file inside `<root>/sistemas`.
    pub async fn resolve_download(
        &self,
        recorded: Option<&str>,
        name: &str,
        version: i64,
    ) -> Option<PathBuf> {
        let systems_dir = fs::canonicalize(self.base_path.join(SYSTEMS_DIR)).await.ok()?;

        if let Some(recorded) = recorded {
            match servable(&systems_dir, Path::new(recorded)).await {
                Some(path) => return Some(path),
                None => tracing::warn!("Recorded file {} cannot be served", recorded),
            }
        }

        let fallback = self.conventional_path(name, version);
        servable(&systems_dir, &fallback).await
    }
}

/// Canonical form of `candidate` when it is an existing regular file
/// below `systems_dir`
async fn servable(systems_dir: &Path, candidate: &Path) -> Option<PathBuf> {
    let resolved = fs::canonicalize(candidate).await.ok()?;
    if !resolved.starts_with(systems_dir) {
        tracing::warn!(
            "Refusing to serve {} from outside {}",
            resolved.display(),
            systems_dir.display()
        );
        return None;
    }
    let metadata = fs::metadata(&resolved).await.ok()?;
    metadata.is_file().then_some(resolved)
}

/// Reduce a client-supplied file name to its last path component. Both `/`
/// and `\` count as separators since uploads often come from Windows hosts.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains('\0') {
        return None;
    }
    Some(name.to_string())
}

/// `Content-Disposition` value with an ASCII fallback and an RFC 5987
/// encoded UTF-8 name.
pub fn attachment_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' { c } else { '_' })
        .collect();

    let encoded = urlencoding::encode(file_name);

    format!("attachment; filename=\"{}\"; filename*=UTF-8''{}", fallback, encoded)
}
