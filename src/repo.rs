use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::id::ObjectId;

/// a located .git metadata directory
///
/// holding one of these means the directory existed and contained an
/// objects/ store at discovery time; nothing is cached beyond the path.
pub struct GitDir {
    path: PathBuf,
}

impl GitDir {
    /// discover the .git directory reachable from `start`
    ///
    /// `start` is resolved to an absolute, symlink-free form first. if that
    /// form is a .git directory or lies inside one, the enclosing .git
    /// directory is the candidate; otherwise the candidate is a .git entry
    /// directly under `cwd`. a candidate without an objects/ subdirectory
    /// is not a repository.
    ///
    /// `cwd` is the caller's working directory, passed explicitly so the
    /// library never captures process-global state.
    pub fn discover(start: &Path, cwd: &Path) -> Result<Self> {
        let resolved =
            fs::canonicalize(start).map_err(|_| Error::NoRepo(start.to_path_buf()))?;

        let candidate = if resolved.file_name() == Some(OsStr::new(".git")) {
            // the path is the .git directory itself
            resolved.is_dir().then(|| resolved.clone())
        } else if let Some(dir) = enclosing_git_dir(&resolved) {
            Some(dir)
        } else if cwd.join(".git").exists() {
            Some(cwd.join(".git"))
        } else {
            None
        };

        match candidate {
            Some(path) if path.join("objects").is_dir() => Ok(Self { path }),
            _ => Err(Error::NoRepo(start.to_path_buf())),
        }
    }

    /// path of the .git directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// path to the loose object store
    pub fn objects_dir(&self) -> PathBuf {
        self.path.join("objects")
    }

    /// path to the HEAD pointer file
    pub fn head_path(&self) -> PathBuf {
        self.path.join("HEAD")
    }

    /// on-disk path of the loose object with the given id
    ///
    /// the 2-char prefix directory and the object file must both exist.
    pub fn object_path(&self, id: &ObjectId) -> Result<PathBuf> {
        let (dir, file) = id.to_path_components();

        let prefix_dir = self.objects_dir().join(dir);
        if !prefix_dir.is_dir() {
            return Err(Error::ObjectNotFound(*id));
        }

        let object_path = prefix_dir.join(file);
        if !object_path.is_file() {
            return Err(Error::ObjectNotFound(*id));
        }

        Ok(object_path)
    }
}

/// the ancestor prefix ending at the first .git component, if any
///
/// only interior components count; a path whose final component is .git is
/// handled by the caller.
fn enclosing_git_dir(path: &Path) -> Option<PathBuf> {
    let mut prefix = PathBuf::new();
    for component in path.components() {
        prefix.push(component);
        if component.as_os_str() == ".git" {
            return Some(prefix);
        }
    }
    None
}

/// reconstruct an object id from an objects/<2-hex>/<38-hex> file path
///
/// the parent directory's basename supplies the first 2 chars and the file
/// basename the remaining 38; None unless the concatenation is a valid id.
pub fn id_from_object_path(path: &Path) -> Option<ObjectId> {
    let file = path.file_name()?.to_str()?;
    let dir = path.parent()?.file_name()?.to_str()?;
    ObjectId::from_hex(&format!("{}{}", dir, file)).ok()
}
