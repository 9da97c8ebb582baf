use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::id::ObjectId;
use crate::repo::GitDir;

/// where HEAD points
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HeadTarget {
    /// symbolic form, e.g. "refs/heads/main"
    Ref(String),
    /// detached: HEAD holds a commit id directly
    Detached(ObjectId),
}

/// read the first line of HEAD and classify its target
pub fn head_target(repo: &GitDir) -> Result<HeadTarget> {
    let line = read_first_line(&repo.head_path())?;

    if let Some(target) = line.strip_prefix("ref:") {
        return Ok(HeadTarget::Ref(target.trim().to_string()));
    }
    if ObjectId::is_valid(&line) {
        return Ok(HeadTarget::Detached(ObjectId::from_hex(&line)?));
    }
    Err(Error::MalformedRef(line))
}

/// name of the currently checked-out branch
///
/// strips the refs/heads/ prefix; other ref shapes and detached ids come
/// back verbatim.
pub fn head_branch(repo: &GitDir) -> Result<String> {
    match head_target(repo)? {
        HeadTarget::Ref(target) => Ok(target
            .strip_prefix("refs/heads/")
            .unwrap_or(&target)
            .to_string()),
        HeadTarget::Detached(id) => Ok(id.to_hex()),
    }
}

/// resolve HEAD to the commit id it points at
///
/// a symbolic target is followed one step: the ref file under the .git
/// directory holds the id on its first line.
pub fn resolve_head(repo: &GitDir) -> Result<ObjectId> {
    match head_target(repo)? {
        HeadTarget::Detached(id) => Ok(id),
        HeadTarget::Ref(target) => {
            let ref_path = repo.path().join(&target);
            let line =
                read_first_line(&ref_path).map_err(|_| Error::RefNotFound(target.clone()))?;
            ObjectId::from_hex(&line)
        }
    }
}

/// first line of a text file, trimmed
fn read_first_line(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::RefNotFound(path.display().to_string())
        } else {
            Error::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    Ok(content.lines().next().unwrap_or("").trim().to_string())
}
