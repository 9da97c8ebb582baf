// Items in this module are only used by tests.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;

/// a synthetic repository with a .git directory, built fresh per test
///
/// the temp directory is deleted when the struct is dropped. functions
/// panic instead of returning Results; this is test-only code.
pub(crate) struct FixtureRepo {
    #[allow(dead_code)] // tempdir is only kept for RAII
    tempdir: tempfile::TempDir,
    worktree: PathBuf,
}

impl FixtureRepo {
    pub(crate) fn new() -> FixtureRepo {
        let tempdir = tempfile::tempdir().unwrap();
        let worktree = tempdir.path().join("repo");

        fs::create_dir_all(worktree.join(".git/objects")).unwrap();
        fs::create_dir_all(worktree.join(".git/refs/heads")).unwrap();
        fs::write(worktree.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();

        FixtureRepo { tempdir, worktree }
    }

    pub(crate) fn worktree(&self) -> &Path {
        &self.worktree
    }

    pub(crate) fn git_dir(&self) -> PathBuf {
        self.worktree.join(".git")
    }

    /// store zlib-compressed bytes as the loose object for `id_hex`
    pub(crate) fn put_object(&self, id_hex: &str, decompressed: &[u8]) -> PathBuf {
        let dir = self.git_dir().join("objects").join(&id_hex[..2]);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(&id_hex[2..]);

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(decompressed).unwrap();
        fs::write(&path, encoder.finish().unwrap()).unwrap();

        path
    }

    /// store an object with `<kind> <len>\0<payload>` framing
    pub(crate) fn put_framed(&self, id_hex: &str, kind: &str, payload: &[u8]) -> PathBuf {
        let mut bytes = format!("{} {}\x00", kind, payload.len()).into_bytes();
        bytes.extend_from_slice(payload);
        self.put_object(id_hex, &bytes)
    }

    /// overwrite the HEAD file
    pub(crate) fn set_head(&self, content: &str) {
        fs::write(self.git_dir().join("HEAD"), content).unwrap();
    }

    /// write a ref file under .git, e.g. "refs/heads/main"
    pub(crate) fn put_ref(&self, name: &str, id_hex: &str) {
        let path = self.git_dir().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("{}\n", id_hex)).unwrap();
    }
}
