use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use flate2::read::ZlibDecoder;

use crate::error::{Error, Result};
use crate::object;

/// marker substring identifying zlib streams in [`describe_file_type`] output
pub const ZLIB_MARKER: &str = "zlib compressed data";

/// read a loose object file and inflate its zlib stream
///
/// read and inflate failures are logged and surface as errors; callers
/// treat the object as absent. nothing panics past this boundary.
pub fn inflate_file(path: &Path) -> Result<Vec<u8>> {
    let compressed = fs::read(path).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "failed to read object file");
        Error::Io {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    let mut decoder = ZlibDecoder::new(&compressed[..]);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "failed to inflate object file");
        Error::Inflate {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    Ok(decompressed)
}

/// short human-readable description of a file's content type
///
/// the only description consumers rely on is the zlib one: a CMF byte of
/// 0x78 (deflate, 32K window, the only form git writes) with a valid
/// FLG check byte.
pub fn describe_file_type(path: &Path) -> String {
    let mut magic = [0u8; 2];
    let n = match File::open(path).and_then(|mut f| f.read(&mut magic)) {
        Ok(n) => n,
        Err(_) => return "cannot open file".to_string(),
    };

    match n {
        0 => "empty".to_string(),
        2 if magic[0] == 0x78 && (u16::from(magic[0]) * 256 + u16::from(magic[1])) % 31 == 0 => {
            ZLIB_MARKER.to_string()
        }
        _ => "data".to_string(),
    }
}

/// true if the file's detected type is a zlib stream
pub fn is_zlib_file(path: &Path) -> bool {
    describe_file_type(path).contains(ZLIB_MARKER)
}

/// true if `path` looks like, and decodes like, a loose object
///
/// the file must live under a .git/objects directory, sniff as zlib,
/// inflate cleanly, and carry a `<kind> <size>` header.
pub fn is_loose_object(path: &Path) -> bool {
    let resolved = match fs::canonicalize(path) {
        Ok(p) => p,
        Err(_) => return false,
    };

    if !in_object_store(&resolved) {
        return false;
    }
    if !is_zlib_file(&resolved) {
        return false;
    }

    let decompressed = match inflate_file(&resolved) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    match object::header_token(&decompressed) {
        Some(token) => object::parse_header(token).0.is_some(),
        None => false,
    }
}

/// true if the file's parent chain contains a .git/objects segment
fn in_object_store(path: &Path) -> bool {
    let parent = match path.parent() {
        Some(p) => p,
        None => return false,
    };
    let components: Vec<_> = parent.components().map(|c| c.as_os_str()).collect();
    components
        .windows(2)
        .any(|pair| pair[0] == ".git" && pair[1] == "objects")
}
