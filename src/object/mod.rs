pub mod blob;
pub mod commit;
pub mod tree;

pub use tree::TreeEntry;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::id::ObjectId;
use crate::loose;
use crate::repo::{id_from_object_path, GitDir};

/// object kind from the header's type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Blob,
    Commit,
    Tree,
    /// any tag this crate does not decode (e.g. "tag"), or no header at all
    Unknown,
}

impl Kind {
    /// map a header tag to a kind
    pub fn from_tag(tag: &str) -> Kind {
        match tag {
            "blob" => Kind::Blob,
            "commit" => Kind::Commit,
            "tree" => Kind::Tree,
            _ => Kind::Unknown,
        }
    }

    /// the tag string for display
    pub fn type_name(&self) -> &'static str {
        match self {
            Kind::Blob => "blob",
            Kind::Commit => "commit",
            Kind::Tree => "tree",
            Kind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// decoded object base record: identity, raw bytes, header fields
///
/// `kind` falls back to Unknown and `size` to None when the header cannot
/// be parsed; the record itself is still returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectInfo {
    /// id reconstructed from the file path, when the path has object shape
    pub id: Option<ObjectId>,
    /// decompressed bytes, header included
    #[serde(skip)]
    pub raw: Vec<u8>,
    pub kind: Kind,
    /// size as declared in the header, not verified against the payload
    pub size: Option<u64>,
}

impl ObjectInfo {
    /// payload bytes after the header's terminating NUL
    ///
    /// empty when the raw bytes carry no NUL at all.
    pub fn payload(&self) -> &[u8] {
        match self.raw.iter().position(|&b| b == 0) {
            Some(nul) => &self.raw[nul + 1..],
            None => &[],
        }
    }
}

/// header bytes from offset 0 up to the first NUL, utf-8 decoded
///
/// None if there is no NUL or the bytes before it are not valid utf-8.
pub fn header_token(bytes: &[u8]) -> Option<&str> {
    let end = bytes.iter().position(|&b| b == 0)?;
    std::str::from_utf8(&bytes[..end]).ok()
}

/// split a header token into its (kind, size) fields
///
/// the token is `<kind> <size>`; both come back None when no space is
/// present. extra space-separated fields beyond the second are ignored.
pub fn parse_header(token: &str) -> (Option<&str>, Option<&str>) {
    if !token.contains(' ') {
        return (None, None);
    }
    let mut fields = token.split(' ');
    (fields.next(), fields.next())
}

/// decode the base record for the object file at `path`
///
/// fails only when the file cannot be read or inflated; a missing or
/// unparsable header still yields the record, with Unknown kind.
pub fn read_info(path: &Path) -> Result<ObjectInfo> {
    let raw = loose::inflate_file(path)?;
    let id = id_from_object_path(path);

    let (kind, size) = match header_token(&raw) {
        Some(token) => {
            let (tag, size) = parse_header(token);
            (
                tag.map(Kind::from_tag).unwrap_or(Kind::Unknown),
                size.and_then(|s| s.parse().ok()),
            )
        }
        None => (Kind::Unknown, None),
    };

    let info = ObjectInfo {
        id,
        raw,
        kind,
        size,
    };

    // declared size is reported as-is; a mismatch is diagnostic only
    if let Some(declared) = info.size {
        let actual = info.payload().len() as u64;
        if declared != actual {
            tracing::warn!(
                declared,
                actual,
                path = %path.display(),
                "header size does not match payload length"
            );
        }
    }

    Ok(info)
}

/// a fully decoded object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Object {
    Blob { info: ObjectInfo, content: String },
    Commit { info: ObjectInfo, content: String },
    Tree { info: ObjectInfo, entries: Vec<TreeEntry> },
    /// base record for kinds this crate does not decode
    Raw(ObjectInfo),
}

impl Object {
    /// the base record common to all variants
    pub fn info(&self) -> &ObjectInfo {
        match self {
            Object::Blob { info, .. } => info,
            Object::Commit { info, .. } => info,
            Object::Tree { info, .. } => info,
            Object::Raw(info) => info,
        }
    }
}

/// decode the object at `path`, dispatching once on its header kind
///
/// tree decoding resolves child kinds through `repo`'s object store.
/// unknown kinds come back as [`Object::Raw`] with the base record intact.
pub fn read_object(repo: &GitDir, path: &Path) -> Result<Object> {
    let info = read_info(path)?;

    match info.kind {
        Kind::Blob => {
            let content = blob::decode(&info)?;
            Ok(Object::Blob { info, content })
        }
        Kind::Commit => {
            let content = commit::decode(&info)?;
            Ok(Object::Commit { info, content })
        }
        Kind::Tree => {
            let entries = tree::decode(repo, &info)?;
            Ok(Object::Tree { info, entries })
        }
        Kind::Unknown => Ok(Object::Raw(info)),
    }
}

/// decode the object with the given id from the repository's store
pub fn read_object_by_id(repo: &GitDir, id: &ObjectId) -> Result<Object> {
    let path = repo.object_path(id)?;
    read_object(repo, &path)
}
