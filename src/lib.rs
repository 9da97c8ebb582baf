//! gitpeek - read-only decoder for git loose objects
//!
//! parses the on-disk object store of a git repository without shelling out
//! to git: locate the .git directory, inflate the zlib-compressed loose
//! object files, and decode their type-tagged, length-prefixed payloads
//! into typed records.
//!
//! # Core concepts
//!
//! - **ObjectId**: the 40-hex SHA-1 content address; also the on-disk
//!   location (2-char directory + 38-char file under objects/)
//! - **GitDir**: a located .git directory, discovered from any path
//! - **Object**: a decoded blob, commit, or tree; unknown kinds keep the
//!   base record
//! - **HeadTarget**: where .git/HEAD points (a branch ref or a detached id)
//!
//! only loose objects are understood; packfiles are out of scope, as is any
//! kind of write access.
//!
//! # Example usage
//!
//! ```no_run
//! use gitpeek::{read_object_by_id, GitDir, Object, ObjectId};
//! use std::path::Path;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let repo = GitDir::discover(Path::new("."), &cwd).unwrap();
//!
//! let id = ObjectId::from_hex("abcdef0123456789abcdef0123456789abcdef01").unwrap();
//! match read_object_by_id(&repo, &id).unwrap() {
//!     Object::Blob { content, .. } => print!("{}", content),
//!     Object::Tree { entries, .. } => {
//!         for entry in entries {
//!             println!("{}", entry);
//!         }
//!     }
//!     other => println!("{}", other.info().kind),
//! }
//! ```

mod error;
mod head;
mod id;
mod loose;
mod object;
mod repo;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use head::{head_branch, head_target, resolve_head, HeadTarget};
pub use id::ObjectId;
pub use loose::{describe_file_type, inflate_file, is_loose_object, is_zlib_file, ZLIB_MARKER};
pub use object::{
    header_token, parse_header, read_info, read_object, read_object_by_id, Kind, Object,
    ObjectInfo, TreeEntry,
};
pub use repo::{id_from_object_path, GitDir};
