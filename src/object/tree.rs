use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::id::ObjectId;
use crate::repo::GitDir;

use super::{read_info, Kind, ObjectInfo};

/// one entry of a tree object, in on-disk order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    /// permission field, normalized to 6 digits
    pub mode: String,
    /// kind of the referenced child object
    pub kind: Kind,
    pub id: ObjectId,
    /// path segment, not a full path
    pub name: String,
}

impl fmt::Display for TreeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}    {}", self.mode, self.kind, self.id, self.name)
    }
}

/// decode a packed tree payload into its entries
///
/// the payload is a sequence of `<mode><SP><name><NUL><20-byte id>` with
/// nothing separating one entry's id bytes from the next entry's mode. the
/// parse consumes each entry's exact length in a single forward pass, so
/// truncated or non-digit-mode input fails the whole decode rather than
/// mis-segmenting.
///
/// each child's kind is resolved by reading that object's header from the
/// same store; a missing child is an error, not a partial result.
pub fn decode(repo: &GitDir, info: &ObjectInfo) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    let mut rest = info.payload();

    while !rest.is_empty() {
        let (entry, remainder) = parse_entry(repo, rest)?;
        entries.push(entry);
        rest = remainder;
    }

    Ok(entries)
}

fn parse_entry<'a>(repo: &GitDir, bytes: &'a [u8]) -> Result<(TreeEntry, &'a [u8])> {
    let space = bytes
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| Error::MalformedTree("entry has no mode terminator".to_string()))?;

    let mode_field = &bytes[..space];
    if mode_field.is_empty() || mode_field.len() > 6 || !mode_field.iter().all(u8::is_ascii_digit)
    {
        return Err(Error::MalformedTree(format!(
            "bad mode field: {:?}",
            String::from_utf8_lossy(mode_field)
        )));
    }
    // trees omit the leading zero for non-executable regular files
    let mode = format!("{:0>6}", String::from_utf8_lossy(mode_field));

    let rest = &bytes[space + 1..];
    let nul = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::MalformedTree("entry has no name terminator".to_string()))?;
    let name = String::from_utf8(rest[..nul].to_vec())?;

    let id_bytes = rest
        .get(nul + 1..nul + 21)
        .ok_or_else(|| Error::MalformedTree(format!("truncated id for entry {:?}", name)))?;
    let id = ObjectId::from_raw(id_bytes)?;

    // the child's kind comes from its own header
    let child_path = repo.object_path(&id).map_err(|_| Error::MissingChild(id))?;
    let child = read_info(&child_path).map_err(|_| Error::MissingChild(id))?;

    let entry = TreeEntry {
        mode,
        kind: child.kind,
        id,
        name,
    };
    Ok((entry, &rest[nul + 21..]))
}

#[cfg(test)]
mod tests {
    use super::super::{read_object, Object};
    use super::*;
    use crate::test_support::FixtureRepo;

    const BLOB_HEX: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const SUBTREE_HEX: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    const TREE_HEX: &str = "cccccccccccccccccccccccccccccccccccccccc";

    /// pack (mode, name, id_hex) triples into tree payload bytes
    fn tree_payload(entries: &[(&str, &str, &str)]) -> Vec<u8> {
        let mut payload = Vec::new();
        for (mode, name, id_hex) in entries {
            payload.extend_from_slice(mode.as_bytes());
            payload.push(b' ');
            payload.extend_from_slice(name.as_bytes());
            payload.push(0);
            payload.extend_from_slice(&hex::decode(id_hex).unwrap());
        }
        payload
    }

    fn fixture_with_children() -> FixtureRepo {
        let fixture = FixtureRepo::new();
        fixture.put_framed(BLOB_HEX, "blob", b"file contents");
        fixture.put_framed(SUBTREE_HEX, "tree", b"");
        fixture
    }

    #[test]
    fn test_decode_two_entries() {
        let fixture = fixture_with_children();
        let payload = tree_payload(&[
            ("100644", "file.txt", BLOB_HEX),
            ("40000", "dir", SUBTREE_HEX),
        ]);
        let path = fixture.put_framed(TREE_HEX, "tree", &payload);

        let repo = GitDir::discover(&fixture.git_dir(), fixture.worktree()).unwrap();
        let info = read_info(&path).unwrap();
        let entries = decode(&repo, &info).unwrap();

        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].mode, "100644");
        assert_eq!(entries[0].kind, Kind::Blob);
        assert_eq!(entries[0].id.to_hex(), BLOB_HEX);
        assert_eq!(entries[0].name, "file.txt");

        // the 5-digit directory mode is normalized
        assert_eq!(entries[1].mode, "040000");
        assert_eq!(entries[1].kind, Kind::Tree);
        assert_eq!(entries[1].name, "dir");
    }

    #[test]
    fn test_decode_preserves_order() {
        let fixture = fixture_with_children();
        let payload = tree_payload(&[
            ("100644", "zebra", BLOB_HEX),
            ("100644", "alpha", BLOB_HEX),
            ("100755", "middle", BLOB_HEX),
        ]);
        let path = fixture.put_framed(TREE_HEX, "tree", &payload);

        let repo = GitDir::discover(&fixture.git_dir(), fixture.worktree()).unwrap();
        let entries = decode(&repo, &read_info(&path).unwrap()).unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["zebra", "alpha", "middle"]);
    }

    #[test]
    fn test_decode_empty_tree() {
        let fixture = FixtureRepo::new();
        let path = fixture.put_framed(TREE_HEX, "tree", b"");

        let repo = GitDir::discover(&fixture.git_dir(), fixture.worktree()).unwrap();
        let entries = decode(&repo, &read_info(&path).unwrap()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_decode_missing_child() {
        let fixture = FixtureRepo::new();
        // references a child object that was never stored
        let payload = tree_payload(&[("100644", "ghost.txt", BLOB_HEX)]);
        let path = fixture.put_framed(TREE_HEX, "tree", &payload);

        let repo = GitDir::discover(&fixture.git_dir(), fixture.worktree()).unwrap();
        let result = decode(&repo, &read_info(&path).unwrap());
        assert!(matches!(result, Err(Error::MissingChild(_))));
    }

    #[test]
    fn test_decode_truncated_id() {
        let fixture = fixture_with_children();
        let mut payload = tree_payload(&[("100644", "file.txt", BLOB_HEX)]);
        payload.truncate(payload.len() - 5);
        let path = fixture.put_framed(TREE_HEX, "tree", &payload);

        let repo = GitDir::discover(&fixture.git_dir(), fixture.worktree()).unwrap();
        let result = decode(&repo, &read_info(&path).unwrap());
        assert!(matches!(result, Err(Error::MalformedTree(_))));
    }

    #[test]
    fn test_decode_non_digit_mode() {
        let fixture = fixture_with_children();
        let mut payload = Vec::new();
        payload.extend_from_slice(b"10w644 file.txt\x00");
        payload.extend_from_slice(&hex::decode(BLOB_HEX).unwrap());
        let path = fixture.put_framed(TREE_HEX, "tree", &payload);

        let repo = GitDir::discover(&fixture.git_dir(), fixture.worktree()).unwrap();
        let result = decode(&repo, &read_info(&path).unwrap());
        assert!(matches!(result, Err(Error::MalformedTree(_))));
    }

    #[test]
    fn test_decode_through_dispatch() {
        let fixture = fixture_with_children();
        let payload = tree_payload(&[("100644", "file.txt", BLOB_HEX)]);
        let path = fixture.put_framed(TREE_HEX, "tree", &payload);

        let repo = GitDir::discover(&fixture.git_dir(), fixture.worktree()).unwrap();
        match read_object(&repo, &path).unwrap() {
            Object::Tree { entries, .. } => {
                assert_eq!(entries.len(), 1);
                assert_eq!(
                    entries[0].to_string(),
                    format!("100644 blob {}    file.txt", BLOB_HEX)
                );
            }
            other => panic!("expected tree, got {:?}", other),
        }
    }
}
