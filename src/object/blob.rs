use crate::error::Result;

use super::ObjectInfo;

/// decode a blob payload as text
///
/// only the header's terminating NUL is consumed; NULs embedded in the
/// payload itself are preserved.
pub fn decode(info: &ObjectInfo) -> Result<String> {
    Ok(String::from_utf8(info.payload().to_vec())?)
}
