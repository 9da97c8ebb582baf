use crate::error::Result;

use super::ObjectInfo;

/// decode a commit payload as text
///
/// the outer framing delimits the commit's sections with NUL bytes; the
/// canonical text form is newline-delimited, so every NUL after the header
/// becomes a newline.
pub fn decode(info: &ObjectInfo) -> Result<String> {
    let text: Vec<u8> = info
        .payload()
        .iter()
        .map(|&b| if b == 0 { b'\n' } else { b })
        .collect();
    Ok(String::from_utf8(text)?)
}
