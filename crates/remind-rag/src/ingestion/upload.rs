//! Plain-text upload checks

use crate::error::{Error, Result};

/// Whether an upload is plain text.
///
/// A declared content type wins; when the client sent none (or the generic
/// `application/octet-stream`), the type is guessed from the filename.
pub fn is_plain_text(filename: &str, content_type: Option<&str>) -> bool {
    let declared = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");

    match declared {
        Some(ct) => ct == "text/plain",
        None => mime_guess::from_path(filename)
            .first()
            .map_or(false, |mime| mime.essence_str() == "text/plain"),
    }
}

/// Check and decode an uploaded file into its text content
pub fn decode_text_upload(
    filename: &str,
    content_type: Option<&str>,
    data: Vec<u8>,
) -> Result<String> {
    if !is_plain_text(filename, content_type) {
        return Err(Error::validation("Only .txt files are allowed"));
    }

    String::from_utf8(data)
        .map_err(|_| Error::validation(format!("File '{}' is not valid UTF-8 text", filename)))
}
