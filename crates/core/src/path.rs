//! Block file path validation.

use crate::block::META_FILENAME;
use crate::error::{Error, Result};

/// Validate a URL-decoded relative path for a block file upload.
///
/// Exactly two shapes are accepted: the literal `index`, and `chunks/`
/// followed by a six-digit, zero-padded sequence number. Everything else is
/// rejected, which also rules out any traversal-capable string without
/// further normalization. Uploading the reserved descriptor name directly is
/// rejected with a distinct error, wherever it appears in the path.
pub fn validate_block_file_path(path: &str) -> Result<()> {
    let base = path.rsplit('/').next().unwrap_or(path);
    if base == META_FILENAME {
        return Err(Error::ReservedFileName(META_FILENAME.to_string()));
    }

    if !is_whitelisted(path) {
        return Err(Error::InvalidFilePath(path.to_string()));
    }

    Ok(())
}

fn is_whitelisted(path: &str) -> bool {
    if path == "index" {
        return true;
    }
    match path.strip_prefix("chunks/") {
        Some(seq) => seq.len() == 6 && seq.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
