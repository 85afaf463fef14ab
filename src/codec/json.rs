use crate::errors::AppError;
use crate::models::Digest;

/// Pretty-printed digest. This is also the format the importer accepts.
pub fn export_json(digest: &Digest) -> Result<Vec<u8>, AppError> {
    Ok(serde_json::to_vec_pretty(digest)?)
}
