use {std::path::Path, tracing::debug};

use crate::{Error, Result};

/// Write `body` to `path`, replacing whatever was there.
pub async fn write_output(path: &Path, body: &[u8]) -> Result<()> {
    tokio::fs::write(path, body).await.map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = body.len(), "history response written");
    Ok(())
}
