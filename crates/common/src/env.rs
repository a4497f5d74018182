//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::info;

/// Ensure the upload root exists, creating it when missing.
pub async fn ensure_env(upload_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(upload_dir).await.is_err() {
        info!(%upload_dir, "upload directory missing; creating it");
    }
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {upload_dir}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ensure_env;

    #[tokio::test]
    async fn creates_missing_upload_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("storefront-env-{}", uuid::Uuid::new_v4()));
        let path = dir.join("uploads");
        ensure_env(path.to_str().unwrap()).await?;
        assert!(tokio::fs::metadata(&path).await?.is_dir());
        // idempotent
        ensure_env(path.to_str().unwrap()).await?;
        tokio::fs::remove_dir_all(&dir).await?;
        Ok(())
    }
}
