use crate::models::MinterResult;
use async_trait::async_trait;
use itertools::Itertools;
use std::path::Path;

/// Filesystem capability consumed by the verifier and the upload pairing,
/// so both can run against an in-memory source in tests.
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn list_dir(&self, path: &Path) -> MinterResult<Vec<String>>;
    async fn read_file(&self, path: &Path) -> MinterResult<Vec<u8>>;
    async fn write_file(&self, path: &Path, bytes: &[u8]) -> MinterResult<()>;
}

/// [`AssetSource`] backed by the local filesystem.
pub struct LocalFs;

#[async_trait]
impl AssetSource for LocalFs {
    async fn list_dir(&self, path: &Path) -> MinterResult<Vec<String>> {
        let mut entries = tokio::fs::read_dir(path).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        // read_dir order is platform-dependent
        Ok(names.into_iter().sorted().collect())
    }

    async fn read_file(&self, path: &Path) -> MinterResult<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }

    async fn write_file(&self, path: &Path, bytes: &[u8]) -> MinterResult<()> {
        Ok(tokio::fs::write(path, bytes).await?)
    }
}
