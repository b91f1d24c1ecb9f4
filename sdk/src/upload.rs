//! Directory uploads to content-addressed storage.

use crate::constants::{IMAGES_SUBDIR, METADATA_SUBDIR, STORAGE_UPLOAD_ENDPOINT};
use crate::error::Error;
use crate::fs::AssetSource;
use crate::models::{AssetFile, MinterResult};
use crate::verify::has_image_extension;
use itertools::Itertools;
use reqwest::multipart::Form;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    value: UploadValue,
}

#[derive(Debug, Deserialize)]
struct UploadValue {
    cid: String,
}

/// Client for the content-addressed storage HTTP API.
pub struct StorageClient {
    api_key: String,
    endpoint: String,
    http_client: reqwest::Client,
}

impl StorageClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: STORAGE_UPLOAD_ENDPOINT.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Upload every file as one flat directory and return the content
    /// address under which it is retrievable.
    pub async fn upload_directory(&self, files: Vec<AssetFile>) -> MinterResult<String> {
        let count = files.len();
        let mut form = Form::new();
        for file in &files {
            form = form.part("file", file.to_form_part().await?);
        }
        tracing::debug!(count, "uploading asset directory");

        let response = self
            .http_client
            .post(format!("{}/upload", self.endpoint))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::StorageServerError {
                status: response.status().as_u16(),
                message: response.json::<Value>().await?,
            });
        }

        let response = response.json::<UploadResponse>().await?;
        tracing::debug!(cid = %response.value.cid, "upload complete");
        Ok(response.value.cid)
    }
}

/// Build the flat upload list: every image in `images/` followed by the
/// metadata file sharing its stem from `jsons/`.
pub async fn collect_asset_files(
    source: &dyn AssetSource,
    base_dir: &Path,
) -> MinterResult<Vec<AssetFile>> {
    let image_dir = base_dir.join(IMAGES_SUBDIR);
    let metadata_dir = base_dir.join(METADATA_SUBDIR);
    let mut files = Vec::new();
    for name in source.list_dir(&image_dir).await?.into_iter().sorted() {
        if !has_image_extension(&name) {
            continue;
        }
        let stem = Path::new(&name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&name)
            .to_string();
        files.push(AssetFile::file(name.clone(), image_dir.join(&name)));
        let metadata_name = format!("{}.json", stem);
        files.push(AssetFile::file(
            metadata_name.clone(),
            metadata_dir.join(&metadata_name),
        ));
    }
    Ok(files)
}
