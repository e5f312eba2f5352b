//! HTTP asset store client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{AssetError, AssetStore, StoredAsset};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a hosted media service with an upload/destroy API.
#[derive(Clone)]
pub struct HttpAssetStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

impl HttpAssetStore {
    pub fn new(base_url: String, api_key: String, api_secret: String) -> Result<Self, AssetError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AssetError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            api_secret,
        })
    }
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        folder: &str,
    ) -> Result<StoredAsset, AssetError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(
                mime_guess::from_path(filename)
                    .first_or_octet_stream()
                    .as_ref(),
            )
            .map_err(|e| AssetError::Upload(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("folder", folder.to_string());

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AssetError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AssetError::Upload(format!(
                "Upload returned {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AssetError::Upload(format!("Malformed upload response: {e}")))?;

        Ok(StoredAsset {
            asset_id: body.public_id,
            url: body.secure_url,
        })
    }

    async fn delete(&self, asset_id: &str) -> Result<(), AssetError> {
        let response = self
            .client
            .post(format!("{}/destroy", self.base_url))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .form(&[("public_id", asset_id)])
            .send()
            .await
            .map_err(|e| AssetError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AssetError::Delete(format!(
                "Destroy returned {}",
                response.status()
            )));
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| AssetError::Delete(format!("Malformed destroy response: {e}")))?;

        // The service reports "not found" as a result string, not an error
        // status; treat it as success since the asset is gone either way.
        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(AssetError::Delete(format!("Destroy result: {other}"))),
        }
    }
}
