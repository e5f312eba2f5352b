//! Image upload handler
//!
//! Receives multipart image files, stages each to a temp file, and pushes
//! them to the asset store. If any file in the batch fails, assets already
//! uploaded in the same request are deleted again so a partial batch never
//! leaks remote assets.

use std::io::{Read, Seek, SeekFrom, Write};

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;

use crate::assets::{AssetStore, StoredAsset, cleanup};
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};

/// Per-file size cap (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
/// Whole-request cap: a batch of up to 10 files plus form overhead
pub const MAX_REQUEST_SIZE: usize = 105 * 1024 * 1024;

const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Serialize)]
pub struct UploadedImage {
    pub asset_id: String,
    pub url: String,
    pub original_name: String,
    pub size: usize,
}

fn extension_of(filename: &str) -> Option<String> {
    filename.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
}

fn validate_image(data: &[u8], filename: &str) -> AppResult<()> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "{}: file too large, maximum is {}MB",
            filename,
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let ext = extension_of(filename)
        .ok_or_else(|| AppError::validation(format!("{}: missing file extension", filename)))?;
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::validation(format!(
            "{}: unsupported format '{}', supported: {}",
            filename,
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    // The extension is client-supplied; check the bytes actually decode
    image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("{}: invalid image: {}", filename, e)))?;

    Ok(())
}

/// Stage to a temp file and read back. The file is removed on drop, on every
/// exit path.
fn stage_through_tempfile(data: &[u8]) -> AppResult<Vec<u8>> {
    let mut staged = tempfile::tempfile()
        .map_err(|e| AppError::internal(format!("Failed to stage upload: {}", e)))?;
    staged
        .write_all(data)
        .map_err(|e| AppError::internal(format!("Failed to stage upload: {}", e)))?;
    staged
        .seek(SeekFrom::Start(0))
        .map_err(|e| AppError::internal(format!("Failed to stage upload: {}", e)))?;
    let mut bytes = Vec::with_capacity(data.len());
    staged
        .read_to_end(&mut bytes)
        .map_err(|e| AppError::internal(format!("Failed to stage upload: {}", e)))?;
    Ok(bytes)
}

/// POST /api/upload
pub async fn upload(
    State(state): State<ServerState>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> AppResult<Json<AppResponse<Vec<UploadedImage>>>> {
    let mut folder = "products".to_string();
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("folder") => {
                let value = field.text().await?;
                if !value.trim().is_empty() {
                    folder = value.trim().to_string();
                }
            }
            Some("file") | Some("files") => {
                let original_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::validation("File field without a filename"))?;
                let data = field.bytes().await?.to_vec();
                files.push((original_name, data));
            }
            _ => continue,
        }
    }

    if files.is_empty() {
        return Err(AppError::validation("No files in upload request"));
    }

    let uploaded = store_batch(state.assets.as_ref(), &files, &folder).await?;
    let count = uploaded.len();
    Ok(ok_with_message(
        uploaded,
        format!("{count} file(s) uploaded"),
    ))
}

/// Validate, stage and push a batch of files. If any file fails, assets
/// already uploaded in the same batch are deleted again before the error is
/// returned.
async fn store_batch(
    store: &dyn AssetStore,
    files: &[(String, Vec<u8>)],
    folder: &str,
) -> AppResult<Vec<UploadedImage>> {
    let mut uploaded: Vec<UploadedImage> = Vec::new();

    for (original_name, data) in files {
        let result = async {
            validate_image(data, original_name)?;
            let bytes = stage_through_tempfile(data)?;
            store
                .upload(original_name, bytes, folder)
                .await
                .map_err(AppError::from)
        }
        .await;

        match result {
            Ok(StoredAsset { asset_id, url }) => uploaded.push(UploadedImage {
                asset_id,
                url,
                original_name: original_name.clone(),
                size: data.len(),
            }),
            Err(err) => {
                // Compensate: drop what this batch already pushed
                let ids: Vec<String> = uploaded.iter().map(|u| u.asset_id.clone()).collect();
                if !ids.is_empty() {
                    tracing::warn!(
                        count = ids.len(),
                        "Upload batch failed, removing already uploaded assets"
                    );
                    cleanup::delete_all(store, &ids).await;
                }
                return Err(err);
            }
        }
    }

    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_parsing() {
        assert_eq!(extension_of("rug.JPG"), Some("jpg".to_string()));
        assert_eq!(extension_of("a.b.webp"), Some("webp".to_string()));
        assert_eq!(extension_of("noext"), None);
    }

    #[test]
    fn rejects_oversized_file() {
        let data = vec![0u8; MAX_FILE_SIZE + 1];
        assert!(validate_image(&data, "big.png").is_err());
    }

    #[test]
    fn rejects_wrong_extension_and_bad_bytes() {
        assert!(validate_image(b"GIF89a", "anim.gif").is_err());
        // Right extension, not an image
        assert!(validate_image(b"not an image", "fake.png").is_err());
    }

    #[test]
    fn accepts_real_png() {
        let img = image::RgbImage::new(2, 2);
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        assert!(validate_image(&bytes, "tiny.png").is_ok());
    }

    #[test]
    fn tempfile_staging_round_trips() {
        let bytes = stage_through_tempfile(b"abc123").unwrap();
        assert_eq!(bytes, b"abc123");
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::new(2, 2);
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        bytes
    }

    #[tokio::test]
    async fn batch_uploads_all_files() {
        let store = crate::assets::MemoryAssetStore::new();
        let files = vec![
            ("one.png".to_string(), png_bytes()),
            ("two.png".to_string(), png_bytes()),
        ];

        let uploaded = store_batch(&store, &files, "products").await.unwrap();

        assert_eq!(uploaded.len(), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(uploaded[0].original_name, "one.png");
    }

    #[tokio::test]
    async fn failed_file_rolls_back_earlier_uploads_in_the_batch() {
        let store = crate::assets::MemoryAssetStore::new();
        store.fail_upload("two.png");
        let files = vec![
            ("one.png".to_string(), png_bytes()),
            ("two.png".to_string(), png_bytes()),
        ];

        let err = store_batch(&store, &files, "products").await.unwrap_err();

        assert!(matches!(err, AppError::AssetStore(_)));
        // one.png made it to the store first and was deleted again
        assert!(store.is_empty());
        assert_eq!(store.delete_calls(), 1);
    }

    #[tokio::test]
    async fn invalid_file_in_batch_rolls_back_and_uploads_nothing_more() {
        let store = crate::assets::MemoryAssetStore::new();
        let files = vec![
            ("one.png".to_string(), png_bytes()),
            ("fake.png".to_string(), b"not an image".to_vec()),
            ("three.png".to_string(), png_bytes()),
        ];

        let err = store_batch(&store, &files, "products").await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.is_empty());
    }
}
