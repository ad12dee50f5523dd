use crate::config::StoreConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Downloads a photo and writes it to disk
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Returns true only when the file at `destination` was fully replaced
    async fn fetch_and_persist(&self, url: &str, destination: &Path) -> bool;
}

/// File a photo for `local_id` is stored at
pub fn destination_for(output_dir: &Path, local_id: &str) -> PathBuf {
    output_dir.join(format!("{}.jpg", local_id))
}

/// Decode any supported image and re-encode it as an RGB JPEG
pub fn normalize(bytes: &[u8], quality: u8) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes).map_err(Error::Decode)?;
    tracing::debug!(
        "Decoded {}x{} image ({:?})",
        decoded.width(),
        decoded.height(),
        decoded.color()
    );

    encode_jpeg(&decoded.to_rgb8(), quality)
}

fn encode_jpeg(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut encoded = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut encoded, quality))
        .map_err(Error::Encode)?;
    Ok(encoded)
}

/// Write bytes next to `destination`, then rename over it.
///
/// Readers only ever see the previous file or the complete new one.
pub fn persist(bytes: &[u8], destination: &Path) -> Result<()> {
    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;

    // Staged files are created 0600; published photos must be world-readable
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    staged.persist(destination).map_err(|e| e.error)?;

    Ok(())
}

/// HTTP-backed photo store producing JPEG files
pub struct ImageStore {
    client: reqwest::Client,
    jpeg_quality: u8,
}

impl ImageStore {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self::with_client(client, config.jpeg_quality))
    }

    pub fn with_client(client: reqwest::Client, jpeg_quality: u8) -> Self {
        Self {
            client,
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    /// Download the raw payload, failing on any non-success status
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Fetching photo: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        tracing::debug!("Fetched {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    async fn try_fetch_and_persist(&self, url: &str, destination: &Path) -> Result<()> {
        let raw = self.fetch(url).await?;

        let quality = self.jpeg_quality;
        let destination = destination.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let jpeg = normalize(&raw, quality)?;
            persist(&jpeg, &destination)
        })
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }
}

#[async_trait]
impl PhotoStore for ImageStore {
    async fn fetch_and_persist(&self, url: &str, destination: &Path) -> bool {
        match self.try_fetch_and_persist(url, destination).await {
            Ok(()) => {
                tracing::info!("Saved photo to {}", destination.display());
                true
            }
            Err(Error::HttpStatus(code)) => {
                tracing::warn!("Photo download returned HTTP {}: {}", code, url);
                false
            }
            Err(e) => {
                tracing::warn!("Could not save photo to {}: {}", destination.display(), e);
                false
            }
        }
    }
}
