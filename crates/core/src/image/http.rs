//! HTTP image fetcher backed by reqwest.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{image_file_name, ImageError, ImageFetcher};
use crate::cat::Cat;
use crate::config::ImageConfig;
use crate::metrics::IMAGE_DOWNLOAD_DURATION;

/// Downloads images over HTTP into a local directory.
pub struct HttpImageFetcher {
    client: Client,
    download_dir: PathBuf,
}

impl HttpImageFetcher {
    pub fn new(config: &ImageConfig) -> Result<Self, ImageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ImageError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            download_dir: config.download_dir.clone(),
        })
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ImageError::Request(format!("timed out fetching {}", url))
            } else {
                ImageError::Request(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(ImageError::Status(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::Request(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, cat: &Cat) -> Result<PathBuf, ImageError> {
        let file_name = image_file_name(cat)?;
        let destination = self.download_dir.join(&file_name);
        let start = Instant::now();

        let bytes = self.download(&cat.url).await?;

        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|e| ImageError::Io(format!("{}: {}", self.download_dir.display(), e)))?;

        // Unique temp name so concurrent downloads of the same cat never
        // interleave; the final rename makes the last writer win.
        let tmp_path = self
            .download_dir
            .join(format!(".{}.{}.part", file_name, uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp_path, &bytes)
            .await
            .map_err(|e| ImageError::Io(format!("{}: {}", tmp_path.display(), e)))?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &destination).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(ImageError::Io(format!("{}: {}", destination.display(), e)));
        }

        IMAGE_DOWNLOAD_DURATION.observe(start.elapsed().as_secs_f64());
        debug!(
            cat_id = %cat.id,
            path = %destination.display(),
            bytes = bytes.len(),
            "Image downloaded"
        );
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    /// Serve a fixed image body and a 404 route on an ephemeral port.
    async fn spawn_image_server() -> String {
        let app = Router::new()
            .route("/img/tom.png", get(|| async { b"PNGDATA".to_vec() }))
            .route("/img/gone.png", get(|| async { StatusCode::NOT_FOUND }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fetcher(dir: &Path) -> HttpImageFetcher {
        HttpImageFetcher::new(&ImageConfig {
            download_dir: dir.join("Downloads"),
            timeout_secs: 5,
            connect_timeout_secs: 2,
        })
        .unwrap()
    }

    fn cat(url: String) -> Cat {
        Cat {
            id: "cat-1".to_string(),
            url,
            source_url: None,
            name: "Tom".to_string(),
            loves: 0,
            hates: 0,
        }
    }

    #[tokio::test]
    async fn test_fetch_writes_file_and_creates_directory() {
        let base = spawn_image_server().await;
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(dir.path());
        assert!(!fetcher.download_dir().exists());

        let path = fetcher
            .fetch(&cat(format!("{}/img/tom.png", base)))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("Downloads").join("Tom.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"PNGDATA");
        // No temp files left behind.
        assert_eq!(std::fs::read_dir(fetcher.download_dir()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let base = spawn_image_server().await;
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(dir.path());

        let result = fetcher.fetch(&cat(format!("{}/img/gone.png", base))).await;

        assert!(matches!(result, Err(ImageError::Status(404))));
        assert!(!dir.path().join("Downloads").join("Tom.png").exists());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(dir.path());

        // Port 9 (discard) on localhost is closed in test environments.
        let result = fetcher.fetch(&cat("http://127.0.0.1:9/tom.png".to_string())).await;

        assert!(matches!(result, Err(ImageError::Request(_))));
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(dir.path());

        let result = fetcher.fetch(&cat("not a url.png".to_string())).await;

        assert!(matches!(result, Err(ImageError::Request(_))));
    }
}
