/// Image fetching and decoding
///
/// Loads an image reference (remote URL, `file://` URL or plain path),
/// decodes it and downscales it for display. Decoding runs on a blocking
/// worker so the UI thread never stalls on large pictures.
use image::imageops::FilterType;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tokio::task;

/// Decoded images are scaled to fit inside this square
pub const MAX_DIMENSION: u32 = 512;

/// Give up on remote images after this long
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Why an image could not be displayed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageError {
    #[error("request for {url} failed: {message}")]
    Fetch { url: String, message: String },
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("task join error: {0}")]
    Task(String),
}

/// RGBA pixels ready to hand to the renderer
#[derive(Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Where an image reference points
#[derive(Debug, PartialEq)]
enum Source<'a> {
    Remote(&'a str),
    Local(PathBuf),
}

fn classify(url: &str) -> Source<'_> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Source::Remote(url)
    } else if let Some(path) = url.strip_prefix("file://") {
        Source::Local(PathBuf::from(path))
    } else {
        Source::Local(PathBuf::from(url))
    }
}

fn client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_default()
    })
}

/// Load and decode the image behind `url`
pub async fn load_image(url: String) -> Result<DecodedImage, ImageError> {
    let bytes = fetch_bytes(&url).await?;

    task::spawn_blocking(move || decode_to_fit(&bytes))
        .await
        .map_err(|e| ImageError::Task(e.to_string()))?
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ImageError> {
    match classify(url) {
        Source::Remote(remote) => {
            let fetch_error = |e: reqwest::Error| ImageError::Fetch {
                url: remote.to_string(),
                message: e.to_string(),
            };

            let response = client()
                .get(remote)
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(fetch_error)?;
            let bytes = response.bytes().await.map_err(fetch_error)?;
            Ok(bytes.to_vec())
        }
        Source::Local(path) => tokio::fs::read(&path).await.map_err(|e| ImageError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}

/// Decode and shrink to fit within MAX_DIMENSION, keeping the aspect ratio
fn decode_to_fit(bytes: &[u8]) -> Result<DecodedImage, ImageError> {
    let img = image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;

    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join(name);
        RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_classify_sources() {
        assert_eq!(classify("https://a/1.png"), Source::Remote("https://a/1.png"));
        assert_eq!(classify("http://a/1.png"), Source::Remote("http://a/1.png"));
        assert_eq!(classify("file:///tmp/x.png"), Source::Local(PathBuf::from("/tmp/x.png")));
        assert_eq!(classify("pictures/x.png"), Source::Local(PathBuf::from("pictures/x.png")));
    }

    #[tokio::test]
    async fn test_loads_local_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_png(&tmp, "small.png", 20, 10);

        let decoded = load_image(path.display().to_string()).await.unwrap();

        assert_eq!((decoded.width, decoded.height), (20, 10));
        assert_eq!(decoded.pixels.len(), 20 * 10 * 4);
    }

    #[tokio::test]
    async fn test_large_image_is_downscaled() {
        let tmp = TempDir::new().unwrap();
        let path = write_png(&tmp, "large.png", 1024, 256);

        let decoded = load_image(format!("file://{}", path.display())).await.unwrap();

        assert_eq!((decoded.width, decoded.height), (512, 128));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.png");

        let result = load_image(path.display().to_string()).await;

        assert!(matches!(result, Err(ImageError::Read { .. })));
    }

    #[tokio::test]
    async fn test_garbage_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("garbage.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let result = load_image(path.display().to_string()).await;

        assert!(matches!(result, Err(ImageError::Decode(_))));
    }
}
