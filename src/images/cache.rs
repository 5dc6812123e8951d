use iced::widget::image::Handle;
use std::collections::HashMap;

use super::fetch::{DecodedImage, ImageError};

/// Load state of a single URL
#[derive(Debug, Clone)]
pub enum ImageState {
    Loading,
    Ready(Handle),
    Failed,
}

/// What the view should draw for a URL
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    Ready(&'a Handle),
    Loading,
    /// Neither the URL nor the fallback could be loaded
    Missing,
}

/// Decoded images keyed by URL.
///
/// Each URL is fetched at most once per session. A URL that fails is
/// displayed with the fallback image instead.
#[derive(Debug)]
pub struct ImageCache {
    entries: HashMap<String, ImageState>,
    fallback: String,
}

impl ImageCache {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            entries: HashMap::new(),
            fallback: fallback.into(),
        }
    }

    /// Mark `url` as loading.
    /// Returns the URL the caller should start a fetch for, if any.
    ///
    /// A blank URL can never load, so it fails at once and the fallback
    /// is requested in its place.
    pub fn request(&mut self, url: &str) -> Option<String> {
        if self.entries.contains_key(url) {
            return None;
        }
        if url.trim().is_empty() {
            self.entries.insert(url.to_string(), ImageState::Failed);
            let fallback = self.fallback.clone();
            return self.request(&fallback);
        }
        self.entries.insert(url.to_string(), ImageState::Loading);
        Some(url.to_string())
    }

    /// Record the result of a fetch.
    /// Returns the fallback URL when it now needs to be fetched.
    pub fn resolve(&mut self, url: String, result: Result<DecodedImage, ImageError>) -> Option<String> {
        match result {
            Ok(decoded) => {
                tracing::debug!(%url, width = decoded.width, height = decoded.height, "image ready");
                let handle = Handle::from_rgba(decoded.width, decoded.height, decoded.pixels);
                self.entries.insert(url, ImageState::Ready(handle));
                None
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "image unavailable, using fallback");
                let fallback = self.fallback.clone();
                let is_fallback = url == fallback;
                self.entries.insert(url, ImageState::Failed);

                if is_fallback {
                    None
                } else {
                    self.request(&fallback)
                }
            }
        }
    }

    pub fn lookup(&self, url: &str) -> Lookup<'_> {
        match self.entries.get(url) {
            Some(ImageState::Ready(handle)) => Lookup::Ready(handle),
            Some(ImageState::Failed) if url != self.fallback => match self.entries.get(&self.fallback) {
                Some(ImageState::Ready(handle)) => Lookup::Ready(handle),
                Some(ImageState::Failed) => Lookup::Missing,
                _ => Lookup::Loading,
            },
            Some(ImageState::Failed) => Lookup::Missing,
            Some(ImageState::Loading) | None => Lookup::Loading,
        }
    }
}
