/// Image loading module
///
/// This module handles:
/// - Fetching image URLs and local files (fetch.rs)
/// - Decoding and downscaling for display (fetch.rs)
/// - Caching decoded images with fallback substitution (cache.rs)

pub mod cache;
pub mod fetch;

pub use cache::{ImageCache, Lookup};
pub use fetch::{load_image, DecodedImage, ImageError};

use iced::Task;

/// Start fetches for every URL the cache has not seen yet
pub fn request_all<'a, Message>(
    cache: &mut ImageCache,
    urls: impl IntoIterator<Item = &'a str>,
    on_loaded: fn(String, Result<DecodedImage, ImageError>) -> Message,
) -> Task<Message>
where
    Message: Send + 'static,
{
    let tasks: Vec<_> = urls
        .into_iter()
        .filter_map(|url| cache.request(url))
        .map(|url| load(url, on_loaded))
        .collect();

    Task::batch(tasks)
}

/// Fetch one URL in the background
pub fn load<Message>(
    url: String,
    on_loaded: fn(String, Result<DecodedImage, ImageError>) -> Message,
) -> Task<Message>
where
    Message: Send + 'static,
{
    let key = url.clone();
    Task::perform(load_image(url), move |result| on_loaded(key.clone(), result))
}
