//! External media for themed scenes
//!
//! A scene may ask for a media reference (an image URL) and attach it to a
//! display surface. Requests are asynchronous and failures never reach the
//! game loop; they are only logged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no media reference at {0}")]
    MissingField(String),
}

/// Completion callback for a media request
pub type MediaCallback = Box<dyn FnOnce(Result<String, FetchError>)>;

/// Asynchronous media lookup
pub trait MediaFetch {
    /// Request `url`; `pointer` locates the media reference in the JSON reply
    fn fetch(&self, url: &str, pointer: &str, on_done: MediaCallback);
}

/// Where fetched media is displayed
pub trait MediaSurface {
    fn attach(&self, media: &str);
}

/// Fill the `{query}` placeholder of a request template
pub fn media_request_url(template: &str, query: &str) -> String {
    template.replace("{query}", query)
}

/// Pull the media reference out of a JSON reply
pub fn extract_media_ref(body: &str, pointer: &str) -> Result<String, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    value
        .pointer(pointer)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| FetchError::MissingField(pointer.to_string()))
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlImageElement, Response};

    use super::*;

    /// `fetch()`-backed media lookup
    #[derive(Debug, Default)]
    pub struct BrowserFetch;

    async fn fetch_text(url: &str) -> Result<String, FetchError> {
        let window = web_sys::window().ok_or_else(|| FetchError::Request("no window".into()))?;
        let reply = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| FetchError::Request(format!("{e:?}")))?;
        let response: Response = reply
            .dyn_into()
            .map_err(|e| FetchError::Request(format!("{e:?}")))?;
        if !response.ok() {
            return Err(FetchError::Status(response.status()));
        }
        let text = response
            .text()
            .map_err(|e| FetchError::Request(format!("{e:?}")))?;
        let text = JsFuture::from(text)
            .await
            .map_err(|e| FetchError::Request(format!("{e:?}")))?;
        text.as_string()
            .ok_or_else(|| FetchError::Request("response body is not text".into()))
    }

    impl MediaFetch for BrowserFetch {
        fn fetch(&self, url: &str, pointer: &str, on_done: MediaCallback) {
            let url = url.to_string();
            let pointer = pointer.to_string();
            wasm_bindgen_futures::spawn_local(async move {
                let result = match fetch_text(&url).await {
                    Ok(body) => extract_media_ref(&body, &pointer),
                    Err(e) => Err(e),
                };
                on_done(result);
            });
        }
    }

    /// An `<img>` element showing the media
    pub struct ImageSurface {
        element_id: String,
    }

    impl ImageSurface {
        pub fn new(element_id: &str) -> Self {
            Self {
                element_id: element_id.to_string(),
            }
        }
    }

    impl MediaSurface for ImageSurface {
        fn attach(&self, media: &str) {
            let image = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(&self.element_id))
                .and_then(|e| e.dyn_into::<HtmlImageElement>().ok());
            match image {
                Some(image) => image.set_src(media),
                None => log::warn!("No <img id=\"{}\"> to show media", self.element_id),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserFetch, ImageSurface};
