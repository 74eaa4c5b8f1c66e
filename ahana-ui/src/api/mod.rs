//! Browser bindings for the shared client
//!
//! [`GlooTransport`] moves requests with `gloo-net`; [`LocalStorageStore`]
//! keeps the session keys in `localStorage`. Pages call [`client`] and pass
//! the result to `ahana::services`.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use wasm_bindgen::JsCast;

use ahana::client::{ApiClient, FilePart, HttpRequest, Method, RawResponse, RequestBody, Transport};
use ahana::error::{ClientError, ClientResult};
use ahana::session::SessionStore;

/// localStorage key holding a backend URL override
pub const API_URL_KEY: &str = "ahana_api_url";

pub type PortalClient = ApiClient<GlooTransport, LocalStorageStore>;

/// Client bound to the configured backend and the browser session
pub fn client() -> PortalClient {
    ApiClient::new(get_api_base(), GlooTransport, LocalStorageStore)
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Backend URL: the saved override, else the origin serving the portal
pub fn get_api_base() -> String {
    let url = local_storage()
        .and_then(|s| s.get_item(API_URL_KEY).ok().flatten())
        .filter(|u| !u.trim().is_empty())
        .or_else(|| web_sys::window().and_then(|w| w.location().origin().ok()))
        .unwrap_or_else(|| ahana::client::DEFAULT_BASE_URL.to_string());
    url.trim_end_matches('/').to_string()
}

/// Save a backend URL override; an empty value restores the default
pub fn set_api_base(url: &str) {
    if let Some(storage) = local_storage() {
        let _ = if url.trim().is_empty() {
            storage.remove_item(API_URL_KEY)
        } else {
            storage.set_item(API_URL_KEY, url.trim())
        };
    }
}

/// `localStorage`-backed session store
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> ClientResult<web_sys::Storage> {
        local_storage().ok_or_else(|| ClientError::Storage("localStorage is unavailable".to_string()))
    }
}

impl SessionStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| ClientError::Storage(format!("Failed to write {}", key)))
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|_| ClientError::Storage(format!("Failed to remove {}", key)))
    }
}

/// `fetch`-based transport
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

fn multipart(file: &FilePart) -> ClientResult<web_sys::FormData> {
    let js_error = |_| ClientError::Transport("Failed to build upload form".to_string());

    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let mut options = web_sys::BlobPropertyBag::new();
    options.type_(&file.content_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(js_error)?;

    let form = web_sys::FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename(&file.field, &blob, &file.file_name)
        .map_err(js_error)?;
    Ok(form)
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<RawResponse> {
        let mut builder: RequestBuilder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Delete => Request::delete(&request.url),
        };

        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }

        let built = match &request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.json(value),
            // The browser sets the multipart boundary itself
            RequestBody::Multipart(file) => builder.body(multipart(file)?),
        }
        .map_err(|e| ClientError::Transport(e.to_string()))?;

        let response = built
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Network error: {}", e)))?;
        let status = response.status();
        let body = response
            .binary()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

/// Read the first file picked in an `<input type="file">`
pub async fn read_picked_file(input: &web_sys::HtmlInputElement) -> Option<(String, String, Vec<u8>)> {
    let file = input.files()?.get(0)?;
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer()).await.ok()?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Some((file.name(), file.type_(), bytes))
}

/// Offer `contents` as a file download
pub fn download_text(file_name: &str, mime: &str, contents: &str) -> Result<(), String> {
    let parts = js_sys::Array::of1(&wasm_bindgen::JsValue::from_str(contents));
    let mut options = web_sys::BlobPropertyBag::new();
    options.type_(mime);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|_| "Failed to create file".to_string())?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|_| "Failed to create download link".to_string())?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("No document")?;
    let anchor = document
        .create_element("a")
        .map_err(|_| "Failed to create link")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "Failed to create link")?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    let _ = web_sys::Url::revoke_object_url(&url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_storage_store_round_trip() {
        let store = LocalStorageStore;
        store.set("ahana_test_key", "value-1").unwrap();
        assert_eq!(store.get("ahana_test_key").as_deref(), Some("value-1"));
        store.remove("ahana_test_key").unwrap();
        assert_eq!(store.get("ahana_test_key"), None);
    }

    #[wasm_bindgen_test]
    fn test_api_base_override() {
        set_api_base("http://backend.test:9000/");
        assert_eq!(get_api_base(), "http://backend.test:9000");
        set_api_base("");
        assert_ne!(get_api_base(), "http://backend.test:9000");
    }
}
