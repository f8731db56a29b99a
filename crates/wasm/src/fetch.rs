//! `ImageFetcher` over the browser `fetch` API.

use js_sys::Uint8Array;
use textured_quad_core::fetch::{is_success, FetchError, ImageFetcher};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// Issues same-origin `GET` requests through `window.fetch`.
pub struct BrowserFetcher;

fn network_error(url: &str, value: JsValue) -> FetchError {
    FetchError::Network {
        url: url.to_string(),
        reason: describe(&value),
    }
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

impl ImageFetcher for BrowserFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let window = web_sys::window().ok_or_else(|| FetchError::Network {
            url: url.to_string(),
            reason: "no window object".to_string(),
        })?;

        let response: Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .and_then(|v| v.dyn_into())
            .map_err(|e| network_error(url, e))?;

        let status = response.status();
        if !is_success(status) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.array_buffer().map_err(|e| network_error(url, e))?;
        let buffer = JsFuture::from(body)
            .await
            .map_err(|e| network_error(url, e))?;
        Ok(Uint8Array::new(&buffer).to_vec())
    }
}
