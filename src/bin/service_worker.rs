use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, Response};

const CACHE_PREFIX: &str = "mrt6-";
const CACHE_VERSION: &str = "mrt6-v1";

/// Resources that change while the app is open and must come from the network when possible
const NETWORK_FIRST: [&str; 3] = ["verified-times.json", "app-config.json", "date.nager.at"];

fn scope() -> web_sys::ServiceWorkerGlobalScope {
    js_sys::global().unchecked_into::<web_sys::ServiceWorkerGlobalScope>()
}

fn cache_name() -> String {
    format!("{CACHE_VERSION}-app")
}

#[wasm_bindgen(start)]
#[allow(clippy::main_recursion)]
fn main() {
    console_error_panic_hook::set_once();

    let global = scope();

    let install_closure = Closure::wrap(Box::new(move |event: web_sys::ExtendableEvent| {
        web_sys::console::log_1(&"[SW] Installing service worker...".into());

        let promise = wasm_bindgen_futures::future_to_promise(async move {
            install_handler().await?;
            Ok(JsValue::UNDEFINED)
        });

        let _ = event.wait_until(&promise);
    }) as Box<dyn FnMut(_)>);

    global.set_oninstall(Some(install_closure.as_ref().unchecked_ref()));
    install_closure.forget();

    let activate_closure = Closure::wrap(Box::new(move |event: web_sys::ExtendableEvent| {
        web_sys::console::log_1(&"[SW] Activating service worker...".into());

        let promise = wasm_bindgen_futures::future_to_promise(async move {
            activate_handler().await?;
            Ok(JsValue::UNDEFINED)
        });

        let _ = event.wait_until(&promise);
    }) as Box<dyn FnMut(_)>);

    global.set_onactivate(Some(activate_closure.as_ref().unchecked_ref()));
    activate_closure.forget();

    let fetch_closure = Closure::wrap(Box::new(move |event: web_sys::FetchEvent| {
        let request = event.request();

        // Verification dispatches and feedback posts always go straight out
        if request.method() != "GET" {
            return;
        }

        let url = request.url();
        let promise = if NETWORK_FIRST.iter().any(|pattern| url.contains(pattern)) {
            wasm_bindgen_futures::future_to_promise(async move { network_first_handler(&request).await })
        } else {
            wasm_bindgen_futures::future_to_promise(async move { cache_first_handler(&request).await })
        };

        let _ = event.respond_with(&promise);
    }) as Box<dyn FnMut(_)>);

    global.set_onfetch(Some(fetch_closure.as_ref().unchecked_ref()));
    fetch_closure.forget();
}

async fn open_cache() -> Result<web_sys::Cache, JsValue> {
    JsFuture::from(scope().caches()?.open(&cache_name()))
        .await?
        .dyn_into::<web_sys::Cache>()
}

async fn install_handler() -> Result<JsValue, JsValue> {
    let manifest_response: Response = JsFuture::from(scope().fetch_with_str("/asset-manifest.json"))
        .await?
        .dyn_into()?;
    let manifest_text = JsFuture::from(manifest_response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("Manifest is not a string"))?;

    let manifest: serde_json::Value = serde_json::from_str(&manifest_text)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse manifest: {e}")))?;

    let version = manifest
        .get("version")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    web_sys::console::log_1(&format!("[SW] Loading asset manifest, version: {version}").into());

    let assets = manifest
        .get("assets")
        .and_then(|a| a.as_array())
        .ok_or_else(|| JsValue::from_str("No assets in manifest"))?;

    web_sys::console::log_1(&format!("[SW] Assets to cache: {}", assets.len()).into());

    let cache = open_cache().await?;
    for url in assets.iter().filter_map(|asset| asset.as_str()) {
        let _ = JsFuture::from(cache.add_with_str(url)).await.map_err(|e| {
            web_sys::console::warn_1(&format!("[SW] Failed to cache asset: {url} {e:?}").into());
        });
    }

    web_sys::console::log_1(&"[SW] Install complete".into());

    let _ = scope().skip_waiting();

    Ok(JsValue::UNDEFINED)
}

async fn activate_handler() -> Result<JsValue, JsValue> {
    let cache_storage = scope().caches()?;
    let cache_names = JsFuture::from(cache_storage.keys())
        .await?
        .dyn_into::<js_sys::Array>()?;

    let current = cache_name();
    for i in 0..cache_names.length() {
        if let Some(name) = cache_names.get(i).as_string() {
            if name.starts_with(CACHE_PREFIX) && name != current {
                web_sys::console::log_1(&format!("[SW] Deleting old cache: {name}").into());
                let _ = JsFuture::from(cache_storage.delete(&name)).await;
            }
        }
    }

    web_sys::console::log_1(&"[SW] Activation complete".into());

    JsFuture::from(scope().clients().claim()).await?;

    Ok(JsValue::UNDEFINED)
}

fn is_cacheable(response: &Response) -> bool {
    response.status() == 200 && response.type_() != web_sys::ResponseType::Error
}

fn store_in_background(request: &Request, response: &Response) -> Result<(), JsValue> {
    let request = request.clone()?;
    let response = response.clone()?;
    wasm_bindgen_futures::spawn_local(async move {
        if let Ok(cache) = open_cache().await {
            let _ = JsFuture::from(cache.put_with_request(&request, &response)).await;
        }
    });
    Ok(())
}

async fn network_first_handler(request: &Request) -> Result<JsValue, JsValue> {
    match JsFuture::from(scope().fetch_with_request(request)).await {
        Ok(response) => {
            let response: Response = response.dyn_into()?;
            if is_cacheable(&response) {
                store_in_background(request, &response)?;
            }
            Ok(response.into())
        }
        Err(e) => {
            web_sys::console::warn_1(&format!("[SW] Network unavailable, using cache: {}", request.url()).into());
            let cached = JsFuture::from(scope().caches()?.match_with_request(request)).await?;
            if cached.is_undefined() {
                Err(e)
            } else {
                Ok(cached)
            }
        }
    }
}

async fn cache_first_handler(request: &Request) -> Result<JsValue, JsValue> {
    let cached = JsFuture::from(scope().caches()?.match_with_request(request)).await?;
    if !cached.is_undefined() {
        return Ok(cached);
    }

    let response = JsFuture::from(scope().fetch_with_request(request)).await.map_err(|e| {
        web_sys::console::error_1(&format!("[SW] Fetch failed: {e:?}").into());
        e
    })?;
    let response: Response = response.dyn_into()?;

    if is_cacheable(&response) {
        store_in_background(request, &response)?;
    }

    Ok(response.into())
}
