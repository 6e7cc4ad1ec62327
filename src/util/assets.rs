use std::{borrow::Cow, sync::OnceLock};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rust_embed::RustEmbed;

/// Embed the entire `assets/` directory into the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

static MAIN_CSS: OnceLock<String> = OnceLock::new();
static FAVICON_DATA_URI: OnceLock<String> = OnceLock::new();

/// Returns the contents of `assets/main.css` as a static string.
pub fn main_css() -> &'static str {
    MAIN_CSS
        .get_or_init(|| load_text("/assets/main.css"))
        .as_str()
}

/// Returns a data URI for the favicon.
pub fn favicon_data_uri() -> &'static str {
    FAVICON_DATA_URI
        .get_or_init(|| load_data_uri("/assets/favicon.svg"))
        .as_str()
}

fn load_text(path: &str) -> String {
    match load_asset(path) {
        Some(asset) => String::from_utf8_lossy(&asset).into_owned(),
        None => {
            tracing::error!(path, "embedded asset missing");
            String::new()
        }
    }
}

fn load_data_uri(path: &str) -> String {
    let bytes = load_asset(path).unwrap_or_else(|| {
        tracing::error!(path, "embedded asset missing");
        Cow::Borrowed(&[])
    });
    let mime = guess_mime(path);
    format!("data:{mime};base64,{}", STANDARD.encode(bytes.as_ref()))
}

fn load_asset(path: &str) -> Option<Cow<'static, [u8]>> {
    let canonical = canonical_asset_path(path);
    EmbeddedAssets::get(&canonical).map(|file| file.data)
}

fn canonical_asset_path(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if let Some(rest) = trimmed.strip_prefix("assets/") {
        rest.to_string()
    } else {
        trimmed.to_string()
    }
}

fn guess_mime(path: &str) -> &'static str {
    if path.ends_with(".css") {
        "text/css"
    } else if path.ends_with(".svg") {
        "image/svg+xml"
    } else if path.ends_with(".ico") {
        "image/x-icon"
    } else if path.ends_with(".png") {
        "image/png"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_paths_are_canonicalised() {
        assert_eq!(canonical_asset_path("/assets/main.css"), "main.css");
        assert_eq!(canonical_asset_path("favicon.svg"), "favicon.svg");
    }

    #[test]
    fn favicon_is_an_svg_data_uri() {
        let uri = favicon_data_uri();
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
        assert!(uri.len() > "data:image/svg+xml;base64,".len());
    }

    #[test]
    fn stylesheet_is_embedded() {
        assert!(main_css().contains(".app-shell"));
    }
}
