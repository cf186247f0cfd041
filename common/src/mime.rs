//! Content types for app assets, keyed by file extension.

use std::path::Path;

/// Fallback for unknown or missing extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// `Content-Type` for a file, inferred from its extension (case-insensitive).
pub fn content_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return OCTET_STREAM;
    };

    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "eot" => "application/vnd.ms-fontobject",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for(Path::new("styles/app.css")), "text/css");
        assert_eq!(content_type_for(Path::new("logo.svg")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("main.mjs")), "application/javascript");
        assert_eq!(content_type_for(Path::new("photo.JPEG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("font.woff2")), "font/woff2");
        assert_eq!(content_type_for(Path::new("song.mp3")), "audio/mpeg");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(content_type_for(Path::new("model.glb")), OCTET_STREAM);
        assert_eq!(content_type_for(Path::new("LICENSE")), OCTET_STREAM);
    }
}
