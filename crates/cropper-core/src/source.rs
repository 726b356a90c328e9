//! Image sources.
//!
//! A source is the string handed to the `<img src>` attribute: either a
//! `data:` URL built from a local file, or an external URL typed by the user.

use base64::{engine::general_purpose, Engine as _};
use url::Url;

use crate::decode::DecodeError;
use crate::error::CropperError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A local file, inlined as `data:<mime>;base64,...`.
    DataUrl { url: String, mime: String },
    /// A user-supplied external URL.
    External { url: String },
}

impl ImageSource {
    /// The value for the image element's `src` attribute.
    pub fn as_str(&self) -> &str {
        match self {
            ImageSource::DataUrl { url, .. } | ImageSource::External { url } => url,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, ImageSource::External { .. })
    }

    /// A form of the source that is safe to log.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::DataUrl { url, mime } => {
                format!("data URL ({}, {} chars)", mime, url.len())
            }
            ImageSource::External { url } => redact_url_for_log(url),
        }
    }
}

/// True for `image/*` MIME types (the file picker's `accept` filter).
pub fn is_image_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    essence
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
        && essence.len() > 6
}

/// Inline `bytes` as a base64 `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}

/// Split an image `data:` URL into its MIME type and decoded bytes.
pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>), DecodeError> {
    let rest = data_url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| DecodeError::InvalidDataUrl("missing data: prefix".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| DecodeError::InvalidDataUrl("missing payload separator".to_string()))?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| DecodeError::InvalidDataUrl("missing base64 marker".to_string()))?;

    if !is_image_mime(mime) {
        return Err(DecodeError::InvalidDataUrl(format!("not an image: {}", mime)));
    }

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| DecodeError::InvalidDataUrl(format!("base64 decode failed: {}", e)))?;

    Ok((mime.to_string(), bytes))
}

/// Parse an external URL and check its scheme against `allowed_schemes`.
///
/// Only the syntax is checked; the browser discovers whether the resource
/// exists (and whether it can be read back) when it loads it.
pub fn validate_external_url(url: &str, allowed_schemes: &[String]) -> Result<Url, CropperError> {
    let parsed = Url::parse(url)
        .map_err(|e| CropperError::InvalidUrl(format!("{}: {}", e, redact_url_for_log(url))))?;

    if !allowed_schemes
        .iter()
        .any(|scheme| scheme.eq_ignore_ascii_case(parsed.scheme()))
    {
        return Err(CropperError::InvalidUrl(format!(
            "scheme '{}' is not allowed",
            parsed.scheme()
        )));
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(CropperError::InvalidUrl("missing host".to_string()));
    }

    Ok(parsed)
}

/// Drop query string and fragment, which may carry tokens.
pub fn redact_url_for_log(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => "<invalid url>".to_string(),
    }
}
