//! Preview resources.
//!
//! A rasterized crop is exposed through a transient object URL. The URL pins
//! its bytes in memory until it is revoked, so every preview is revoked
//! before its successor is created, when the source changes, and on dispose.

use std::collections::BTreeMap;

use crate::error::CropperError;

/// Creates and revokes object URLs for encoded images.
///
/// In the browser this is `URL.createObjectURL(new Blob(...))` and
/// `URL.revokeObjectURL`. [`MemoryUrls`] provides an in-process version.
pub trait ObjectUrlRegistry {
    /// Register `bytes` and return a URL that resolves to them.
    fn create(&mut self, bytes: &[u8], mime: &str) -> Result<String, CropperError>;

    /// Release a URL previously returned by [`ObjectUrlRegistry::create`].
    fn revoke(&mut self, url: &str);
}

/// The current rasterized result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub url: String,
    /// Output width in device pixels.
    pub width: u32,
    /// Output height in device pixels.
    pub height: u32,
    /// Size of the encoded PNG.
    pub byte_len: usize,
    /// Sequence number; increases with every generation.
    pub generation: u64,
}

/// Object URL registry that keeps blobs in memory.
///
/// URLs take the form `memory:<n>`. Revoked URLs are remembered so callers
/// can check that nothing leaks.
#[derive(Debug, Default)]
pub struct MemoryUrls {
    next_id: u64,
    live: BTreeMap<String, (String, Vec<u8>)>,
    revoked: Vec<String>,
}

impl MemoryUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes behind a live URL.
    pub fn get(&self, url: &str) -> Option<&[u8]> {
        self.live.get(url).map(|(_, bytes)| bytes.as_slice())
    }

    /// MIME type recorded for a live URL.
    pub fn mime(&self, url: &str) -> Option<&str> {
        self.live.get(url).map(|(mime, _)| mime.as_str())
    }

    /// Number of URLs not yet revoked.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn revoked(&self) -> &[String] {
        &self.revoked
    }
}

impl ObjectUrlRegistry for MemoryUrls {
    fn create(&mut self, bytes: &[u8], mime: &str) -> Result<String, CropperError> {
        self.next_id += 1;
        let url = format!("memory:{}", self.next_id);
        self.live
            .insert(url.clone(), (mime.to_string(), bytes.to_vec()));
        Ok(url)
    }

    fn revoke(&mut self, url: &str) {
        if self.live.remove(url).is_some() {
            self.revoked.push(url.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_resolve() {
        let mut urls = MemoryUrls::new();
        let url = urls.create(&[1, 2, 3], "image/png").unwrap();

        assert_eq!(url, "memory:1");
        assert_eq!(urls.get(&url), Some(&[1u8, 2, 3][..]));
        assert_eq!(urls.mime(&url), Some("image/png"));
        assert_eq!(urls.live_count(), 1);
    }

    #[test]
    fn test_urls_are_unique() {
        let mut urls = MemoryUrls::new();
        let a = urls.create(&[], "image/png").unwrap();
        let b = urls.create(&[], "image/png").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_revoke() {
        let mut urls = MemoryUrls::new();
        let url = urls.create(&[9], "image/png").unwrap();
        urls.revoke(&url);

        assert_eq!(urls.get(&url), None);
        assert_eq!(urls.live_count(), 0);
        assert_eq!(urls.revoked(), &[url.clone()]);

        // Revoking twice is harmless and not recorded again
        urls.revoke(&url);
        assert_eq!(urls.revoked().len(), 1);
    }
}
