use crate::config::RemoteSettings;

/// Turns storage-relative track paths into playable urls.
///
/// `music/123/abc.mp3` with prefix `music/` and base
/// `https://host/storage/music/` becomes `https://host/storage/music/123/abc.mp3`.
/// Absolute urls and local paths pass through unchanged, so resolving twice
/// is harmless.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    base: String,
    prefix: String,
}

impl UrlResolver {
    pub fn new(base: impl Into<String>, prefix: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self {
            base,
            prefix: prefix.into(),
        }
    }

    pub fn from_settings(remote: &RemoteSettings) -> Self {
        Self::new(&remote.storage_base_url, &remote.storage_prefix)
    }

    /// Resolve `url`; returns `None` for an empty reference.
    pub fn resolve(&self, url: &str) -> Option<String> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }
        if is_absolute(url) {
            return Some(url.to_string());
        }

        let path = if self.prefix.is_empty() {
            url
        } else {
            url.strip_prefix(self.prefix.as_str()).unwrap_or(url)
        };
        Some(format!("{}{}", self.base, path.trim_start_matches('/')))
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("file://")
        || url.starts_with('/')
}

/// Local filesystem path behind `url`, if it points at one.
pub(crate) fn local_path(url: &str) -> Option<&str> {
    if let Some(rest) = url.strip_prefix("file://") {
        Some(rest)
    } else if url.starts_with('/') {
        Some(url)
    } else {
        None
    }
}
