use std::path::{Path, PathBuf};

use harvester_core::CanonicalUrl;

use crate::persist::{write_atomically, PersistError};

/// One URL per line, newline-terminated.
pub fn render_url_list(urls: &[CanonicalUrl]) -> String {
    let mut out = String::with_capacity(urls.iter().map(|u| u.as_str().len() + 1).sum());
    for url in urls {
        out.push_str(url.as_str());
        out.push('\n');
    }
    out
}

/// Persists the finalized URL list, replacing any previous file.
pub fn write_url_list(target: &Path, urls: &[CanonicalUrl]) -> Result<PathBuf, PersistError> {
    write_atomically(target, &render_url_list(urls))
}

/// Numbered listing for terminal summaries, starting at 1.
pub fn numbered_listing(urls: &[CanonicalUrl]) -> Vec<String> {
    urls.iter()
        .enumerate()
        .map(|(index, url)| format!("{}. {}", index + 1, url))
        .collect()
}
