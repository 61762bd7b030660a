//! Blob store providers.

#[cfg(feature = "local")]
pub mod local;
pub mod memory;

/// Longest file-name part kept in a blob key, in bytes. Leaves room for the
/// UUID prefix and sidecar suffixes within a 255-byte path segment.
const MAX_KEY_NAME_BYTES: usize = 120;

/// Longest extension preserved when a name is shortened.
const MAX_KEPT_EXTENSION_BYTES: usize = 16;

/// Build a collision-resistant blob key from a caller-supplied file name.
///
/// The name is reduced to its final path component and characters that are
/// unsafe in a single path segment are replaced, then prefixed with a
/// time-ordered UUID. Long names are shortened, keeping the extension.
pub(crate) fn blob_key(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_control() || c == ':' { '_' } else { c })
        .collect();
    let cleaned = match cleaned.as_str() {
        "" | "." | ".." => "blob".to_string(),
        _ => cleaned,
    };
    format!("{}-{}", uuid::Uuid::now_v7(), shorten(&cleaned))
}

fn shorten(name: &str) -> String {
    if name.len() <= MAX_KEY_NAME_BYTES {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= MAX_KEPT_EXTENSION_BYTES => {
            name.split_at(dot)
        }
        _ => (name, ""),
    };
    let mut end = (MAX_KEY_NAME_BYTES - ext.len()).min(stem.len());
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &stem[..end], ext)
}
