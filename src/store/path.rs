//! Backend path helpers

/// Joins a collection prefix and a key into a backend path.
///
/// `collection + "/" + key`, with redundant slashes at the seam removed.
pub fn join_path(collection: &str, key: &str) -> String {
    let collection = collection.trim_end_matches('/');
    let key = key.trim_start_matches('/');
    if collection.is_empty() {
        return key.to_string();
    }
    format!("{}/{}", collection, key)
}

/// Returns true if a listed child segment is a sub-folder rather than a record
pub fn is_folder_segment(segment: &str) -> bool {
    segment.ends_with('/')
}
