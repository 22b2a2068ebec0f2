use std::path::Path;

/// Relative paths are written with `/` whatever the host separator.
pub fn to_slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

pub fn file_name_lossy(entry: &walkdir::DirEntry) -> String {
    entry.file_name().to_string_lossy().to_string()
}

pub fn is_not_hidden_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.file_type().is_dir() {
        entry.file_name()
            .to_str()
            .map_or(false, |name| !name.starts_with('.'))
    } else {
        true
    }
}
