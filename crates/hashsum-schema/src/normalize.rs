use crate::types::ManifestKey;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// A component that would appear in the key is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8(PathBuf),
}

/// Resolve `path` against `base` and fold `.` and `..` segments lexically.
///
/// An absolute `path` replaces `base`. No filesystem access takes place, so
/// symlinks are not followed.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root.
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
        }
    }
    out
}

/// Manifest key of `file_path` relative to the directory holding `manifest_path`.
///
/// Both paths are expected to be resolved already. Components are joined with
/// `/` whatever the host separator is. Fails when a component that ends up in
/// the key is not valid UTF-8.
pub fn manifest_key(
    manifest_path: &Path,
    file_path: &Path,
) -> Result<ManifestKey, NormalizeError> {
    let non_utf8 = || NormalizeError::NonUtf8(file_path.to_path_buf());
    let manifest_dir = manifest_path.parent().unwrap_or(manifest_path);
    let from: Vec<Component<'_>> = manifest_dir.components().collect();
    let to: Vec<Component<'_>> = file_path.components().collect();

    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    // Different roots (e.g. another drive): there is no relative path.
    if common == 0 && file_path.has_root() {
        let full = file_path.to_str().ok_or_else(non_utf8)?;
        return Ok(ManifestKey::new(full.replace('\\', "/")));
    }

    let mut parts = vec![".."; from.len() - common];
    for component in &to[common..] {
        parts.push(component.as_os_str().to_str().ok_or_else(non_utf8)?);
    }
    Ok(ManifestKey::new(parts.join("/")))
}

/// Compute the manifest key for a file.
///
/// `file_path` and the manifest path `resolve(dest_root, manifest_file_name)`
/// are both resolved against `dest_root`, then the file is expressed relative
/// to the manifest's directory.
pub fn normalize(
    dest_root: &Path,
    manifest_file_name: &str,
    file_path: &Path,
) -> Result<ManifestKey, NormalizeError> {
    let manifest_path = resolve(dest_root, Path::new(manifest_file_name));
    let file_path = resolve(dest_root, file_path);
    manifest_key(&manifest_path, &file_path)
}
