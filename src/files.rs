use std::path::{Path, PathBuf};

use crate::{Error, Result};

const ANY_MIME_TYPE: &str = "*/*";

/// A file that has been checked and resolved so a share sheet can hand it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFile {
    /// Canonical absolute path to a regular file.
    pub path: PathBuf,
    pub mime_type: String,
}

/// Resolves every requested path before anything is shown to the user.
///
/// MIME types pair with paths by position; missing entries fall back to `*/*`.
pub(crate) fn prepare_files(
    paths: &[String],
    mime_types: Option<&[String]>,
) -> Result<Vec<SharedFile>> {
    if paths.is_empty() {
        return Err(Error::InvalidArgs("Non-empty path list expected".to_string()));
    }
    let mime_types = mime_types.unwrap_or_default();
    if mime_types.len() > paths.len() {
        return Err(Error::InvalidArgs(format!(
            "Got {} MIME types for {} paths",
            mime_types.len(),
            paths.len()
        )));
    }

    paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let mime_type = mime_types
                .get(index)
                .filter(|mime| !mime.is_empty())
                .cloned()
                .unwrap_or_else(|| ANY_MIME_TYPE.to_string());
            Ok(SharedFile {
                path: resolve_shareable(path)?,
                mime_type,
            })
        })
        .collect()
}

fn resolve_shareable(path: &str) -> Result<PathBuf> {
    let access_error = |reason: String| Error::FileAccess {
        path: path.to_string(),
        reason,
    };
    if path.is_empty() {
        return Err(access_error("empty path".to_string()));
    }
    let resolved = Path::new(path)
        .canonicalize()
        .map_err(|e| access_error(e.to_string()))?;
    let metadata = resolved
        .metadata()
        .map_err(|e| access_error(e.to_string()))?;
    if !metadata.is_file() {
        return Err(access_error("not a regular file".to_string()));
    }
    Ok(resolved)
}

/// Collapses per-file MIME types into the single type a share intent advertises.
pub fn reduce_mime_types(files: &[SharedFile]) -> String {
    let mut types = files.iter().map(|file| file.mime_type.as_str());
    let Some(first) = types.next() else {
        return ANY_MIME_TYPE.to_string();
    };
    let mut reduced = first.to_string();
    for mime in types {
        if mime == reduced {
            continue;
        }
        let kind = top_level(&reduced);
        if kind != "*" && kind == top_level(mime) {
            reduced = format!("{kind}/*");
        } else {
            return ANY_MIME_TYPE.to_string();
        }
    }
    reduced
}

fn top_level(mime: &str) -> &str {
    mime.split_once('/').map_or(mime, |(kind, _)| kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn file(mime: &str) -> SharedFile {
        SharedFile {
            path: PathBuf::from("/unused"),
            mime_type: mime.to_string(),
        }
    }

    #[test]
    fn prepares_existing_files_with_positional_mime_types() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("photo.png");
        let notes = dir.path().join("notes.txt");
        fs::write(&photo, b"png").unwrap();
        fs::write(&notes, b"txt").unwrap();

        let paths = vec![
            photo.to_string_lossy().into_owned(),
            notes.to_string_lossy().into_owned(),
        ];
        let mimes = vec!["image/png".to_string()];
        let files = prepare_files(&paths, Some(mimes.as_slice())).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, photo.canonicalize().unwrap());
        assert_eq!(files[0].mime_type, "image/png");
        assert_eq!(files[1].mime_type, "*/*");
    }

    #[test]
    fn missing_path_is_a_file_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.txt").to_string_lossy().into_owned();

        let err = prepare_files(&[missing.clone()], None).unwrap_err();
        assert!(matches!(err, Error::FileAccess { path, .. } if path == missing));
    }

    #[test]
    fn directory_is_not_shareable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().into_owned();

        let err = prepare_files(&[path], None).unwrap_err();
        assert!(matches!(err, Error::FileAccess { reason, .. } if reason == "not a regular file"));
    }

    #[test]
    fn rejects_empty_path_list_and_surplus_mime_types() {
        assert!(matches!(prepare_files(&[], None), Err(Error::InvalidArgs(_))));

        let paths = vec!["/a".to_string()];
        let mimes = vec!["text/plain".to_string(), "image/png".to_string()];
        assert!(matches!(
            prepare_files(&paths, Some(mimes.as_slice())),
            Err(Error::InvalidArgs(_))
        ));
    }

    #[test]
    fn reduces_mime_types() {
        assert_eq!(reduce_mime_types(&[]), "*/*");
        assert_eq!(
            reduce_mime_types(&[file("image/png"), file("image/png")]),
            "image/png"
        );
        assert_eq!(
            reduce_mime_types(&[file("image/png"), file("image/jpeg")]),
            "image/*"
        );
        assert_eq!(
            reduce_mime_types(&[file("image/png"), file("text/plain")]),
            "*/*"
        );
        assert_eq!(
            reduce_mime_types(&[file("image/png"), file("image/jpeg"), file("video/mp4")]),
            "*/*"
        );
    }
}
