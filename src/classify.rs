use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use encoding_rs::UTF_8;
use thiserror::Error;
use tracing::debug;

use crate::config::ExtensionSet;

/// Why a candidate file contributed no lines.
///
/// `Display` renders the parenthesized reason used in error descriptors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("file too large")]
    TooLarge,
    #[error("binary file")]
    Binary,
    #[error("permission denied")]
    PermissionDenied,
    #[error("{0}")]
    Io(String),
}

impl From<io::Error> for FileError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied,
            _ => FileError::Io(err.to_string()),
        }
    }
}

/// A failed file together with its reason, rendered as `<path> (<reason>)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub path: PathBuf,
    pub error: FileError,
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path.display(), self.error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountedFile {
    pub extension: String,
    pub lines: u64,
}

/// Lower-cased extension with its leading dot, or "" when the name has none.
///
/// Dotfiles such as `.bashrc` have no extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Strict UTF-8 decode. `None` means the bytes are not text.
pub fn decode_text(bytes: &[u8]) -> Option<std::borrow::Cow<'_, str>> {
    UTF_8.decode_without_bom_handling_and_without_replacement(bytes)
}

/// Counts records ended by `\n`, `\r\n` or a lone `\r`.
/// A trailing unterminated record counts as one line.
pub fn count_lines(text: &str) -> u64 {
    let bytes = text.as_bytes();
    let mut lines = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => lines += 1,
            b'\r' => {
                lines += 1;
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    match bytes.last() {
        Some(b'\n') | Some(b'\r') | None => lines,
        Some(_) => lines + 1,
    }
}

/// Shared per-file classification used by both the recursive scanner and the
/// loose-file pass.
///
/// `Ok(None)` is a silent skip (extension not allowed, file never opened).
pub fn classify_file(
    path: &Path,
    extensions: &ExtensionSet,
    max_file_size: u64,
) -> Result<Option<CountedFile>, FileError> {
    let extension = extension_of(path);
    if !extensions.contains(&extension) {
        return Ok(None);
    }

    let size = fs::metadata(path)?.len();
    if size > max_file_size {
        return Err(FileError::TooLarge);
    }

    let bytes = fs::read(path)?;
    let text = decode_text(&bytes).ok_or(FileError::Binary)?;
    let lines = count_lines(&text);
    debug!(path = %path.display(), lines, "counted");

    Ok(Some(CountedFile { extension, lines }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn exts() -> ExtensionSet {
        ExtensionSet::new([".py", ".rs"])
    }

    #[test]
    fn line_counting_rules() {
        assert_eq!(count_lines(""), 0);
        assert_eq!(count_lines("a"), 1);
        assert_eq!(count_lines("a\n"), 1);
        assert_eq!(count_lines("a\nb"), 2);
        assert_eq!(count_lines("\n\n"), 2);
        assert_eq!(count_lines("a\r\nb\r\n"), 2);
        assert_eq!(count_lines("a\rb\rc"), 3);
        assert_eq!(count_lines("a\r\n\rb"), 3);
    }

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(extension_of(Path::new("src/Main.RS")), ".rs");
        assert_eq!(extension_of(Path::new("a.tar.gz")), ".gz");
        assert_eq!(extension_of(Path::new("Makefile")), "");
        assert_eq!(extension_of(Path::new(".bashrc")), "");
    }

    #[test]
    fn bom_is_text_and_invalid_utf8_is_not() {
        assert!(decode_text(b"\xEF\xBB\xBFfn main() {}\n").is_some());
        assert!(decode_text(b"ok\xFFno").is_none());
    }

    #[test]
    fn counts_allowed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.PY");
        fs::write(&path, "x = 1\ny = 2\nprint(x)").unwrap();

        let counted = classify_file(&path, &exts(), 1024).unwrap().unwrap();
        assert_eq!(counted.extension, ".py");
        assert_eq!(counted.lines, 3);
    }

    #[test]
    fn skips_unlisted_extension_without_opening() {
        let dir = tempdir().unwrap();
        // Never created: a skip must not touch the filesystem.
        let path = dir.path().join("notes.txt");
        assert_eq!(classify_file(&path, &exts(), 1024), Ok(None));
    }

    #[test]
    fn too_large_wins_over_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.rs");
        fs::write(&path, [0xFFu8; 64]).unwrap();
        assert_eq!(classify_file(&path, &exts(), 63), Err(FileError::TooLarge));
        assert_eq!(classify_file(&path, &exts(), 64), Err(FileError::Binary));
    }

    #[test]
    fn missing_file_keeps_io_message() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.rs");
        match classify_file(&path, &exts(), 1024) {
            Err(FileError::Io(msg)) => assert!(!msg.is_empty()),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn io_error_kinds_map_to_taxonomy() {
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(FileError::from(denied), FileError::PermissionDenied);

        let other = io::Error::new(io::ErrorKind::Other, "device went away");
        assert_eq!(
            FileError::from(other),
            FileError::Io("device went away".into())
        );
    }

    #[test]
    fn descriptor_format() {
        let d = ErrorDescriptor {
            path: PathBuf::from("proj/b.bin"),
            error: FileError::Binary,
        };
        assert_eq!(d.to_string(), "proj/b.bin (binary file)");

        let d = ErrorDescriptor {
            path: PathBuf::from("huge.json"),
            error: FileError::TooLarge,
        };
        assert_eq!(d.to_string(), "huge.json (file too large)");
    }
}
