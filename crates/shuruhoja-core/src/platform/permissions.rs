/// Permission helpers used by the walker and the Path Gate.
///
/// Neither helper ever writes: the read-access probe opens a directory
/// listing or a file handle for reading and drops it immediately.
use std::fs;
use std::io;
use std::path::Path;

/// `true` if `err` means the process lacks permission.
pub fn is_permission_denied(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
}

/// Check whether `path` can be stat'ed and opened for reading.
///
/// Symbolic links are not followed for the stat; a link is readable if
/// its own metadata is.
pub fn is_readable(path: &Path) -> bool {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(_) => return false,
    };
    if meta.file_type().is_symlink() {
        return true;
    }
    if meta.is_dir() {
        fs::read_dir(path).is_ok()
    } else {
        fs::File::open(path).is_ok()
    }
}
