/// Ownership and inode metadata extraction.
use std::fs::Metadata;

/// The Unix-specific part of a metadata record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ownership {
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub hard_links: u64,
    pub inode: u64,
}

#[cfg(unix)]
pub fn ownership(meta: &Metadata) -> Ownership {
    use std::os::unix::fs::MetadataExt;

    Ownership {
        mode: meta.mode(),
        uid: meta.uid(),
        gid: meta.gid(),
        hard_links: meta.nlink(),
        inode: meta.ino(),
    }
}

#[cfg(not(unix))]
pub fn ownership(meta: &Metadata) -> Ownership {
    // Approximate rwx bits from the read-only flag.
    let mode = if meta.permissions().readonly() { 0o444 } else { 0o644 };
    Ownership {
        mode,
        hard_links: 1,
        ..Ownership::default()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn regular_file_has_one_link_and_an_inode() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("f");
        std::fs::write(&path, b"x").unwrap();

        let owner = ownership(&std::fs::symlink_metadata(&path).unwrap());
        assert_eq!(owner.hard_links, 1);
        assert_ne!(owner.inode, 0);
        // S_IFREG
        assert_eq!(owner.mode & 0o170000, 0o100000);
    }

    #[test]
    fn hard_links_are_counted() {
        let tmp = tempfile::TempDir::new().unwrap();
        let original = tmp.path().join("a");
        std::fs::write(&original, b"x").unwrap();
        std::fs::hard_link(&original, tmp.path().join("b")).unwrap();

        let owner = ownership(&std::fs::symlink_metadata(&original).unwrap());
        assert_eq!(owner.hard_links, 2);
    }
}
