// Definition of the virtual file system. The file system is a flat table of
// absolute paths, built once from an archive and never modified afterwards.
// Hierarchy is not stored: a path belongs to a directory when it starts with
// the directory's path.

use indexmap::IndexMap;
use tracing::instrument;

use crate::paths::ROOT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: String,
    pub kind: EntryKind,
    pub size: u64,
}

impl Entry {
    pub fn file(path: &str, size: u64) -> Entry {
        Entry {
            path: path.to_string(),
            kind: EntryKind::File,
            size,
        }
    }

    pub fn directory(path: &str) -> Entry {
        Entry {
            path: path.to_string(),
            kind: EntryKind::Directory,
            size: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct VirtualFileSystem {
    entries: IndexMap<String, Entry>,
}

impl VirtualFileSystem {
    /// Build the table from loaded entries. Paths must already be normalized.
    /// A repeated path keeps its first position and takes the later values.
    pub fn from_entries<I>(entries: I) -> VirtualFileSystem
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut table = IndexMap::new();
        for entry in entries {
            table.insert(entry.path.clone(), entry);
        }
        VirtualFileSystem { entries: table }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    pub fn exists(&self, path: &str) -> bool {
        path == ROOT || self.entries.contains_key(path)
    }

    pub fn kind(&self, path: &str) -> Option<EntryKind> {
        match self.entries.get(path) {
            Some(entry) => Some(entry.kind),
            None if path == ROOT => Some(EntryKind::Directory),
            None => None,
        }
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.kind(path) == Some(EntryKind::Directory)
    }

    /// Every path that starts with `dir` other than `dir` itself, in load order.
    ///
    /// This is a plain string prefix match, so `/home` also lists `/home2/x`.
    #[instrument(skip(self))]
    pub fn list_children(&self, dir: &str) -> Vec<&str> {
        self.entries
            .keys()
            .filter(|path| path.starts_with(dir) && path.as_str() != dir)
            .map(|path| path.as_str())
            .collect()
    }

    /// Sum of sizes over `path` and every path prefixed by it.
    #[instrument(skip(self))]
    pub fn total_size(&self, path: &str) -> u64 {
        self.entries
            .values()
            .filter(|entry| entry.path.starts_with(path))
            .map(|entry| entry.size)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VirtualFileSystem {
        VirtualFileSystem::from_entries(vec![
            Entry::directory("/home"),
            Entry::file("/home/file.txt", 42),
            Entry::directory("/home/user"),
            Entry::file("/home/user/notes.md", 8),
            Entry::directory("/etc"),
            Entry::file("/etc/hosts", 100),
        ])
    }

    #[test]
    fn loaded_entries_exist_with_their_kind() {
        let vfs = sample();
        for entry in vfs.entries() {
            assert!(vfs.exists(&entry.path));
            assert_eq!(vfs.kind(&entry.path), Some(entry.kind));
        }
        assert_eq!(vfs.len(), 6);
    }

    #[test]
    fn root_is_always_a_directory() {
        let vfs = VirtualFileSystem::default();
        assert!(vfs.is_empty());
        assert!(vfs.exists("/"));
        assert!(vfs.is_dir("/"));
        assert!(!vfs.exists("/home"));
        assert_eq!(vfs.kind("/home"), None);
    }

    #[test]
    fn children_keep_load_order() {
        let vfs = sample();
        assert_eq!(
            vfs.list_children("/home"),
            vec!["/home/file.txt", "/home/user", "/home/user/notes.md"]
        );
        assert!(vfs.list_children("/home/file.txt").is_empty());
    }

    #[test]
    fn root_lists_everything() {
        let vfs = sample();
        assert_eq!(vfs.list_children("/").len(), vfs.len());
    }

    #[test]
    fn total_size_sums_prefixed_entries() {
        let vfs = sample();
        assert_eq!(vfs.total_size("/home"), 50);
        assert_eq!(vfs.total_size("/home/file.txt"), 42);
        assert_eq!(vfs.total_size("/"), 150);
        assert_eq!(vfs.total_size("/missing"), 0);
        for entry in vfs.entries() {
            assert!(vfs.total_size(&entry.path) >= entry.size);
        }
    }

    #[test]
    fn prefix_match_includes_sibling_with_shared_prefix() {
        // Known quirk: membership is a string prefix test, not a hierarchy test.
        let vfs = VirtualFileSystem::from_entries(vec![
            Entry::directory("/home"),
            Entry::directory("/home2"),
            Entry::file("/home2/x", 5),
        ]);
        assert_eq!(vfs.list_children("/home"), vec!["/home2", "/home2/x"]);
        assert_eq!(vfs.total_size("/home"), 5);
    }

    #[test]
    fn duplicate_paths_keep_first_position() {
        let vfs = VirtualFileSystem::from_entries(vec![
            Entry::file("/a", 1),
            Entry::file("/b", 2),
            Entry::file("/a", 3),
        ]);
        assert_eq!(vfs.list_children("/"), vec!["/a", "/b"]);
        assert_eq!(vfs.get("/a").map(|e| e.size), Some(3));
    }
}
