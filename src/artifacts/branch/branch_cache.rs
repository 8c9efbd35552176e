use derive_new::new;
use std::time::SystemTime;

/// Last resolved branch together with the HEAD timestamp it was read at
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct BranchCacheEntry {
    pub last_mod_time: SystemTime,
    pub branch_name: String,
    /// `branch_name` is a raw HEAD value rather than a branch
    pub detached: bool,
}

/// Single-slot cache for the current branch name
///
/// The entry stays valid for as long as HEAD keeps the modification time it was
/// read at. There is exactly one slot: a cache serves one repository.
#[derive(Debug, Default, Clone)]
pub struct BranchCache {
    entry: Option<BranchCacheEntry>,
}

impl BranchCache {
    /// Cached entry if `mod_time` matches the stored timestamp
    pub fn lookup(&self, mod_time: SystemTime) -> Option<&BranchCacheEntry> {
        self.entry
            .as_ref()
            .filter(|entry| entry.last_mod_time == mod_time)
    }

    pub fn store(&mut self, entry: BranchCacheEntry) {
        self.entry = Some(entry);
    }

    pub fn entry(&self) -> Option<&BranchCacheEntry> {
        self.entry.as_ref()
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
