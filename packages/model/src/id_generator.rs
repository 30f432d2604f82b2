use crc32fast::Hasher;

/// Generate a document ID from an arbitrary key using CRC32
pub fn get_document_id(key: &str) -> String {
    let mut buff = String::from(key);
    if !key.starts_with("blockdeck://") {
        buff = format!("blockdeck://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for slides and blocks within a document
#[derive(Debug, Clone)]
pub struct IDGenerator {
    seed: String, // Document ID (CRC32)
    count: u64,   // Sequential counter
}

impl IDGenerator {
    pub fn new(key: &str) -> Self {
        Self {
            seed: get_document_id(key),
            count: 0,
        }
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID.
    ///
    /// If the counter is exhausted (only possible after observing a huge
    /// suffix) numbering restarts under a seed derived from the current one.
    pub fn new_id(&mut self) -> String {
        self.count = match self.count.checked_add(1) {
            Some(count) => count,
            None => {
                self.seed = get_document_id(&format!("{}/{}", self.seed, u64::MAX));
                1
            }
        };
        format!("{}-{}", self.seed, self.count)
    }

    /// Generate `n` sequential IDs
    pub fn new_ids(&mut self, n: usize) -> Vec<String> {
        (0..n).map(|_| self.new_id()).collect()
    }

    /// Account for an ID minted elsewhere (e.g. in a persisted document) so
    /// that later IDs never collide with it.
    pub fn observe(&mut self, id: &str) {
        let Some(suffix) = id
            .strip_prefix(self.seed.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
        else {
            return;
        };

        if let Ok(n) = suffix.parse::<u64>() {
            self.count = self.count.max(n);
        }
    }

    /// Get document ID seed
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of IDs issued or observed so far
    pub fn count(&self) -> u64 {
        self.count
    }
}
