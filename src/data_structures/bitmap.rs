/// Fixed-size bitmap over node indices
///
/// Each shortest-path worker owns one as its visited set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeBitmap {
    words: Vec<u64>,
    len: usize,
}

impl NodeBitmap {
    /// Creates a bitmap of `len` cleared bits
    pub fn new(len: usize) -> Self {
        NodeBitmap {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the bit is set; out-of-range indices read as unset
    pub fn contains(&self, index: usize) -> bool {
        index < self.len && self.words[index / 64] & (1 << (index % 64)) != 0
    }

    /// Sets a bit; returns false if it was already set or out of range
    pub fn insert(&mut self, index: usize) -> bool {
        if index >= self.len || self.contains(index) {
            return false;
        }
        self.words[index / 64] |= 1 << (index % 64);
        true
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
    }

    /// Number of set bits
    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }
}
