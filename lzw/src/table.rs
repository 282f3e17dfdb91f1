//! The string table used while compressing.
//!
//! Every string known to the compressor is a previously known string (its prefix code) plus one
//! byte. Entries live in fixed arrays indexed by their code, and an open addressing hash table
//! maps `(prefix, byte)` back to a code. Nothing is allocated once the table exists, and
//! clearing it only resets counters and hash slots.

use log::trace;

/// Codes are at most 12 bits wide, so the table never holds more than 4096 strings.
pub const MAX_ENTRIES: usize = 1 << 12;

/// The prefix code of the empty string.
pub const EMPTY: u16 = u16::MAX;

const HASH_SIZE: usize = 9973;
const HASH_STEP: usize = 2039;
const FREE: u16 = u16::MAX;

/// Clear and end of information codes sit right after the literals.
const RESERVED_CODES: usize = 2;

pub struct StringTable {
    prefixes: Box<[u16]>,
    suffixes: Box<[u8]>,
    slots: Box<[u16]>,
    len: usize,
}

impl StringTable {
    pub fn new() -> Self {
        Self {
            prefixes: vec![EMPTY; MAX_ENTRIES].into_boxed_slice(),
            suffixes: vec![0; MAX_ENTRIES].into_boxed_slice(),
            slots: vec![FREE; HASH_SIZE].into_boxed_slice(),
            len: 0,
        }
    }

    /// Forget every learned string, keeping one entry per literal of `code_size` bits,
    /// followed by the clear and end of information codes.
    pub fn clear(&mut self, code_size: u8) {
        trace!("Clearing string table for code size {code_size}");
        self.slots.fill(FREE);

        // Literals are found without hashing, see `find`, so they only need their entry.
        let reserved = (1 << code_size) + RESERVED_CODES;
        for code in 0..reserved {
            self.prefixes[code] = EMPTY;
            self.suffixes[code] = code as u8;
        }
        self.len = reserved;
    }

    /// Code of the string `prefix` + `k`, if the table knows it.
    #[inline]
    pub fn find(&self, prefix: u16, k: u8) -> Option<u16> {
        if prefix == EMPTY {
            return Some(k as u16);
        }

        let mut slot = hash(prefix, k);
        loop {
            let code = self.slots[slot];
            if code == FREE {
                return None;
            }
            let index = code as usize;
            if self.prefixes[index] == prefix && self.suffixes[index] == k {
                return Some(code);
            }
            slot = (slot + HASH_STEP) % HASH_SIZE;
        }
    }

    /// Learn the string `prefix` + `k`, returning its code, or `None` when all 4096 codes are
    /// already taken.
    #[inline]
    pub fn add(&mut self, prefix: u16, k: u8) -> Option<u16> {
        if self.len >= MAX_ENTRIES {
            return None;
        }

        let mut slot = hash(prefix, k);
        while self.slots[slot] != FREE {
            slot = (slot + HASH_STEP) % HASH_SIZE;
        }

        let code = self.len as u16;
        self.slots[slot] = code;
        self.prefixes[self.len] = prefix;
        self.suffixes[self.len] = k;
        self.len += 1;

        Some(code)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for StringTable {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn hash(prefix: u16, k: u8) -> usize {
    ((((k as u16) << 8) ^ prefix) as usize) % HASH_SIZE
}
