// lzw.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Lempel-Ziv-Welch compression for GIF
use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Code type
pub type Code = u16;

/// Maximum code bits allowed for GIF
const MAX_CODE_BITS: u8 = 12;

/// Maximum number of dictionary entries
const MAX_ENTRIES: usize = 1 << MAX_CODE_BITS;

/// Node for code dictionary
#[derive(Clone, Copy, Debug)]
struct Node {
    /// Next node code (first extension of this phrase)
    next: Option<Code>,
    /// Left node code (sibling with smaller byte)
    left: Option<Code>,
    /// Right node code (sibling with larger byte)
    right: Option<Code>,
    /// Byte value
    byte: u8,
}

/// Code dictionary trie
///
/// Each phrase is a node linked to its prefix's `next` chain, which is kept
/// as a binary search tree of siblings ordered by byte.
#[derive(Debug)]
struct Trie {
    /// Table of codes
    table: Vec<Node>,
    /// Minimum code bits
    min_code_bits: u8,
}

impl Node {
    /// Create a new leaf node
    fn new(byte: u8) -> Self {
        Node {
            next: None,
            left: None,
            right: None,
            byte,
        }
    }

    /// Get a link code
    fn link(&self, ordering: Ordering) -> Option<Code> {
        match ordering {
            Ordering::Less => self.left,
            Ordering::Equal => self.next,
            Ordering::Greater => self.right,
        }
    }

    /// Set a link code
    fn set_link(&mut self, ordering: Ordering, code: Code) {
        match ordering {
            Ordering::Less => self.left = Some(code),
            Ordering::Equal => self.next = Some(code),
            Ordering::Greater => self.right = Some(code),
        }
    }
}

impl Trie {
    /// Create a new code dictionary
    fn new(min_code_bits: u8) -> Self {
        let mut trie = Trie {
            table: Vec::with_capacity(MAX_ENTRIES),
            min_code_bits,
        };
        trie.reset();
        trie
    }

    /// Get the clear code
    fn clear_code(&self) -> Code {
        1 << self.min_code_bits
    }

    /// Get the end code
    fn end_code(&self) -> Code {
        self.clear_code() + 1
    }

    /// Get the next available code
    fn next_code(&self) -> Code {
        self.table.len() as Code
    }

    /// Reset the dictionary
    fn reset(&mut self) {
        self.table.clear();
        for byte in 0..self.clear_code() {
            self.table.push(Node::new(byte as u8));
        }
        self.table.push(Node::new(0)); // clear code
        self.table.push(Node::new(0)); // end code
    }

    /// Extend a phrase by one byte.
    ///
    /// Returns the code of the extended phrase if it exists, otherwise adds
    /// it to the dictionary and returns `None`.
    fn extend(&mut self, code: Code, byte: u8) -> Option<Code> {
        let next_code = self.next_code();
        let mut node = code;
        let mut ordering = Ordering::Equal;
        while let Some(link) = self.table[usize::from(node)].link(ordering) {
            node = link;
            ordering = byte.cmp(&self.table[usize::from(node)].byte);
            if ordering == Ordering::Equal {
                return Some(node);
            }
        }
        self.table[usize::from(node)].set_link(ordering, next_code);
        self.table.push(Node::new(byte));
        None
    }
}

/// Compression state
#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    /// Initial clear code not yet emitted
    Start,
    /// Consuming indices
    Data,
    /// Remaining phrase not yet emitted
    Flush,
    /// End code not yet emitted
    End,
    /// Finished
    Done,
}

/// Iterator of `(code, bits)` pairs for LZW compressed indices.
///
/// Codes are produced lazily; the dictionary only lives as long as the
/// iterator.
pub struct Codes<'a> {
    /// Indices to compress
    indices: std::slice::Iter<'a, u8>,
    /// Code dictionary
    trie: Trie,
    /// Minimum code bits
    min_code_bits: u8,
    /// Current code bits
    code_bits: u8,
    /// Code of the current phrase
    phrase: Option<Code>,
    /// Clear code waiting after a full dictionary
    pending: Option<(Code, u8)>,
    /// Compression state
    state: State,
}

impl<'a> Codes<'a> {
    /// Create a new code iterator.
    ///
    /// Every index must be less than `1 << min_code_bits`, which must be
    /// between 2 and 8.
    pub fn new(indices: &'a [u8], min_code_bits: u8) -> Result<Self> {
        if !(2..=8).contains(&min_code_bits) {
            return Err(Error::InvalidCodeSize(min_code_bits));
        }
        let clear = 1u16 << min_code_bits;
        if let Some(idx) = indices.iter().find(|i| Code::from(**i) >= clear) {
            return Err(Error::InvalidColorIndex(*idx));
        }
        Ok(Codes {
            indices: indices.iter(),
            trie: Trie::new(min_code_bits),
            min_code_bits,
            code_bits: min_code_bits + 1,
            phrase: None,
            pending: None,
            state: State::Start,
        })
    }

    /// Consume indices until a code is ready
    fn next_data(&mut self) -> Option<(Code, u8)> {
        for byte in self.indices.by_ref() {
            let code = match self.phrase {
                Some(code) => code,
                None => {
                    self.phrase = Some(Code::from(*byte));
                    continue;
                }
            };
            if let Some(code) = self.trie.extend(code, *byte) {
                self.phrase = Some(code);
                continue;
            }
            let bits = self.code_bits;
            let assigned = self.trie.next_code() - 1;
            if assigned == 1 << self.code_bits {
                self.code_bits += 1;
            }
            if usize::from(self.trie.next_code()) == MAX_ENTRIES {
                trace!("LZW dictionary full, clearing");
                self.pending = Some((self.trie.clear_code(), self.code_bits));
                self.trie.reset();
                self.code_bits = self.min_code_bits + 1;
            }
            self.phrase = Some(Code::from(*byte));
            return Some((code, bits));
        }
        None
    }
}

impl<'a> Iterator for Codes<'a> {
    type Item = (Code, u8);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(pending) = self.pending.take() {
            return Some(pending);
        }
        loop {
            match self.state {
                State::Start => {
                    self.state = State::Data;
                    return Some((self.trie.clear_code(), self.code_bits));
                }
                State::Data => {
                    let code = self.next_data();
                    if code.is_some() {
                        return code;
                    }
                    self.state = State::Flush;
                }
                State::Flush => {
                    self.state = State::End;
                    if let Some(code) = self.phrase.take() {
                        return Some((code, self.code_bits));
                    }
                }
                State::End => {
                    self.state = State::Done;
                    return Some((self.trie.end_code(), self.code_bits));
                }
                State::Done => return None,
            }
        }
    }
}

/// Packer for variable-width codes, least-significant bit first
#[derive(Debug, Default)]
pub struct BitPacker {
    /// Packed bytes
    buffer: Vec<u8>,
    /// Bits not yet packed into a byte
    code: u32,
    /// Number of bits in `code`
    n_bits: u8,
}

impl BitPacker {
    /// Create a new bit packer
    pub fn new() -> Self {
        BitPacker::default()
    }

    /// Pack a code into the buffer
    pub fn pack(&mut self, code: Code, bits: u8) {
        debug_assert!(bits <= MAX_CODE_BITS && u32::from(code) < 1 << bits);
        self.code |= u32::from(code) << self.n_bits;
        self.n_bits += bits;
        while self.n_bits >= 8 {
            self.buffer.push(self.code as u8);
            self.code >>= 8;
            self.n_bits -= 8;
        }
    }

    /// Finish packing, including any partial byte
    pub fn finish(mut self) -> Vec<u8> {
        if self.n_bits > 0 {
            self.buffer.push(self.code as u8);
        }
        self.buffer
    }
}

/// Pack a sequence of `(code, bits)` pairs into bytes
pub fn pack_codes<I>(codes: I) -> Vec<u8>
where
    I: IntoIterator<Item = (Code, u8)>,
{
    let mut packer = BitPacker::new();
    for (code, bits) in codes {
        packer.pack(code, bits);
    }
    packer.finish()
}

/// Compress color indices into packed LZW data
pub fn compress(indices: &[u8], min_code_bits: u8) -> Result<Vec<u8>> {
    Ok(pack_codes(Codes::new(indices, min_code_bits)?))
}
