//! Request and buffer types exchanged with key-agreement transforms
//!
//! Callers hand over their input and output storage as scatter-gather lists.
//! Copies in and out of a list report how many bytes actually moved, so a
//! short list surfaces as a count mismatch rather than a silent truncation.

use core::fmt;
use zeroize::Zeroize;

/// A scatter-gather list: an ordered set of byte segments viewed as one buffer
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SgList {
    segments: Vec<Vec<u8>>,
}

impl SgList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list from explicit segments
    pub fn from_segments(segments: Vec<Vec<u8>>) -> Self {
        Self { segments }
    }

    /// Create a single-segment list holding a copy of `bytes`
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            segments: vec![bytes.to_vec()],
        }
    }

    /// Create a single zero-filled segment of `len` bytes
    pub fn zeroed(len: usize) -> Self {
        Self {
            segments: vec![vec![0u8; len]],
        }
    }

    /// Total number of bytes across all segments
    pub fn len(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    /// Check if the list holds no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the individual segments
    pub fn segments(&self) -> &[Vec<u8>] {
        &self.segments
    }

    /// Copy bytes out of the list into `buf`, starting at the first byte
    ///
    /// Returns the number of bytes copied, which is the smaller of the list
    /// length and `buf.len()`.
    pub fn copy_to_buffer(&self, buf: &mut [u8]) -> usize {
        let mut copied = 0;
        for seg in &self.segments {
            if copied == buf.len() {
                break;
            }
            let n = seg.len().min(buf.len() - copied);
            buf[copied..copied + n].copy_from_slice(&seg[..n]);
            copied += n;
        }
        copied
    }

    /// Copy `buf` into the list, starting at the first byte
    ///
    /// Returns the number of bytes copied, which is the smaller of the list
    /// length and `buf.len()`.
    pub fn copy_from_buffer(&mut self, buf: &[u8]) -> usize {
        let mut copied = 0;
        for seg in &mut self.segments {
            if copied == buf.len() {
                break;
            }
            let n = seg.len().min(buf.len() - copied);
            seg[..n].copy_from_slice(&buf[copied..copied + n]);
            copied += n;
        }
        copied
    }

    /// Flatten the first `len` bytes into a contiguous vector
    pub fn to_vec(&self, len: usize) -> Vec<u8> {
        let mut out = vec![0u8; len.min(self.len())];
        self.copy_to_buffer(&mut out);
        out
    }
}

impl Zeroize for SgList {
    fn zeroize(&mut self) {
        for seg in &mut self.segments {
            seg.zeroize();
        }
    }
}

impl fmt::Debug for SgList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SgList(segments={}, len={})", self.segments.len(), self.len())
    }
}

/// A key-agreement request: source and destination buffers plus their lengths
///
/// `src` is only read by compute-shared-secret. On successful completion
/// `dst_len` holds the exact number of bytes written to `dst`; after a failed
/// completion its value is unspecified.
#[derive(Debug, Clone, Default)]
pub struct KppRequest {
    /// Peer public value, if the operation consumes one
    pub src: Option<SgList>,
    /// Caller-provided output storage
    pub dst: SgList,
    /// Number of valid bytes in `src`
    pub src_len: usize,
    /// Capacity of `dst` on submission, bytes written on completion
    pub dst_len: usize,
}

impl KppRequest {
    /// Request with no input and a zeroed output buffer of `dst_capacity` bytes
    pub fn new(dst_capacity: usize) -> Self {
        Self {
            src: None,
            dst: SgList::zeroed(dst_capacity),
            src_len: 0,
            dst_len: dst_capacity,
        }
    }

    /// Request carrying a peer public value
    pub fn with_src(src: SgList, dst_capacity: usize) -> Self {
        let src_len = src.len();
        Self {
            src: Some(src),
            dst: SgList::zeroed(dst_capacity),
            src_len,
            dst_len: dst_capacity,
        }
    }

    /// Convenience constructor from a contiguous peer value
    pub fn with_src_bytes(src: &[u8], dst_capacity: usize) -> Self {
        Self::with_src(SgList::from_slice(src), dst_capacity)
    }

    /// The bytes reported as written by the last successful completion
    pub fn output(&self) -> Vec<u8> {
        self.dst.to_vec(self.dst_len)
    }
}
