//! Reversible encoding of transition labels and weights into single codes.
//!
//! An [`EncodeMapper`] assigns every distinct `(ilabel, olabel, weight)`
//! triple a code. Encoding rewrites each transition so that it carries only
//! the code, decoding restores the original triple. The mapping can be
//! persisted as a codex file and reused across transducers.

use std::{fmt::Display, io};

use crate::fst::Label;

pub mod mapper;
pub mod service;
pub mod table;

pub use mapper::EncodeMapper;
pub use service::{EncodeSummary, decode, decode_fst, encode, encode_fst};
pub use table::EncodeTable;

/// Magic number at the start of every codex file.
pub const ENCODE_MAGIC_NUMBER: i32 = 2129983209;

/// Which parts of a transition are folded into the code. The input label is
/// always encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EncodeFlags {
    pub labels: bool,
    pub weights: bool,
}

impl EncodeFlags {
    pub const LABELS_BIT: u32 = 0x1;
    pub const WEIGHTS_BIT: u32 = 0x2;

    pub fn new(labels: bool, weights: bool) -> Self {
        EncodeFlags { labels, weights }
    }

    pub fn labels() -> Self {
        EncodeFlags::new(true, false)
    }

    pub fn weights() -> Self {
        EncodeFlags::new(false, true)
    }

    pub fn all() -> Self {
        EncodeFlags::new(true, true)
    }

    pub fn bits(&self) -> u32 {
        let mut bits = 0;
        if self.labels {
            bits |= Self::LABELS_BIT;
        }
        if self.weights {
            bits |= Self::WEIGHTS_BIT;
        }
        bits
    }

    /// `None` if unknown bits are set.
    pub fn from_bits(bits: u32) -> Option<Self> {
        if bits & !(Self::LABELS_BIT | Self::WEIGHTS_BIT) != 0 {
            return None;
        }
        Some(EncodeFlags::new(
            bits & Self::LABELS_BIT != 0,
            bits & Self::WEIGHTS_BIT != 0,
        ))
    }
}

impl Display for EncodeFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.labels, self.weights) {
            (true, true) => write!(f, "labels+weights"),
            (true, false) => write!(f, "labels"),
            (false, true) => write!(f, "weights"),
            (false, false) => write!(f, "none"),
        }
    }
}

/// A label/weight triple as stored in the codex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodeTuple<W> {
    pub ilabel: Label,
    pub olabel: Label,
    pub weight: W,
}

impl<W> EncodeTuple<W> {
    pub fn new(ilabel: Label, olabel: Label, weight: W) -> Self {
        EncodeTuple {
            ilabel,
            olabel,
            weight,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("code {0} is not in the codex")]
    UnknownCode(Label),
    #[error("input label {ilabel} differs from output label {olabel} on a label-encoded transition")]
    LabelMismatch { ilabel: Label, olabel: Label },
    #[error("weight {0} is not one on a weight-encoded transition")]
    NonTrivialWeight(String),
    #[error("codex encodes {codex} but {requested} was requested")]
    FlagsMismatch {
        codex: EncodeFlags,
        requested: EncodeFlags,
    },
    #[error("codex weight type is {found}, expected {expected}")]
    WeightTypeMismatch { expected: String, found: String },
    #[error("invalid codex: {0}")]
    InvalidCodex(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[test]
fn test_flag_bits() {
    assert_eq!(EncodeFlags::all().bits(), 3);
    assert_eq!(EncodeFlags::from_bits(2), Some(EncodeFlags::weights()));
    assert_eq!(EncodeFlags::from_bits(4), None);
    assert_eq!(EncodeFlags::labels().to_string(), "labels");
    assert_eq!(EncodeFlags::default().to_string(), "none");
}
