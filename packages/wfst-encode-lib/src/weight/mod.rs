use std::{
    fmt::{self, Debug, Display},
    hash::{DefaultHasher, Hash, Hasher},
    io,
    ops::{BitAnd, BitOr},
};

use itertools::Itertools;

use crate::config::{RandomWeightConfig, WeightFormatConfig};

pub mod composite;
pub mod float;
pub mod generic;
pub mod natural_order;
pub mod power;
pub mod product;

pub use float::{LogWeight, TropicalWeight};
pub use generic::{UnsupportedGenerator, WeightGenerator};
pub use natural_order::NaturalLess;
pub use power::PowerWeight;
pub use product::ProductWeight;

/// Default tolerance for `quantize` and `approx_equal`.
pub const DELTA: f32 = 1.0 / 1024.0;

/// Default number of distinct weights a random generator draws from.
pub const NUM_RANDOM_WEIGHTS: usize = 5;

/// Algebraic properties a weight type guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeightProperties(u64);

impl WeightProperties {
    /// `times` left-distributes over `plus`.
    pub const LEFT_SEMIRING: WeightProperties = WeightProperties(0x01);
    /// `times` right-distributes over `plus`.
    pub const RIGHT_SEMIRING: WeightProperties = WeightProperties(0x02);
    pub const SEMIRING: WeightProperties = WeightProperties(0x03);
    /// `times` is commutative.
    pub const COMMUTATIVE: WeightProperties = WeightProperties(0x04);
    /// `plus(a, a) == a`.
    pub const IDEMPOTENT: WeightProperties = WeightProperties(0x08);
    /// `plus(a, b)` is always `a` or `b`.
    pub const PATH: WeightProperties = WeightProperties(0x10);

    pub const NONE: WeightProperties = WeightProperties(0);

    pub fn bits(&self) -> u64 {
        self.0
    }

    pub fn contains(&self, other: WeightProperties) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for WeightProperties {
    type Output = WeightProperties;

    fn bitor(self, rhs: Self) -> Self::Output {
        WeightProperties(self.0 | rhs.0)
    }
}

impl BitAnd for WeightProperties {
    type Output = WeightProperties;

    fn bitand(self, rhs: Self) -> Self::Output {
        WeightProperties(self.0 & rhs.0)
    }
}

impl Display for WeightProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (WeightProperties::LEFT_SEMIRING, "left_semiring"),
            (WeightProperties::RIGHT_SEMIRING, "right_semiring"),
            (WeightProperties::COMMUTATIVE, "commutative"),
            (WeightProperties::IDEMPOTENT, "idempotent"),
            (WeightProperties::PATH, "path"),
        ];
        let set = names
            .iter()
            .filter(|(p, _)| self.contains(*p))
            .map(|(_, n)| *n)
            .join("|");

        if set.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{set}")
        }
    }
}

/// Which side the divisor is removed from.
///
/// For `divide(c, a, Left)` the result `b` satisfies `c = a ⊗ b`, for `Right`
/// it satisfies `c = b ⊗ a`. `Any` is only meaningful for commutative types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DivideType {
    Left,
    Right,
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeightParseError {
    #[error("invalid weight \"{0}\"")]
    InvalidNumber(String),
    #[error("empty element in composite weight")]
    EmptyElement,
    #[error("composite weight is missing its open parenthesis")]
    MissingOpenParen,
    #[error("composite weight is missing its close parenthesis")]
    MissingCloseParen,
    #[error("unmatched close parenthesis in composite weight")]
    UnmatchedCloseParen,
    #[error("excess character '{0}' after composite weight")]
    ExcessCharacter(char),
    #[error("composite weight stream is in a failed state")]
    BadStream,
}

/// An element of a semiring.
///
/// Implementations must satisfy the semiring laws their
/// [`properties`](Weight::properties) claim. `zero()` and `one()` are always
/// members and `zero` annihilates under `times`. Operations that cannot
/// produce a meaningful value return [`no_weight`](Weight::no_weight) instead
/// of panicking.
pub trait Weight: Clone + Debug + PartialEq + Eq + Hash + Sized + 'static {
    /// The weight type of the reversed semiring. Reversing twice gives back
    /// the original type.
    type ReverseWeight: Weight<ReverseWeight = Self>;

    /// Type tag, used in codex files and diagnostics.
    fn weight_type() -> String;

    fn properties() -> WeightProperties;

    fn zero() -> Self;

    fn one() -> Self;

    /// A non-member value signalling an undefined result.
    fn no_weight() -> Self;

    fn plus(&self, other: &Self) -> Self;

    fn times(&self, other: &Self) -> Self;

    fn divide(&self, other: &Self, divide_type: DivideType) -> Self;

    fn member(&self) -> bool;

    fn reverse(&self) -> Self::ReverseWeight;

    fn quantize(&self, delta: f32) -> Self;

    fn approx_equal(&self, other: &Self, delta: f32) -> bool;

    fn write_text<O: fmt::Write + ?Sized>(
        &self,
        out: &mut O,
        config: &WeightFormatConfig,
    ) -> fmt::Result;

    fn read_text(text: &str, config: &WeightFormatConfig) -> Result<Self, WeightParseError>;

    fn write_binary<O: io::Write + ?Sized>(&self, out: &mut O) -> io::Result<()>;

    fn read_binary<I: io::Read + ?Sized>(input: &mut I) -> io::Result<Self>;

    fn to_text(&self, config: &WeightFormatConfig) -> String {
        let mut s = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_text(&mut s, config);
        s
    }

    /// Stable 64-bit hash of the value, consistent with `Eq`.
    fn hash_value(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Random generator for this weight type. Types without one get a
    /// generator that reports the problem and yields `no_weight()`.
    fn generator(config: &RandomWeightConfig) -> Box<dyn WeightGenerator<Self>> {
        let _ = config;
        Box::new(UnsupportedGenerator::new())
    }
}

#[test]
fn test_properties_display() {
    assert_eq!(
        (WeightProperties::SEMIRING | WeightProperties::PATH).to_string(),
        "left_semiring|right_semiring|path"
    );
    assert_eq!(WeightProperties::NONE.to_string(), "none");
    assert!(WeightProperties::SEMIRING.contains(WeightProperties::LEFT_SEMIRING));
    assert!(!WeightProperties::LEFT_SEMIRING.contains(WeightProperties::SEMIRING));
}
