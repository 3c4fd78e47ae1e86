use std::{
    fmt,
    hash::{Hash, Hasher},
    io,
};

use rand::{RngExt, SeedableRng, rngs::StdRng};

use crate::{
    config::{RandomWeightConfig, WeightFormatConfig},
    utils::{read_f32, write_f32},
    weight::{DivideType, Weight, WeightGenerator, WeightParseError, WeightProperties},
};

fn write_float<O: fmt::Write + ?Sized>(out: &mut O, value: f32) -> fmt::Result {
    if value.is_nan() {
        write!(out, "BadNumber")
    } else if value == f32::INFINITY {
        write!(out, "Infinity")
    } else if value == f32::NEG_INFINITY {
        write!(out, "-Infinity")
    } else {
        write!(out, "{value}")
    }
}

fn read_float(text: &str) -> Result<f32, WeightParseError> {
    match text.trim() {
        "Infinity" | "inf" => Ok(f32::INFINITY),
        "-Infinity" | "-inf" => Ok(f32::NEG_INFINITY),
        "BadNumber" => Ok(f32::NAN),
        t => t
            .parse::<f32>()
            .map_err(|_| WeightParseError::InvalidNumber(t.to_string())),
    }
}

fn quantize_float(value: f32, delta: f32) -> f32 {
    if value.is_infinite() || value.is_nan() {
        value
    } else {
        (value / delta + 0.5).floor() * delta
    }
}

/// Division shared by both float semirings, where `times` is addition.
fn divide_float(f1: f32, f2: f32) -> f32 {
    if f2 == f32::INFINITY {
        f32::NAN
    } else if f1 == f32::INFINITY {
        f32::INFINITY
    } else {
        f1 - f2
    }
}

fn times_float(f1: f32, f2: f32) -> f32 {
    if f1 == f32::INFINITY || f2 == f32::INFINITY {
        f32::INFINITY
    } else {
        f1 + f2
    }
}

/// Defines a weight type wrapping an `f32` together with its equality,
/// hashing and random generator. Infinity is `zero()`, `0.0` is `one()` and
/// NaN is `no_weight()`.
macro_rules! float_weight {
    ($(#[$meta:meta])* $name:ident, $generator:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name(f32);

        impl $name {
            pub fn new(value: f32) -> Self {
                $name(value)
            }

            pub fn value(&self) -> f32 {
                self.0
            }
        }

        impl From<f32> for $name {
            fn from(value: f32) -> Self {
                $name(value)
            }
        }

        // NaN equals itself so that `no_weight()` can be stored and compared.
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0 || (self.0.is_nan() && other.0.is_nan())
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                let bits = if self.0 == 0.0 {
                    0.0f32.to_bits()
                } else if self.0.is_nan() {
                    f32::NAN.to_bits()
                } else {
                    self.0.to_bits()
                };
                bits.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_float(f, self.0)
            }
        }

        /// Draws weights from `0..num_random_weights`, plus `zero()` when
        /// allowed.
        #[derive(Debug)]
        pub struct $generator {
            random: StdRng,
            allow_zero: bool,
            num_random_weights: usize,
        }

        impl $generator {
            pub fn new(config: &RandomWeightConfig) -> Self {
                $generator {
                    random: StdRng::seed_from_u64(*config.get_seed()),
                    allow_zero: *config.get_allow_zero(),
                    num_random_weights: *config.get_num_random_weights(),
                }
            }
        }

        impl WeightGenerator<$name> for $generator {
            fn generate(&mut self) -> $name {
                let range = self.num_random_weights + usize::from(self.allow_zero);
                if range == 0 {
                    tracing::error!(
                        "WeightGenerate: empty range for {}",
                        <$name as Weight>::weight_type()
                    );
                    return <$name as Weight>::no_weight();
                }

                let n = self.random.random_range(0..range);
                if self.allow_zero && n == self.num_random_weights {
                    <$name as Weight>::zero()
                } else {
                    $name(n as f32)
                }
            }
        }
    };
}

float_weight!(
    /// Min-plus semiring over `f32 ∪ {∞}`.
    TropicalWeight,
    TropicalGenerator
);

float_weight!(
    /// Negative log semiring: `a ⊕ b = -ln(e^-a + e^-b)`.
    LogWeight,
    LogGenerator
);

impl Weight for TropicalWeight {
    type ReverseWeight = TropicalWeight;

    fn weight_type() -> String {
        "tropical".to_string()
    }

    fn properties() -> WeightProperties {
        WeightProperties::SEMIRING
            | WeightProperties::COMMUTATIVE
            | WeightProperties::IDEMPOTENT
            | WeightProperties::PATH
    }

    fn zero() -> Self {
        TropicalWeight(f32::INFINITY)
    }

    fn one() -> Self {
        TropicalWeight(0.0)
    }

    fn no_weight() -> Self {
        TropicalWeight(f32::NAN)
    }

    fn plus(&self, other: &Self) -> Self {
        if !self.member() || !other.member() {
            return Self::no_weight();
        }
        if self.0 < other.0 { *self } else { *other }
    }

    fn times(&self, other: &Self) -> Self {
        if !self.member() || !other.member() {
            return Self::no_weight();
        }
        TropicalWeight(times_float(self.0, other.0))
    }

    fn divide(&self, other: &Self, _divide_type: DivideType) -> Self {
        if !self.member() || !other.member() {
            return Self::no_weight();
        }
        TropicalWeight(divide_float(self.0, other.0))
    }

    fn member(&self) -> bool {
        !self.0.is_nan() && self.0 != f32::NEG_INFINITY
    }

    fn reverse(&self) -> Self::ReverseWeight {
        *self
    }

    fn quantize(&self, delta: f32) -> Self {
        TropicalWeight(quantize_float(self.0, delta))
    }

    fn approx_equal(&self, other: &Self, delta: f32) -> bool {
        self.0 <= other.0 + delta && other.0 <= self.0 + delta
    }

    fn write_text<O: fmt::Write + ?Sized>(
        &self,
        out: &mut O,
        _config: &WeightFormatConfig,
    ) -> fmt::Result {
        write_float(out, self.0)
    }

    fn read_text(text: &str, _config: &WeightFormatConfig) -> Result<Self, WeightParseError> {
        read_float(text).map(TropicalWeight)
    }

    fn write_binary<O: io::Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        write_f32(out, self.0)
    }

    fn read_binary<I: io::Read + ?Sized>(input: &mut I) -> io::Result<Self> {
        read_f32(input).map(TropicalWeight)
    }

    fn generator(config: &RandomWeightConfig) -> Box<dyn WeightGenerator<Self>> {
        Box::new(TropicalGenerator::new(config))
    }
}

impl Weight for LogWeight {
    type ReverseWeight = LogWeight;

    fn weight_type() -> String {
        "log".to_string()
    }

    fn properties() -> WeightProperties {
        WeightProperties::SEMIRING | WeightProperties::COMMUTATIVE
    }

    fn zero() -> Self {
        LogWeight(f32::INFINITY)
    }

    fn one() -> Self {
        LogWeight(0.0)
    }

    fn no_weight() -> Self {
        LogWeight(f32::NAN)
    }

    fn plus(&self, other: &Self) -> Self {
        if !self.member() || !other.member() {
            return Self::no_weight();
        }
        let (f1, f2) = (self.0, other.0);
        if f1 == f32::INFINITY {
            *other
        } else if f2 == f32::INFINITY {
            *self
        } else if f1 > f2 {
            LogWeight(f2 - (f2 - f1).exp().ln_1p())
        } else {
            LogWeight(f1 - (f1 - f2).exp().ln_1p())
        }
    }

    fn times(&self, other: &Self) -> Self {
        if !self.member() || !other.member() {
            return Self::no_weight();
        }
        LogWeight(times_float(self.0, other.0))
    }

    fn divide(&self, other: &Self, _divide_type: DivideType) -> Self {
        if !self.member() || !other.member() {
            return Self::no_weight();
        }
        LogWeight(divide_float(self.0, other.0))
    }

    fn member(&self) -> bool {
        !self.0.is_nan() && self.0 != f32::NEG_INFINITY
    }

    fn reverse(&self) -> Self::ReverseWeight {
        *self
    }

    fn quantize(&self, delta: f32) -> Self {
        LogWeight(quantize_float(self.0, delta))
    }

    fn approx_equal(&self, other: &Self, delta: f32) -> bool {
        self.0 <= other.0 + delta && other.0 <= self.0 + delta
    }

    fn write_text<O: fmt::Write + ?Sized>(
        &self,
        out: &mut O,
        _config: &WeightFormatConfig,
    ) -> fmt::Result {
        write_float(out, self.0)
    }

    fn read_text(text: &str, _config: &WeightFormatConfig) -> Result<Self, WeightParseError> {
        read_float(text).map(LogWeight)
    }

    fn write_binary<O: io::Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        write_f32(out, self.0)
    }

    fn read_binary<I: io::Read + ?Sized>(input: &mut I) -> io::Result<Self> {
        read_f32(input).map(LogWeight)
    }

    fn generator(config: &RandomWeightConfig) -> Box<dyn WeightGenerator<Self>> {
        Box::new(LogGenerator::new(config))
    }
}

#[test]
fn test_float_text() {
    let config = WeightFormatConfig::default();
    assert_eq!(TropicalWeight::zero().to_text(&config), "Infinity");
    assert_eq!(TropicalWeight::no_weight().to_text(&config), "BadNumber");
    assert_eq!(TropicalWeight::new(2.5).to_text(&config), "2.5");
    assert_eq!(
        TropicalWeight::read_text(" 3 ", &config),
        Ok(TropicalWeight::new(3.0))
    );
    assert_eq!(
        LogWeight::read_text("Infinity", &config),
        Ok(LogWeight::zero())
    );
    assert!(matches!(
        TropicalWeight::read_text("abc", &config),
        Err(WeightParseError::InvalidNumber(_))
    ));
}

#[test]
fn test_log_plus() {
    let a = LogWeight::new(1.0);
    let b = LogWeight::new(1.0);
    let expected = 1.0 - 2.0f32.ln();
    assert!(a.plus(&b).approx_equal(&LogWeight::new(expected), 1e-5));
    assert_eq!(a.plus(&LogWeight::zero()), a);
}
