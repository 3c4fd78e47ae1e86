use std::{fmt, io};

use wfst_encode_lib::{
    config::{RandomWeightConfig, WeightFormatConfig},
    weight::{
        DivideType, LogWeight, PowerWeight, ProductWeight, TropicalWeight, Weight,
        WeightParseError, WeightProperties,
        generic::{WeightConvertRegistry, power, weight_convert},
    },
};

/// Boolean semiring without a random generator or registered conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BooleanWeight(Option<bool>);

impl Weight for BooleanWeight {
    type ReverseWeight = BooleanWeight;

    fn weight_type() -> String {
        "boolean".to_string()
    }

    fn properties() -> WeightProperties {
        WeightProperties::SEMIRING
            | WeightProperties::COMMUTATIVE
            | WeightProperties::IDEMPOTENT
            | WeightProperties::PATH
    }

    fn zero() -> Self {
        BooleanWeight(Some(false))
    }

    fn one() -> Self {
        BooleanWeight(Some(true))
    }

    fn no_weight() -> Self {
        BooleanWeight(None)
    }

    fn plus(&self, other: &Self) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => BooleanWeight(Some(a || b)),
            _ => Self::no_weight(),
        }
    }

    fn times(&self, other: &Self) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => BooleanWeight(Some(a && b)),
            _ => Self::no_weight(),
        }
    }

    fn divide(&self, _other: &Self, _divide_type: DivideType) -> Self {
        *self
    }

    fn member(&self) -> bool {
        self.0.is_some()
    }

    fn reverse(&self) -> Self::ReverseWeight {
        *self
    }

    fn quantize(&self, _delta: f32) -> Self {
        *self
    }

    fn approx_equal(&self, other: &Self, _delta: f32) -> bool {
        self == other
    }

    fn write_text<O: fmt::Write + ?Sized>(
        &self,
        out: &mut O,
        _config: &WeightFormatConfig,
    ) -> fmt::Result {
        match self.0 {
            Some(b) => write!(out, "{b}"),
            None => write!(out, "BadBool"),
        }
    }

    fn read_text(text: &str, _config: &WeightFormatConfig) -> Result<Self, WeightParseError> {
        text.parse::<bool>()
            .map(|b| BooleanWeight(Some(b)))
            .map_err(|_| WeightParseError::InvalidNumber(text.to_string()))
    }

    fn write_binary<O: io::Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        out.write_all(&[self.0.map_or(2, u8::from)])
    }

    fn read_binary<I: io::Read + ?Sized>(input: &mut I) -> io::Result<Self> {
        let mut buf = [0u8; 1];
        input.read_exact(&mut buf)?;
        Ok(BooleanWeight(match buf[0] {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }))
    }
}

#[test]
fn test_power() {
    let w = TropicalWeight::new(1.5);
    assert_eq!(power(&w, 0), TropicalWeight::one());
    assert_eq!(power(&w, 1), w);
    assert_eq!(power(&w, 4), TropicalWeight::new(6.0));
    assert_eq!(power(&TropicalWeight::zero(), 3), TropicalWeight::zero());

    let l = LogWeight::new(0.5);
    for n in 1..6 {
        assert_eq!(power(&l, n), power(&l, n - 1).times(&l));
    }

    let p = ProductWeight::new(TropicalWeight::new(1.0), LogWeight::new(2.0));
    assert_eq!(
        power(&p, 3),
        ProductWeight::new(TropicalWeight::new(3.0), LogWeight::new(6.0))
    );

    let q = PowerWeight::new([TropicalWeight::new(1.0), TropicalWeight::new(0.0)]);
    assert_eq!(power(&q, 0), PowerWeight::one());
    assert_eq!(
        power(&q, 2),
        PowerWeight::new([TropicalWeight::new(2.0), TropicalWeight::new(0.0)])
    );

    assert_eq!(power(&BooleanWeight::zero(), 0), BooleanWeight::one());
}

#[test]
fn test_convert_identity() {
    let w = ProductWeight::new(TropicalWeight::new(2.0), TropicalWeight::new(3.0));
    let same: ProductWeight<TropicalWeight, TropicalWeight> = weight_convert(&w);
    assert_eq!(same, w);

    let b: BooleanWeight = weight_convert(&BooleanWeight::one());
    assert_eq!(b, BooleanWeight::one());
}

#[test]
fn test_convert_tropical_log() {
    let t = TropicalWeight::new(2.5);
    let l: LogWeight = weight_convert(&t);
    assert_eq!(l, LogWeight::new(2.5));

    let back: TropicalWeight = weight_convert(&l);
    assert_eq!(back, t);

    let zero: LogWeight = weight_convert(&TropicalWeight::zero());
    assert_eq!(zero, LogWeight::zero());
}

#[test]
fn test_convert_unsupported() {
    let converted: BooleanWeight = weight_convert(&TropicalWeight::new(1.0));
    assert!(!converted.member());

    let converted: TropicalWeight = weight_convert(&BooleanWeight::one());
    assert!(!converted.member());
}

#[test]
fn test_custom_registry() {
    let mut registry = WeightConvertRegistry::empty();
    assert!(!registry.supports::<TropicalWeight, LogWeight>());
    assert!(registry.supports::<LogWeight, LogWeight>());
    let unsupported: LogWeight = registry.convert(&TropicalWeight::new(1.0));
    assert!(!unsupported.member());

    registry.register(|w: &BooleanWeight| {
        if *w == BooleanWeight::one() {
            TropicalWeight::one()
        } else {
            TropicalWeight::zero()
        }
    });
    assert!(registry.supports::<BooleanWeight, TropicalWeight>());
    let converted: TropicalWeight = registry.convert(&BooleanWeight::zero());
    assert_eq!(converted, TropicalWeight::zero());
}

#[test]
fn test_generate_deterministic() {
    let config = RandomWeightConfig::default().with_seed(99);
    let mut g1 = TropicalWeight::generator(&config);
    let mut g2 = TropicalWeight::generator(&config);
    for _ in 0..50 {
        assert_eq!(g1.generate(), g2.generate());
    }
}

#[test]
fn test_generate_range() {
    let config = RandomWeightConfig::default()
        .with_seed(5)
        .with_num_random_weights(3);
    let mut generator = LogWeight::generator(&config);
    let mut saw_zero = false;
    for _ in 0..200 {
        let w = generator.generate();
        assert!(w.member());
        if w == LogWeight::zero() {
            saw_zero = true;
        } else {
            assert!([0.0, 1.0, 2.0].contains(&w.value()), "{w:?} out of range");
        }
    }
    assert!(saw_zero);

    let mut no_zero = TropicalWeight::generator(&config.clone().with_allow_zero(false));
    for _ in 0..200 {
        assert_ne!(no_zero.generate(), TropicalWeight::zero());
    }
}

#[test]
fn test_generate_composite() {
    let config = RandomWeightConfig::default().with_seed(8);
    let mut generator = PowerWeight::<TropicalWeight, 4>::generator(&config);
    for _ in 0..20 {
        assert!(generator.generate().member());
    }
}

#[test]
fn test_generate_unsupported() {
    let mut generator = BooleanWeight::generator(&RandomWeightConfig::default());
    assert!(!generator.generate().member());

    // The product is only as good as its weakest component.
    let mut generator =
        ProductWeight::<TropicalWeight, BooleanWeight>::generator(&RandomWeightConfig::default());
    let w = generator.generate();
    assert!(w.value1().member());
    assert!(!w.value2().member());
}
