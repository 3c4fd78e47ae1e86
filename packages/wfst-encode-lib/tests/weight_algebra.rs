use wfst_encode_lib::{
    config::{RandomWeightConfig, WeightFormatConfig},
    weight::{
        DELTA, DivideType, LogWeight, PowerWeight, ProductWeight, TropicalWeight, Weight,
        WeightProperties,
    },
};

type TropicalPair = ProductWeight<TropicalWeight, TropicalWeight>;
type TropicalTriple = PowerWeight<TropicalWeight, 3>;

fn random_weights<W: Weight>(seed: u64, count: usize) -> Vec<W> {
    let mut generator = W::generator(&RandomWeightConfig::default().with_seed(seed));
    (0..count).map(|_| generator.generate()).collect()
}

/// Checks the semiring axioms on all triples of `samples`, comparing with
/// `approx_equal` so that the log semiring passes despite rounding.
fn assert_semiring_laws<W: Weight>(samples: &[W]) {
    let zero = W::zero();
    let one = W::one();
    assert!(zero.member());
    assert!(one.member());

    for a in samples {
        assert!(a.member(), "{a:?} is not a member");
        assert_eq!(a.plus(&zero), *a);
        assert_eq!(zero.plus(a), *a);
        assert_eq!(a.times(&one), *a);
        assert_eq!(one.times(a), *a);
        assert_eq!(a.times(&zero), zero);
        assert_eq!(zero.times(a), zero);

        for b in samples {
            assert!(a.plus(b).approx_equal(&b.plus(a), DELTA));

            for c in samples {
                assert!(
                    a.plus(b).plus(c).approx_equal(&a.plus(&b.plus(c)), DELTA),
                    "plus is not associative on {a:?}, {b:?}, {c:?}"
                );
                assert!(
                    a.times(b).times(c).approx_equal(&a.times(&b.times(c)), DELTA),
                    "times is not associative on {a:?}, {b:?}, {c:?}"
                );
                if W::properties().contains(WeightProperties::LEFT_SEMIRING) {
                    assert!(
                        a.times(&b.plus(c))
                            .approx_equal(&a.times(b).plus(&a.times(c)), DELTA),
                        "times does not left-distribute on {a:?}, {b:?}, {c:?}"
                    );
                }
                if W::properties().contains(WeightProperties::RIGHT_SEMIRING) {
                    assert!(
                        b.plus(c)
                            .times(a)
                            .approx_equal(&b.times(a).plus(&c.times(a)), DELTA),
                        "times does not right-distribute on {a:?}, {b:?}, {c:?}"
                    );
                }
            }
        }
    }
}

fn assert_declared_properties<W: Weight>(samples: &[W]) {
    for a in samples {
        if W::properties().contains(WeightProperties::IDEMPOTENT) {
            assert_eq!(a.plus(a), *a);
        }
        for b in samples {
            if W::properties().contains(WeightProperties::COMMUTATIVE) {
                assert!(a.times(b).approx_equal(&b.times(a), DELTA));
            }
            if W::properties().contains(WeightProperties::PATH) {
                let sum = a.plus(b);
                assert!(sum == *a || sum == *b);
            }
        }
    }
}

fn assert_reverse_involution<W: Weight>(samples: &[W]) {
    for a in samples {
        assert_eq!(a.reverse().reverse(), *a);
    }
}

#[test]
fn test_tropical_semiring() {
    let samples = random_weights::<TropicalWeight>(7, 8);
    assert_semiring_laws(&samples);
    assert_declared_properties(&samples);
    assert_reverse_involution(&samples);
}

#[test]
fn test_log_semiring() {
    let samples = random_weights::<LogWeight>(11, 6);
    assert_semiring_laws(&samples);
    assert_declared_properties(&samples);
    assert_reverse_involution(&samples);
}

#[test]
fn test_product_semiring() {
    let samples = random_weights::<TropicalPair>(3, 6);
    assert_semiring_laws(&samples);
    assert_declared_properties(&samples);
    assert_reverse_involution(&samples);
}

#[test]
fn test_power_semiring() {
    let samples = random_weights::<TropicalTriple>(5, 5);
    assert_semiring_laws(&samples);
    assert_declared_properties(&samples);
    assert_reverse_involution(&samples);
}

#[test]
fn test_properties() {
    assert!(TropicalWeight::properties().contains(
        WeightProperties::SEMIRING
            | WeightProperties::COMMUTATIVE
            | WeightProperties::IDEMPOTENT
            | WeightProperties::PATH
    ));
    assert!(!LogWeight::properties().contains(WeightProperties::IDEMPOTENT));

    // A product of path semirings is not a path semiring.
    assert!(!TropicalPair::properties().contains(WeightProperties::PATH));
    assert!(TropicalPair::properties().contains(WeightProperties::IDEMPOTENT));
    assert!(
        !ProductWeight::<TropicalWeight, LogWeight>::properties()
            .contains(WeightProperties::IDEMPOTENT)
    );
}

#[test]
fn test_weight_types() {
    assert_eq!(TropicalWeight::weight_type(), "tropical");
    assert_eq!(LogWeight::weight_type(), "log");
    assert_eq!(TropicalPair::weight_type(), "tropical_X_tropical");
    assert_eq!(TropicalTriple::weight_type(), "tropical_^3");
}

#[test]
fn test_divide() {
    let a = TropicalWeight::new(2.0);
    let c = TropicalWeight::new(5.0);
    for divide_type in [DivideType::Left, DivideType::Right, DivideType::Any] {
        let b = c.divide(&a, divide_type);
        assert_eq!(a.times(&b), c);
    }

    assert!(!c.divide(&TropicalWeight::zero(), DivideType::Any).member());
    assert_eq!(
        TropicalWeight::zero().divide(&a, DivideType::Any),
        TropicalWeight::zero()
    );

    let pair = TropicalPair::new(TropicalWeight::new(4.0), TropicalWeight::new(1.0));
    let divisor = TropicalPair::new(TropicalWeight::new(1.0), TropicalWeight::new(1.0));
    assert_eq!(
        pair.divide(&divisor, DivideType::Left),
        TropicalPair::new(TropicalWeight::new(3.0), TropicalWeight::new(0.0))
    );
}

#[test]
fn test_non_members() {
    let bad = TropicalWeight::no_weight();
    let a = TropicalWeight::new(1.0);
    assert!(!bad.member());
    assert!(!TropicalWeight::new(f32::NEG_INFINITY).member());
    assert!(!bad.plus(&a).member());
    assert!(!a.times(&bad).member());
    assert!(!TropicalPair::new(a, bad).member());
    // A non-member still equals itself, so it can be stored and looked up.
    assert_eq!(bad, TropicalWeight::no_weight());
    assert_eq!(bad.hash_value(), TropicalWeight::no_weight().hash_value());
}

#[test]
fn test_quantize_and_approx_equal() {
    let a = TropicalWeight::new(1.0001);
    let b = TropicalWeight::new(1.0);
    assert_ne!(a, b);
    assert!(a.approx_equal(&b, DELTA));
    assert!(!a.approx_equal(&TropicalWeight::new(1.1), DELTA));
    assert_eq!(a.quantize(DELTA), b.quantize(DELTA));
    assert_eq!(TropicalWeight::zero().quantize(DELTA), TropicalWeight::zero());

    let pair = TropicalPair::new(a, TropicalWeight::new(2.0001));
    assert_eq!(
        pair.quantize(DELTA),
        TropicalPair::new(b, TropicalWeight::new(2.0)).quantize(DELTA)
    );
}

#[test]
fn test_hash_consistent_with_eq() {
    assert_eq!(
        TropicalWeight::new(0.0).hash_value(),
        TropicalWeight::new(-0.0).hash_value()
    );
    let a = TropicalTriple::new([
        TropicalWeight::new(1.0),
        TropicalWeight::new(2.0),
        TropicalWeight::zero(),
    ]);
    assert_eq!(a.hash_value(), a.clone().hash_value());
}

#[test]
fn test_binary_io() {
    let config = RandomWeightConfig::default().with_seed(42);
    let mut generator = TropicalPair::generator(&config);
    let weights: Vec<TropicalPair> = (0..10).map(|_| generator.generate()).collect();

    let mut buf = Vec::new();
    for w in &weights {
        w.write_binary(&mut buf).unwrap();
    }
    assert_eq!(buf.len(), weights.len() * 8);

    let mut input = buf.as_slice();
    for w in &weights {
        assert_eq!(TropicalPair::read_binary(&mut input).unwrap(), *w);
    }
    assert!(TropicalPair::read_binary(&mut input).is_err());
}

#[test]
fn test_text_io() {
    let config = WeightFormatConfig::default();
    let a = TropicalTriple::new([
        TropicalWeight::new(3.0),
        TropicalWeight::new(0.5),
        TropicalWeight::zero(),
    ]);
    let text = a.to_text(&config);
    assert_eq!(text, "3,0.5,Infinity");
    assert_eq!(TropicalTriple::read_text(&text, &config), Ok(a));
}
