use wfst_encode_lib::{
    config::{RandomWeightConfig, WeightFormatConfig},
    weight::{
        PowerWeight, ProductWeight, TropicalWeight, Weight, WeightParseError,
        composite::{CompositeWeightReader, CompositeWeightWriter},
    },
};

type Triple = PowerWeight<TropicalWeight, 3>;
type Nested = ProductWeight<TropicalWeight, ProductWeight<TropicalWeight, TropicalWeight>>;

fn t(v: f32) -> TropicalWeight {
    TropicalWeight::new(v)
}

#[test]
fn test_write_plain() {
    let config = WeightFormatConfig::default();
    let mut out = String::new();
    let mut writer = CompositeWeightWriter::new(&mut out, &config);
    writer.write_begin().unwrap();
    for v in [3.0, 7.0, 2.0] {
        writer.write_element(&t(v)).unwrap();
    }
    writer.write_end().unwrap();

    assert_eq!(out, "3,7,2");
}

#[test]
fn test_write_parenthesized() {
    let config = WeightFormatConfig::default().parenthesized();
    let w = Triple::new([t(3.0), t(7.0), t(2.0)]);
    assert_eq!(w.to_text(&config), "(3,7,2)");
}

#[test]
fn test_read_plain() {
    let config = WeightFormatConfig::default();
    let mut reader = CompositeWeightReader::for_str("3,7,2", &config);
    let mut w = TropicalWeight::zero();

    reader.read_begin().unwrap();
    assert!(reader.read_element(&mut w, false).unwrap());
    assert_eq!(w, t(3.0));
    assert!(reader.read_element(&mut w, false).unwrap());
    assert_eq!(w, t(7.0));
    assert!(!reader.read_element(&mut w, true).unwrap());
    assert_eq!(w, t(2.0));
    reader.read_end().unwrap();
}

#[test]
fn test_read_leading_whitespace() {
    let config = WeightFormatConfig::default().parenthesized();
    assert_eq!(
        Triple::read_text("  (3,7,2)", &config),
        Ok(Triple::new([t(3.0), t(7.0), t(2.0)]))
    );
}

#[test]
fn test_nested_round_trip() {
    let config = WeightFormatConfig::default().parenthesized();
    let w = Nested::new(t(1.0), ProductWeight::new(t(2.0), t(3.0)));

    let text = w.to_text(&config);
    assert_eq!(text, "(1,(2,3))");
    assert_eq!(Nested::read_text(&text, &config), Ok(w));
}

#[test]
fn test_nested_round_trip_custom_format() {
    let config = WeightFormatConfig::default()
        .with_parentheses(true)
        .with_separator(';')
        .with_open_paren('<')
        .with_close_paren('>');
    config.validate().unwrap();

    let mut generator = ProductWeight::<Nested, Triple>::generator(
        &RandomWeightConfig::default().with_seed(21),
    );
    for _ in 0..20 {
        let w = generator.generate();
        let text = w.to_text(&config);
        assert!(text.starts_with("<<"), "{text}");
        assert_eq!(
            ProductWeight::<Nested, Triple>::read_text(&text, &config),
            Ok(w)
        );
    }
}

#[test]
fn test_empty_element() {
    let config = WeightFormatConfig::default();
    let mut reader = CompositeWeightReader::for_str("1,,2", &config);
    let mut w = TropicalWeight::zero();

    reader.read_begin().unwrap();
    assert!(reader.read_element(&mut w, false).unwrap());
    assert_eq!(
        reader.read_element(&mut w, false),
        Err(WeightParseError::EmptyElement)
    );
    assert!(reader.is_bad());
    assert_eq!(
        reader.read_element(&mut w, true),
        Err(WeightParseError::BadStream)
    );
    assert_eq!(reader.read_end(), Err(WeightParseError::BadStream));

    assert_eq!(
        Triple::read_text("1,,2", &config),
        Err(WeightParseError::EmptyElement)
    );
}

#[test]
fn test_unmatched_close_paren() {
    let config = WeightFormatConfig::default().parenthesized();

    // Read through the composite entry point, the open paren is missing.
    assert_eq!(
        ProductWeight::<TropicalWeight, TropicalWeight>::read_text("1)", &config),
        Err(WeightParseError::MissingOpenParen)
    );

    // Read element by element, the close paren has nothing to close.
    let mut reader = CompositeWeightReader::for_str("1)", &config);
    let mut w = TropicalWeight::zero();
    assert_eq!(
        reader.read_element(&mut w, false),
        Err(WeightParseError::UnmatchedCloseParen)
    );
    assert!(reader.is_bad());
}

#[test]
fn test_missing_close_paren() {
    let config = WeightFormatConfig::default().parenthesized();
    assert_eq!(
        ProductWeight::<TropicalWeight, TropicalWeight>::read_text("(1,2", &config),
        Err(WeightParseError::MissingCloseParen)
    );
}

#[test]
fn test_excess_character() {
    let config = WeightFormatConfig::default().parenthesized();
    assert_eq!(
        ProductWeight::<TropicalWeight, TropicalWeight>::read_text("(1,2)x", &config),
        Err(WeightParseError::ExcessCharacter('x'))
    );
}

#[test]
fn test_too_few_elements() {
    let config = WeightFormatConfig::default();
    assert_eq!(
        Triple::read_text("1,2", &config),
        Err(WeightParseError::EmptyElement)
    );
}

#[test]
fn test_bad_element() {
    let config = WeightFormatConfig::default();
    assert_eq!(
        Triple::read_text("1,x,2", &config),
        Err(WeightParseError::InvalidNumber("x".to_string()))
    );
}

#[test]
fn test_last_element_takes_separators() {
    // Without parentheses the last element runs to the end of input, so an
    // extra element ends up in the float parser.
    let config = WeightFormatConfig::default();
    assert_eq!(
        ProductWeight::<TropicalWeight, TropicalWeight>::read_text("1,2,3", &config),
        Err(WeightParseError::InvalidNumber("2,3".to_string()))
    );
}

#[test]
fn test_empty_power_rejected() {
    type Empty = PowerWeight<TropicalWeight, 0>;
    let plain = WeightFormatConfig::default();
    let parens = plain.parenthesized();

    assert_eq!(Empty::one().to_text(&parens), "()");
    assert_eq!(
        Empty::read_text("()", &parens),
        Err(WeightParseError::EmptyElement)
    );
    assert_eq!(
        Empty::read_text("", &plain),
        Err(WeightParseError::EmptyElement)
    );
}
