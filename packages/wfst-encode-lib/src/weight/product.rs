use std::{fmt, io};

use crate::{
    config::{RandomWeightConfig, WeightFormatConfig},
    weight::{
        DivideType, Weight, WeightGenerator, WeightParseError, WeightProperties,
        composite::{CompositeWeightReader, CompositeWeightWriter},
    },
};

/// Pair of weights with componentwise operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductWeight<W1, W2> {
    value1: W1,
    value2: W2,
}

impl<W1: Weight, W2: Weight> ProductWeight<W1, W2> {
    pub fn new(value1: W1, value2: W2) -> Self {
        ProductWeight { value1, value2 }
    }

    pub fn value1(&self) -> &W1 {
        &self.value1
    }

    pub fn value2(&self) -> &W2 {
        &self.value2
    }
}

impl<W1: Weight, W2: Weight> Weight for ProductWeight<W1, W2> {
    type ReverseWeight = ProductWeight<W1::ReverseWeight, W2::ReverseWeight>;

    fn weight_type() -> String {
        format!("{}_X_{}", W1::weight_type(), W2::weight_type())
    }

    fn properties() -> WeightProperties {
        W1::properties()
            & W2::properties()
            & (WeightProperties::SEMIRING
                | WeightProperties::COMMUTATIVE
                | WeightProperties::IDEMPOTENT)
    }

    fn zero() -> Self {
        ProductWeight::new(W1::zero(), W2::zero())
    }

    fn one() -> Self {
        ProductWeight::new(W1::one(), W2::one())
    }

    fn no_weight() -> Self {
        ProductWeight::new(W1::no_weight(), W2::no_weight())
    }

    fn plus(&self, other: &Self) -> Self {
        ProductWeight::new(
            self.value1.plus(&other.value1),
            self.value2.plus(&other.value2),
        )
    }

    fn times(&self, other: &Self) -> Self {
        ProductWeight::new(
            self.value1.times(&other.value1),
            self.value2.times(&other.value2),
        )
    }

    fn divide(&self, other: &Self, divide_type: DivideType) -> Self {
        ProductWeight::new(
            self.value1.divide(&other.value1, divide_type),
            self.value2.divide(&other.value2, divide_type),
        )
    }

    fn member(&self) -> bool {
        self.value1.member() && self.value2.member()
    }

    fn reverse(&self) -> Self::ReverseWeight {
        ProductWeight::new(self.value1.reverse(), self.value2.reverse())
    }

    fn quantize(&self, delta: f32) -> Self {
        ProductWeight::new(self.value1.quantize(delta), self.value2.quantize(delta))
    }

    fn approx_equal(&self, other: &Self, delta: f32) -> bool {
        self.value1.approx_equal(&other.value1, delta)
            && self.value2.approx_equal(&other.value2, delta)
    }

    fn write_text<O: fmt::Write + ?Sized>(
        &self,
        out: &mut O,
        config: &WeightFormatConfig,
    ) -> fmt::Result {
        let mut writer = CompositeWeightWriter::new(out, config);
        writer.write_begin()?;
        writer.write_element(&self.value1)?;
        writer.write_element(&self.value2)?;
        writer.write_end()
    }

    fn read_text(text: &str, config: &WeightFormatConfig) -> Result<Self, WeightParseError> {
        let mut reader = CompositeWeightReader::for_str(text, config);
        let mut value1 = W1::zero();
        let mut value2 = W2::zero();

        reader.read_begin()?;
        reader.read_element(&mut value1, false)?;
        reader.read_element(&mut value2, true)?;
        reader.read_end()?;

        Ok(ProductWeight::new(value1, value2))
    }

    fn write_binary<O: io::Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        self.value1.write_binary(out)?;
        self.value2.write_binary(out)
    }

    fn read_binary<I: io::Read + ?Sized>(input: &mut I) -> io::Result<Self> {
        let value1 = W1::read_binary(input)?;
        let value2 = W2::read_binary(input)?;
        Ok(ProductWeight::new(value1, value2))
    }

    fn generator(config: &RandomWeightConfig) -> Box<dyn WeightGenerator<Self>> {
        let second = config
            .clone()
            .with_seed(config.get_seed().wrapping_add(1));
        Box::new(ProductGenerator {
            generator1: W1::generator(config),
            generator2: W2::generator(&second),
        })
    }
}

struct ProductGenerator<W1, W2> {
    generator1: Box<dyn WeightGenerator<W1>>,
    generator2: Box<dyn WeightGenerator<W2>>,
}

impl<W1: Weight, W2: Weight> WeightGenerator<ProductWeight<W1, W2>> for ProductGenerator<W1, W2> {
    fn generate(&mut self) -> ProductWeight<W1, W2> {
        ProductWeight::new(self.generator1.generate(), self.generator2.generate())
    }
}
