use std::{fmt, io};

use crate::{
    config::{RandomWeightConfig, WeightFormatConfig},
    weight::{
        DivideType, Weight, WeightGenerator, WeightParseError, WeightProperties,
        composite::{CompositeWeightReader, CompositeWeightWriter},
    },
};

/// `N`-fold cartesian power of `W` with componentwise operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PowerWeight<W, const N: usize> {
    values: [W; N],
}

impl<W: Weight, const N: usize> PowerWeight<W, N> {
    pub fn new(values: [W; N]) -> Self {
        PowerWeight { values }
    }

    pub fn value(&self, index: usize) -> Option<&W> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[W; N] {
        &self.values
    }

    fn zip_with(&self, other: &Self, f: impl Fn(&W, &W) -> W) -> Self {
        PowerWeight::new(std::array::from_fn(|i| {
            f(&self.values[i], &other.values[i])
        }))
    }
}

impl<W: Weight, const N: usize> From<[W; N]> for PowerWeight<W, N> {
    fn from(values: [W; N]) -> Self {
        PowerWeight::new(values)
    }
}

impl<W: Weight, const N: usize> Weight for PowerWeight<W, N> {
    type ReverseWeight = PowerWeight<W::ReverseWeight, N>;

    fn weight_type() -> String {
        format!("{}_^{}", W::weight_type(), N)
    }

    fn properties() -> WeightProperties {
        W::properties()
            & (WeightProperties::SEMIRING
                | WeightProperties::COMMUTATIVE
                | WeightProperties::IDEMPOTENT)
    }

    fn zero() -> Self {
        PowerWeight::new(std::array::from_fn(|_| W::zero()))
    }

    fn one() -> Self {
        PowerWeight::new(std::array::from_fn(|_| W::one()))
    }

    fn no_weight() -> Self {
        PowerWeight::new(std::array::from_fn(|_| W::no_weight()))
    }

    fn plus(&self, other: &Self) -> Self {
        self.zip_with(other, W::plus)
    }

    fn times(&self, other: &Self) -> Self {
        self.zip_with(other, W::times)
    }

    fn divide(&self, other: &Self, divide_type: DivideType) -> Self {
        self.zip_with(other, |a, b| a.divide(b, divide_type))
    }

    fn member(&self) -> bool {
        self.values.iter().all(W::member)
    }

    fn reverse(&self) -> Self::ReverseWeight {
        PowerWeight::new(std::array::from_fn(|i| self.values[i].reverse()))
    }

    fn quantize(&self, delta: f32) -> Self {
        PowerWeight::new(std::array::from_fn(|i| self.values[i].quantize(delta)))
    }

    fn approx_equal(&self, other: &Self, delta: f32) -> bool {
        self.values
            .iter()
            .zip(other.values.iter())
            .all(|(a, b)| a.approx_equal(b, delta))
    }

    fn write_text<O: fmt::Write + ?Sized>(
        &self,
        out: &mut O,
        config: &WeightFormatConfig,
    ) -> fmt::Result {
        let mut writer = CompositeWeightWriter::new(out, config);
        writer.write_begin()?;
        for value in &self.values {
            writer.write_element(value)?;
        }
        writer.write_end()
    }

    fn read_text(text: &str, config: &WeightFormatConfig) -> Result<Self, WeightParseError> {
        // A composite needs at least one element.
        if N == 0 {
            return Err(WeightParseError::EmptyElement);
        }

        let mut reader = CompositeWeightReader::for_str(text, config);
        let mut values: [W; N] = std::array::from_fn(|_| W::zero());

        reader.read_begin()?;
        for (i, value) in values.iter_mut().enumerate() {
            reader.read_element(value, i + 1 == N)?;
        }
        reader.read_end()?;

        Ok(PowerWeight::new(values))
    }

    fn write_binary<O: io::Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        for value in &self.values {
            value.write_binary(out)?;
        }
        Ok(())
    }

    fn read_binary<I: io::Read + ?Sized>(input: &mut I) -> io::Result<Self> {
        let mut values: [W; N] = std::array::from_fn(|_| W::zero());
        for value in values.iter_mut() {
            *value = W::read_binary(input)?;
        }
        Ok(PowerWeight::new(values))
    }

    fn generator(config: &RandomWeightConfig) -> Box<dyn WeightGenerator<Self>> {
        let generators = std::array::from_fn(|i| {
            let seed = config.get_seed().wrapping_add(i as u64);
            W::generator(&config.clone().with_seed(seed))
        });
        Box::new(PowerGenerator { generators })
    }
}

struct PowerGenerator<W, const N: usize> {
    generators: [Box<dyn WeightGenerator<W>>; N],
}

impl<W: Weight, const N: usize> WeightGenerator<PowerWeight<W, N>> for PowerGenerator<W, N> {
    fn generate(&mut self) -> PowerWeight<W, N> {
        PowerWeight::new(std::array::from_fn(|i| self.generators[i].generate()))
    }
}
