use std::{
    any::{Any, TypeId},
    fmt::Debug,
    marker::PhantomData,
    sync::LazyLock,
};

use hashbrown::HashMap;

use crate::weight::{LogWeight, TropicalWeight, Weight};

/// `weight` multiplied with itself `n` times. `power(w, 0)` is `one()`.
pub fn power<W: Weight>(weight: &W, n: usize) -> W {
    let mut result = W::one();
    for _ in 0..n {
        result = result.times(weight);
    }
    result
}

type Converter = Box<dyn Fn(&dyn Any) -> Option<Box<dyn Any>> + Send + Sync>;

/// Conversion functions between weight types, looked up by the pair of
/// source and target type.
pub struct WeightConvertRegistry {
    converters: HashMap<(TypeId, TypeId), Converter>,
}

impl Debug for WeightConvertRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightConvertRegistry")
            .field("converters", &self.converters.len())
            .finish()
    }
}

impl Default for WeightConvertRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl WeightConvertRegistry {
    /// A registry with no conversions besides the identity.
    pub fn empty() -> Self {
        WeightConvertRegistry {
            converters: HashMap::new(),
        }
    }

    /// Tropical and log weights share their float representation, so they
    /// convert into each other by value.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(|w: &TropicalWeight| LogWeight::new(w.value()));
        registry.register(|w: &LogWeight| TropicalWeight::new(w.value()));
        registry
    }

    pub fn register<W1: Weight, W2: Weight>(
        &mut self,
        convert: impl Fn(&W1) -> W2 + Send + Sync + 'static,
    ) {
        self.converters.insert(
            (TypeId::of::<W1>(), TypeId::of::<W2>()),
            Box::new(move |w: &dyn Any| {
                w.downcast_ref::<W1>()
                    .map(|w| Box::new(convert(w)) as Box<dyn Any>)
            }),
        );
    }

    pub fn supports<W1: Weight, W2: Weight>(&self) -> bool {
        TypeId::of::<W1>() == TypeId::of::<W2>()
            || self
                .converters
                .contains_key(&(TypeId::of::<W1>(), TypeId::of::<W2>()))
    }

    /// Converts `weight` into `W2`. Converting into the same type is a clone.
    /// Unsupported pairs report an error and return `W2::no_weight()`.
    pub fn convert<W1: Weight, W2: Weight>(&self, weight: &W1) -> W2 {
        if let Some(same) = (weight as &dyn Any).downcast_ref::<W2>() {
            return same.clone();
        }

        let converted = self
            .converters
            .get(&(TypeId::of::<W1>(), TypeId::of::<W2>()))
            .and_then(|convert| convert(weight as &dyn Any))
            .and_then(|boxed| boxed.downcast::<W2>().ok());

        match converted {
            Some(w) => *w,
            None => {
                tracing::error!(
                    "WeightConvert: can't convert weight from {} to {}",
                    W1::weight_type(),
                    W2::weight_type()
                );
                W2::no_weight()
            }
        }
    }
}

static DEFAULT_REGISTRY: LazyLock<WeightConvertRegistry> =
    LazyLock::new(WeightConvertRegistry::with_defaults);

/// Converts using the built-in conversions.
pub fn weight_convert<W1: Weight, W2: Weight>(weight: &W1) -> W2 {
    DEFAULT_REGISTRY.convert(weight)
}

/// Source of random weights, used to build random test inputs.
pub trait WeightGenerator<W> {
    fn generate(&mut self) -> W;
}

/// Generator for weight types that have no random generator. Every draw
/// reports an error and returns `no_weight()`.
#[derive(Debug, Clone)]
pub struct UnsupportedGenerator<W> {
    _weight: PhantomData<fn() -> W>,
}

impl<W> UnsupportedGenerator<W> {
    pub fn new() -> Self {
        UnsupportedGenerator {
            _weight: PhantomData,
        }
    }
}

impl<W> Default for UnsupportedGenerator<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Weight> WeightGenerator<W> for UnsupportedGenerator<W> {
    fn generate(&mut self) -> W {
        tracing::error!(
            "WeightGenerate: no random generator for weight type {}",
            W::weight_type()
        );
        W::no_weight()
    }
}
