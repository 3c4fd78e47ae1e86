use std::{cmp::Ordering, marker::PhantomData};

use crate::weight::{Weight, WeightProperties};

/// The natural order of an idempotent semiring: `a < b` iff `a ⊕ b == a`
/// and `a != b`.
///
/// The order is a strict partial order for idempotent types and total when
/// the type also has the path property. Constructing it for a
/// non-idempotent type reports an error but the comparator stays usable.
#[derive(Debug, Clone, Copy)]
pub struct NaturalLess<W> {
    _weight: PhantomData<fn(&W)>,
}

impl<W: Weight> NaturalLess<W> {
    pub fn new() -> Self {
        if !W::properties().contains(WeightProperties::IDEMPOTENT) {
            tracing::error!(
                "NaturalLess: Weight type is not idempotent: {}",
                W::weight_type()
            );
        }

        NaturalLess {
            _weight: PhantomData,
        }
    }

    pub fn less(&self, w1: &W, w2: &W) -> bool {
        w1.plus(w2) == *w1 && w1 != w2
    }

    /// Whether every pair of weights is comparable.
    pub fn is_total(&self) -> bool {
        W::properties().contains(WeightProperties::IDEMPOTENT | WeightProperties::PATH)
    }

    /// `None` when neither weight is less than the other and they differ.
    pub fn compare(&self, w1: &W, w2: &W) -> Option<Ordering> {
        if w1 == w2 {
            Some(Ordering::Equal)
        } else if self.less(w1, w2) {
            Some(Ordering::Less)
        } else if self.less(w2, w1) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl<W: Weight> Default for NaturalLess<W> {
    fn default() -> Self {
        Self::new()
    }
}
