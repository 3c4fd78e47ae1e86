use std::{fmt::Debug, hash::Hash, marker::PhantomData};

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::weight::Weight;

pub mod random;
pub mod text;
pub mod vector;

pub use vector::VectorFst;

/// Arc label. `0` is reserved for epsilon.
pub type Label = u32;

pub const EPSILON: Label = 0;

pub type StateId = NodeIndex;
pub type TrId = EdgeIndex;

/// A weighted transition. Source and destination states are kept by the
/// transducer, not by the transition itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tr<W> {
    pub ilabel: Label,
    pub olabel: Label,
    pub weight: W,
}

impl<W: Weight> Tr<W> {
    pub fn new(ilabel: Label, olabel: Label, weight: W) -> Self {
        Tr {
            ilabel,
            olabel,
            weight,
        }
    }

    /// A transition with weight `one()`.
    pub fn unweighted(ilabel: Label, olabel: Label) -> Self {
        Tr::new(ilabel, olabel, W::one())
    }
}

/// This trait represents state or transition indices in a transducer.
/// The index space must be compact, so it must be possible to construct an
/// index from a [usize] and to turn an index back into a [usize].
pub trait GIndex: Debug + Copy + Clone + PartialEq + Eq + Hash + Ord {
    /// Create a new index from a [usize].
    fn new(index: usize) -> Self;
    /// Turn this index into a [usize] to e.g. index into a [Vec].
    fn index(self) -> usize;
}

impl GIndex for NodeIndex {
    fn new(index: usize) -> Self {
        NodeIndex::new(index)
    }

    fn index(self) -> usize {
        NodeIndex::index(self)
    }
}

impl GIndex for EdgeIndex {
    fn new(index: usize) -> Self {
        EdgeIndex::new(index)
    }

    fn index(self) -> usize {
        EdgeIndex::index(self)
    }
}

/// An iterator over a compact index space.
pub struct GIndexIterator<G: GIndex> {
    current: usize,
    end: usize,
    __marker: PhantomData<G>,
}

impl<G: GIndex> GIndexIterator<G> {
    /// Create a new iterator over a compact index interval.
    pub fn new(start: usize, end: usize) -> Self {
        GIndexIterator {
            current: start,
            end,
            __marker: PhantomData,
        }
    }
}

impl<G: GIndex> Iterator for GIndexIterator<G> {
    type Item = G;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current < self.end {
            let index = G::new(self.current);
            self.current += 1;
            Some(index)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.current;
        (len, Some(len))
    }
}

impl<G: GIndex> ExactSizeIterator for GIndexIterator<G> {
    fn len(&self) -> usize {
        self.end - self.current
    }
}

impl<G: GIndex> DoubleEndedIterator for GIndexIterator<G> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.current < self.end {
            self.end -= 1;
            Some(G::new(self.end))
        } else {
            None
        }
    }
}

/// Read access to a weighted transducer.
///
/// States and transitions are identified by compact indices from `0` to
/// `num_states() - 1` and `num_trs() - 1` respectively.
pub trait Fst {
    type W: Weight;

    fn num_states(&self) -> usize;

    fn num_trs(&self) -> usize;

    fn start(&self) -> Option<StateId>;

    /// The final weight of `state`, `zero()` for non-final states. `None` if
    /// the state does not exist.
    fn final_weight(&self, state: StateId) -> Option<&Self::W>;

    fn get_tr(&self, tr: TrId) -> Option<&Tr<Self::W>>;

    /// Source and destination of `tr`.
    fn tr_endpoints(&self, tr: TrId) -> Option<(StateId, StateId)>;

    /// Transitions leaving `state`, in insertion order.
    fn outgoing_trs(&self, state: StateId) -> impl Iterator<Item = TrId>;

    fn is_final(&self, state: StateId) -> bool {
        self.final_weight(state)
            .is_some_and(|w| *w != Self::W::zero())
    }

    fn iter_states(&self) -> GIndexIterator<StateId> {
        GIndexIterator::new(0, self.num_states())
    }

    fn iter_tr_ids(&self) -> GIndexIterator<TrId> {
        GIndexIterator::new(0, self.num_trs())
    }

    /// Returns a combined iterator over all transitions, yielding
    /// (tr_id, tr_reference) pairs.
    fn iter_trs<'a>(&'a self) -> impl Iterator<Item = (TrId, &'a Tr<Self::W>)>
    where
        Self::W: 'a,
    {
        self.iter_tr_ids()
            .filter_map(move |id| self.get_tr(id).map(|tr| (id, tr)))
    }
}

/// Write access to a weighted transducer.
pub trait MutableFst: Fst {
    fn add_state(&mut self) -> StateId;

    fn set_start(&mut self, state: StateId);

    fn set_final(&mut self, state: StateId, weight: Self::W);

    fn add_tr(&mut self, from: StateId, to: StateId, tr: Tr<Self::W>) -> TrId;

    fn get_tr_mut(&mut self, tr: TrId) -> Option<&mut Tr<Self::W>>;

    /// Replaces the transition `id`. Returns `false` if it does not exist.
    fn set_tr(&mut self, id: TrId, tr: Tr<Self::W>) -> bool {
        match self.get_tr_mut(id) {
            Some(slot) => {
                *slot = tr;
                true
            }
            None => false,
        }
    }
}
