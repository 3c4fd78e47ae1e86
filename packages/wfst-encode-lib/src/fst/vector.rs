use itertools::Itertools;
use petgraph::{Direction, graph::DiGraph, visit::EdgeRef};

use crate::{
    fst::{Fst, MutableFst, StateId, Tr, TrId},
    weight::Weight,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FstState<W> {
    pub final_weight: W,
}

/// Transducer stored as a petgraph graph, states are nodes and transitions
/// are edges.
#[derive(Debug, Clone)]
pub struct VectorFst<W: Weight> {
    start: Option<StateId>,
    pub graph: DiGraph<FstState<W>, Tr<W>>,
}

impl<W: Weight> VectorFst<W> {
    pub fn new() -> Self {
        VectorFst {
            start: None,
            graph: DiGraph::new(),
        }
    }

    pub fn with_capacity(states: usize, trs: usize) -> Self {
        VectorFst {
            start: None,
            graph: DiGraph::with_capacity(states, trs),
        }
    }
}

impl<W: Weight> Default for VectorFst<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Weight> Fst for VectorFst<W> {
    type W = W;

    fn num_states(&self) -> usize {
        self.graph.node_count()
    }

    fn num_trs(&self) -> usize {
        self.graph.edge_count()
    }

    fn start(&self) -> Option<StateId> {
        self.start
    }

    fn final_weight(&self, state: StateId) -> Option<&W> {
        self.graph.node_weight(state).map(|s| &s.final_weight)
    }

    fn get_tr(&self, tr: TrId) -> Option<&Tr<W>> {
        self.graph.edge_weight(tr)
    }

    fn tr_endpoints(&self, tr: TrId) -> Option<(StateId, StateId)> {
        self.graph.edge_endpoints(tr)
    }

    fn outgoing_trs(&self, state: StateId) -> impl Iterator<Item = TrId> {
        // petgraph walks adjacency lists newest first.
        self.graph
            .edges_directed(state, Direction::Outgoing)
            .map(|e| e.id())
            .sorted()
    }
}

impl<W: Weight> MutableFst for VectorFst<W> {
    fn add_state(&mut self) -> StateId {
        self.graph.add_node(FstState {
            final_weight: W::zero(),
        })
    }

    fn set_start(&mut self, state: StateId) {
        self.start = Some(state);
    }

    fn set_final(&mut self, state: StateId, weight: W) {
        if let Some(s) = self.graph.node_weight_mut(state) {
            s.final_weight = weight;
        }
    }

    fn add_tr(&mut self, from: StateId, to: StateId, tr: Tr<W>) -> TrId {
        self.graph.add_edge(from, to, tr)
    }

    fn get_tr_mut(&mut self, tr: TrId) -> Option<&mut Tr<W>> {
        self.graph.edge_weight_mut(tr)
    }
}
