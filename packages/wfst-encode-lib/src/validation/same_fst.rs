use hashbrown::HashMap;

use crate::fst::{Fst, StateId, Tr};

fn outgoing<'a, F: Fst>(fst: &'a F, state: StateId) -> HashMap<(StateId, &'a Tr<F::W>), usize> {
    let mut trs = HashMap::new();
    for id in fst.outgoing_trs(state) {
        if let (Some(tr), Some((_, dst))) = (fst.get_tr(id), fst.tr_endpoints(id)) {
            *trs.entry((dst, tr)).or_insert(0) += 1;
        }
    }
    trs
}

/// Describes the first structural difference between two transducers, or
/// returns `None` if they have the same states, start state, final weights
/// and transitions. Transitions are compared per state as a multiset, so
/// their order does not matter.
pub fn fst_difference<F1, F2>(a: &F1, b: &F2) -> Option<String>
where
    F1: Fst,
    F2: Fst<W = F1::W>,
{
    if a.num_states() != b.num_states() {
        return Some(format!(
            "`a` has {} states but `b` has {}",
            a.num_states(),
            b.num_states()
        ));
    }
    if a.start() != b.start() {
        return Some(format!(
            "`a` starts in {:?} but `b` starts in {:?}",
            a.start(),
            b.start()
        ));
    }

    for state in a.iter_states() {
        let (wa, wb) = (a.final_weight(state), b.final_weight(state));
        if wa != wb {
            return Some(format!(
                "state {} has final weight {:?} in `a` but {:?} in `b`",
                state.index(),
                wa,
                wb
            ));
        }

        if outgoing(a, state) != outgoing(b, state) {
            return Some(format!(
                "state {} has different outgoing transitions in `a` and `b`",
                state.index()
            ));
        }
    }

    None
}

/// Checks if two transducers are structurally identical.
pub fn same_fst<F1, F2>(a: &F1, b: &F2) -> bool
where
    F1: Fst,
    F2: Fst<W = F1::W>,
{
    fst_difference(a, b).is_none()
}

pub fn assert_same_fst<F1, F2>(a: &F1, b: &F2)
where
    F1: Fst,
    F2: Fst<W = F1::W>,
{
    if let Some(difference) = fst_difference(a, b) {
        panic!("Transducers are not the same: {difference}");
    }
}
