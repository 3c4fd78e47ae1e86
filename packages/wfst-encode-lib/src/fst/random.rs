use rand::{RngExt, SeedableRng, rngs::StdRng};

use crate::{
    config::RandomFstConfig,
    fst::{MutableFst, StateId, Tr, VectorFst},
    weight::{Weight, WeightGenerator},
};

/// Builds a random transducer. State `0` is the start state, labels are drawn
/// from `0..=label_count` so epsilon labels occur, and every state is final
/// with probability one half.
pub fn random_fst<W: Weight>(
    config: &RandomFstConfig,
    weights: &mut dyn WeightGenerator<W>,
) -> VectorFst<W> {
    let mut random = StdRng::seed_from_u64(*config.get_seed());
    let state_count = *config.get_state_count();
    let label_count = *config.get_label_count();

    let mut fst = VectorFst::with_capacity(state_count, *config.get_tr_count());
    if state_count == 0 {
        return fst;
    }

    let states: Vec<StateId> = (0..state_count).map(|_| fst.add_state()).collect();
    fst.set_start(states[0]);

    for _ in 0..*config.get_tr_count() {
        let from = states[random.random_range(0..state_count)];
        let to = states[random.random_range(0..state_count)];
        let ilabel = random.random_range(0..=label_count);
        let olabel = random.random_range(0..=label_count);
        fst.add_tr(from, to, Tr::new(ilabel, olabel, weights.generate()));
    }

    for state in &states {
        if random.random_range(0..2) == 0 {
            fst.set_final(*state, weights.generate());
        }
    }

    tracing::debug!(
        "generated random fst with {} states and {} trs",
        state_count,
        config.get_tr_count()
    );

    fst
}
