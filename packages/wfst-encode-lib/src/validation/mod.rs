pub mod same_fst;
