//! Label assignment for unbiased peer review
//!
//! Reviewers see "Response 1".."Response N" in an order decorrelated from
//! both council-list order and model-name order, so neither position nor
//! identity can leak into the rankings.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::types::LabelAssignment;

/// Assign sequential labels to a seeded random permutation of `models`.
///
/// `models` must be the models with a successful stage-1 response; the
/// result is a bijection over exactly that set. Pure in (models, seed):
/// the caller draws a fresh seed per production run and pins it in tests.
#[must_use]
pub fn assign_labels(models: &[String], seed: u64) -> LabelAssignment {
    let mut order: Vec<usize> = (0..models.len()).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));

    let pairs = order
        .into_iter()
        .enumerate()
        .map(|(position, model_index)| {
            (
                format!("Response {}", position + 1),
                models[model_index].clone(),
            )
        })
        .collect();

    LabelAssignment::from_pairs(pairs)
}
