//! Random quiz-question selection.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Category, Question};

/// Resolve the requested quiz category. `None` means "any category" and picks
/// one uniformly from `categories`; an empty list resolves to nothing.
pub fn resolve_category<R: Rng + ?Sized>(
    requested: Option<i64>,
    categories: &[Category],
    rng: &mut R,
) -> Option<i64> {
    match requested {
        Some(id) => Some(id),
        None => categories.choose(rng).map(|category| category.id),
    }
}

/// Pick one question of `category` whose id is not in `previous`, uniformly at random.
pub fn select_question<'a, R: Rng + ?Sized>(
    candidates: &'a [Question],
    category: i64,
    previous: &[i64],
    rng: &mut R,
) -> Option<&'a Question> {
    let eligible: Vec<&Question> = candidates
        .iter()
        .filter(|q| q.category == category && !previous.contains(&q.id))
        .collect();
    eligible.choose(rng).copied()
}
