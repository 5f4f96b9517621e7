//! Relics domain: weighted relic drafting for rewards, shops, and run start.

use rand::Rng;

use crate::content::{ContentRegistry, RelicDef, RelicRarity};

/// Sample `count` relics without replacement, weighting each candidate by its
/// rarity. When `reward_tier` is given, candidates of the tier's preferred
/// rarity are drawn first; the full remaining pool is only used once the
/// preferred pool runs dry.
///
/// Cursed relics and anything in `exclude` never enter the pool.
pub fn draft_relics(
    registry: &ContentRegistry,
    rng: &mut impl Rng,
    count: usize,
    exclude: &[String],
    reward_tier: Option<u32>,
) -> Vec<String> {
    let mut pool: Vec<&RelicDef> = registry
        .relics
        .values()
        .filter(|r| !r.cursed && !exclude.iter().any(|id| id == &r.id))
        .collect();

    let preferred = reward_tier.map(RelicRarity::preferred_for_tier);
    let mut picked = Vec::with_capacity(count);

    while picked.len() < count && !pool.is_empty() {
        let candidate_indices: Vec<usize> = match preferred {
            Some(rarity) => {
                let of_rarity: Vec<usize> = (0..pool.len())
                    .filter(|&i| pool[i].rarity == rarity)
                    .collect();
                if of_rarity.is_empty() {
                    (0..pool.len()).collect()
                } else {
                    of_rarity
                }
            }
            None => (0..pool.len()).collect(),
        };

        let Some(winner) = pick_weighted(&pool, &candidate_indices, rng) else {
            break;
        };
        picked.push(pool[winner].id.clone());
        pool.swap_remove(winner);
    }

    picked
}

/// Starting relics: rarity-weighted among non-cursed commons and rares only.
pub fn draft_starting_relics(
    registry: &ContentRegistry,
    rng: &mut impl Rng,
    count: usize,
) -> Vec<String> {
    let mut pool: Vec<&RelicDef> = registry
        .relics
        .values()
        .filter(|r| {
            !r.cursed && matches!(r.rarity, RelicRarity::Common | RelicRarity::Rare)
        })
        .collect();

    let mut picked = Vec::with_capacity(count);
    while picked.len() < count && !pool.is_empty() {
        let all: Vec<usize> = (0..pool.len()).collect();
        let Some(winner) = pick_weighted(&pool, &all, rng) else {
            break;
        };
        picked.push(pool[winner].id.clone());
        pool.swap_remove(winner);
    }
    picked
}

/// Uniform pick among cursed relics not already held.
pub fn draft_curse(
    registry: &ContentRegistry,
    rng: &mut impl Rng,
    exclude: &[String],
) -> Option<String> {
    let pool: Vec<&RelicDef> = registry
        .relics
        .values()
        .filter(|r| r.cursed && !exclude.iter().any(|id| id == &r.id))
        .collect();
    if pool.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..pool.len());
    Some(pool[idx].id.clone())
}

/// Linear weighted roll over the candidate indices. Falls back to a uniform
/// pick when every candidate carries zero weight.
fn pick_weighted(pool: &[&RelicDef], candidates: &[usize], rng: &mut impl Rng) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }

    let total: f32 = candidates
        .iter()
        .map(|&i| pool[i].rarity.draft_weight())
        .sum();
    if total <= 0.0 {
        return Some(candidates[rng.random_range(0..candidates.len())]);
    }

    let mut roll: f32 = rng.random_range(0.0..total);
    for &i in candidates {
        roll -= pool[i].rarity.draft_weight();
        if roll <= 0.0 {
            return Some(i);
        }
    }
    candidates.last().copied()
}
