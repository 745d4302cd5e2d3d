use rand::Rng;

/// Weighted random selection over `(item, weight)` pairs.
///
/// Draws uniformly in `[0, total)` and returns the first item whose cumulative
/// weight exceeds the draw, so zero-weight items are never chosen while any
/// positive weight exists. Negative and non-finite weights count as zero. When
/// no candidate carries weight the choice falls back to uniform.
pub fn weighted_pick<'a, T, R>(candidates: &'a [(T, f64)], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    if candidates.is_empty() {
        return None;
    }

    let weight_of = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
    let total: f64 = candidates.iter().map(|(_, w)| weight_of(*w)).sum();

    if total <= 0.0 {
        let index = rng.gen_range(0..candidates.len());
        return Some(&candidates[index].0);
    }

    let draw = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (item, weight) in candidates {
        cumulative += weight_of(*weight);
        if cumulative > draw {
            return Some(item);
        }
    }

    // Rounding can leave the draw a hair above the final sum
    candidates
        .iter()
        .rev()
        .find(|(_, w)| weight_of(*w) > 0.0)
        .map(|(item, _)| item)
}
