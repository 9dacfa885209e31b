//! Weight-proportional budget splits that conserve the total exactly.

/// Split `total` across entries proportional to `weights`, returning one
/// share per weight. Zero or degenerate weight sums fall back to an equal
/// split. Shares are computed in integer cents with largest-remainder
/// distribution, so they always sum to `total` to the cent.
pub fn split_proportionally(total: f64, weights: &[f64]) -> Vec<f64> {
    if weights.is_empty() {
        return Vec::new();
    }

    let total_cents = (total * 100.0).round().max(0.0) as u64;

    let clamped: Vec<f64> = weights.iter().map(|w| w.max(0.0)).collect();
    let weight_sum: f64 = clamped.iter().sum();
    let shares: Vec<f64> = if weight_sum > 0.0 {
        clamped.iter().map(|w| w / weight_sum).collect()
    } else {
        vec![1.0 / weights.len() as f64; weights.len()]
    };

    let raw: Vec<f64> = shares.iter().map(|s| s * total_cents as f64).collect();
    let mut cents: Vec<u64> = raw.iter().map(|r| r.floor() as u64).collect();
    let assigned: u64 = cents.iter().sum();
    let mut remainder = total_cents - assigned;

    // Hand leftover cents to the largest fractional parts, lowest index
    // first on ties, so the split is deterministic.
    let mut order: Vec<usize> = (0..raw.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = raw[a] - raw[a].floor();
        let fb = raw[b] - raw[b].floor();
        fb.partial_cmp(&fa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    for &i in &order {
        if remainder == 0 {
            break;
        }
        cents[i] += 1;
        remainder -= 1;
    }

    cents.into_iter().map(|c| c as f64 / 100.0).collect()
}
