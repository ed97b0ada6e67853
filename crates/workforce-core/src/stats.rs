//! Small descriptive-statistics helpers shared by the reports.
//!
//! Every function that could divide by zero returns `Option` instead. Sample
//! (n − 1) variance is used throughout, matching SQL `STDDEV`.

use std::cmp::Ordering;

pub fn mean(values: &[f64]) -> Option<f64> {
  if values.is_empty() {
    return None;
  }
  Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation; `None` for fewer than two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
  if values.len() < 2 {
    return None;
  }
  let m = mean(values)?;
  let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
  Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Pearson correlation coefficient. `None` when either side has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
  let (sxx, syy, sxy) = co_moments(xs, ys)?;
  if sxx <= 0.0 || syy <= 0.0 {
    return None;
  }
  Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Ordinary least-squares fit `y = slope * x + intercept`.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
  let (sxx, _, sxy) = co_moments(xs, ys)?;
  if sxx <= 0.0 {
    return None;
  }
  let slope = sxy / sxx;
  let intercept = mean(ys)? - slope * mean(xs)?;
  Some((slope, intercept))
}

fn co_moments(xs: &[f64], ys: &[f64]) -> Option<(f64, f64, f64)> {
  if xs.len() != ys.len() || xs.len() < 2 {
    return None;
  }
  let mx = mean(xs)?;
  let my = mean(ys)?;
  let mut sxx = 0.0;
  let mut syy = 0.0;
  let mut sxy = 0.0;
  for (x, y) in xs.iter().zip(ys) {
    let dx = x - mx;
    let dy = y - my;
    sxx += dx * dx;
    syy += dy * dy;
    sxy += dx * dy;
  }
  Some((sxx, syy, sxy))
}

/// Linear-interpolated quantile (`q` in [0, 1]) of an ascending slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
  if sorted.is_empty() {
    return None;
  }
  let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
  let lo = pos.floor() as usize;
  let hi = pos.ceil() as usize;
  let frac = pos - lo as f64;
  Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn sorted(values: &[f64]) -> Vec<f64> {
  let mut v = values.to_vec();
  v.sort_by(f64::total_cmp);
  v
}

pub fn median(values: &[f64]) -> Option<f64> { quantile_sorted(&sorted(values), 0.5) }

/// Round half away from zero to `places` decimal places, like SQL `ROUND`.
pub fn round_to(value: f64, places: i32) -> f64 {
  let factor = 10f64.powi(places);
  (value * factor).round() / factor
}

/// `PERCENT_RANK()` for each value, in input order: `(rank - 1) / (n - 1)`
/// where tied values share the lowest rank. A single value ranks 0.
pub fn percent_ranks(values: &[f64]) -> Vec<f64> {
  let n = values.len();
  if n <= 1 {
    return vec![0.0; n];
  }
  let mut order: Vec<usize> = (0..n).collect();
  order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

  let mut ranks = vec![0.0; n];
  let mut rank = 0;
  for (pos, &idx) in order.iter().enumerate() {
    if pos > 0 && values[order[pos - 1]].total_cmp(&values[idx]) != Ordering::Equal {
      rank = pos;
    }
    ranks[idx] = rank as f64 / (n - 1) as f64;
  }
  ranks
}

/// `NTILE(buckets)` for row `pos` (0-based) out of `n` ordered rows.
///
/// The first `n % buckets` tiles receive one extra row.
pub fn ntile(pos: usize, n: usize, buckets: usize) -> usize {
  let base = n / buckets;
  let extra = n % buckets;
  let big = extra * (base + 1);
  if pos < big {
    pos / (base + 1) + 1
  } else {
    extra + (pos - big) / base.max(1) + 1
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn close(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

  #[test]
  fn mean_and_std() {
    assert_eq!(mean(&[]), None);
    assert!(close(mean(&[1.0, 2.0, 3.0]).unwrap(), 2.0));
    assert_eq!(std_dev(&[5.0]), None);
    assert!(close(std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap(), 2.138089935299395));
  }

  #[test]
  fn pearson_perfect_and_degenerate() {
    let xs = [1.0, 2.0, 3.0, 4.0];
    assert!(close(pearson(&xs, &[2.0, 4.0, 6.0, 8.0]).unwrap(), 1.0));
    assert!(close(pearson(&xs, &[8.0, 6.0, 4.0, 2.0]).unwrap(), -1.0));
    assert_eq!(pearson(&xs, &[3.0, 3.0, 3.0, 3.0]), None);
    assert_eq!(pearson(&[1.0], &[1.0]), None);
  }

  #[test]
  fn linear_fit_recovers_line() {
    let (slope, intercept) = linear_fit(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
    assert!(close(slope, 2.0));
    assert!(close(intercept, 1.0));
  }

  #[test]
  fn quantiles_interpolate() {
    let v = [1.0, 2.0, 3.0, 4.0];
    assert!(close(quantile_sorted(&v, 0.25).unwrap(), 1.75));
    assert!(close(quantile_sorted(&v, 0.5).unwrap(), 2.5));
    assert!(close(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0));
    assert_eq!(quantile_sorted(&[], 0.5), None);
  }

  #[test]
  fn rounding_is_half_away_from_zero() {
    assert_eq!(round_to(2.25, 1), 2.3);
    assert_eq!(round_to(71.04, 1), 71.0);
    assert_eq!(round_to(3.14159, 2), 3.14);
  }

  #[test]
  fn percent_rank_shares_ties() {
    let ranks = percent_ranks(&[300.0, 100.0, 200.0, 200.0, 500.0]);
    assert_eq!(ranks, vec![0.75, 0.0, 0.25, 0.25, 1.0]);
    assert_eq!(percent_ranks(&[42.0]), vec![0.0]);
    assert!(percent_ranks(&[]).is_empty());
  }

  #[test]
  fn ntile_matches_sql() {
    let tiles: Vec<usize> = (0..10).map(|i| ntile(i, 10, 4)).collect();
    assert_eq!(tiles, vec![1, 1, 1, 2, 2, 2, 3, 3, 4, 4]);
    let tiles: Vec<usize> = (0..3).map(|i| ntile(i, 3, 4)).collect();
    assert_eq!(tiles, vec![1, 2, 3]);
  }
}
