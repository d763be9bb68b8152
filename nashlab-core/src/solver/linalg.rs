//! Dense linear solves for the small systems enumeration produces.
//!
//! Systems are at most 6x6 (support size 5 plus the value variable), so plain
//! Gaussian elimination with partial pivoting is enough.

/// Pivots below this (relative to the largest coefficient) mark the system singular.
const RELATIVE_PIVOT_EPS: f64 = 1e-12;

/// Solve `m · x = b` for square `m` given as rows.
///
/// Returns `None` when the system is singular or the shapes disagree.
pub fn solve(mut m: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    if m.len() != n || m.iter().any(|row| row.len() != n) {
        return None;
    }

    let scale = m
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return None;
    }
    let eps = RELATIVE_PIVOT_EPS * scale;

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))?;
        if m[pivot_row][col].abs() < eps {
            return None;
        }
        m.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = m[row][col] / m[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                m[row][k] -= factor * m[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| m[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / m[row][row];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Lexicographic k-subsets of `0..n`.
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 || k > n {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        out.push(current.clone());
        // Rightmost position that can still advance.
        let Some(pos) = (0..k).rev().find(|&i| current[i] < n - k + i) else {
            break;
        };
        current[pos] += 1;
        for i in (pos + 1)..k {
            current[i] = current[i - 1] + 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_two_by_two() {
        let x = solve(vec![vec![2.0, 1.0], vec![1.0, 3.0]], vec![3.0, 5.0]).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn needs_pivoting() {
        let x = solve(vec![vec![0.0, 1.0], vec![1.0, 0.0]], vec![2.0, 3.0]).unwrap();
        assert_eq!(x, vec![3.0, 2.0]);
    }

    #[test]
    fn singular_returns_none() {
        assert!(solve(vec![vec![1.0, 2.0], vec![2.0, 4.0]], vec![1.0, 2.0]).is_none());
        assert!(solve(vec![vec![0.0, 0.0], vec![0.0, 0.0]], vec![0.0, 1.0]).is_none());
    }

    #[test]
    fn shape_mismatch_returns_none() {
        assert!(solve(vec![vec![1.0, 2.0]], vec![1.0, 2.0]).is_none());
    }

    #[test]
    fn combinations_are_lexicographic() {
        assert_eq!(
            combinations(4, 2),
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
        assert_eq!(combinations(5, 5).len(), 1);
        assert_eq!(combinations(10, 5).len(), 252);
        assert!(combinations(2, 3).is_empty());
    }
}
