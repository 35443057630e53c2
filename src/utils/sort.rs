/// Counting-sort permutation that orders particles by their bin key.
///
/// The sort is stable, so particles sharing a bin keep their relative order.
///
/// ```rust
/// use ljmd::utils::get_sort_indices;
///
/// let bins = vec![2, 0, 1, 0];
/// let indices = get_sort_indices(&bins);
/// assert_eq!(indices, vec![1, 3, 2, 0]);
/// ```
pub fn get_sort_indices(keys: &[usize]) -> Vec<usize> {
    let num_keys = match keys.iter().max() {
        Some(v) => *v + 1,
        None => return Vec::new(),
    };
    let mut counts = vec![0usize; num_keys];

    for &k in keys {
        counts[k] += 1;
    }
    for i in 1..num_keys {
        counts[i] += counts[i - 1];
    }

    let mut output = vec![0usize; keys.len()];
    for i in (0..keys.len()).rev() {
        let k = keys[i];
        counts[k] -= 1;
        output[counts[k]] = i;
    }
    output
}

/// Applies a permutation from [`get_sort_indices`] to one per-particle array.
///
/// ```rust
/// use ljmd::utils::{get_sort_indices, permute};
///
/// let mut tags = vec![10usize, 11, 12];
/// let mut positions = vec![[1.0, 1.0, 1.0], [3.0, 3.0, 3.0], [2.0, 2.0, 2.0]];
/// let indices = get_sort_indices(&[2, 0, 1]);
///
/// permute(&indices, &mut tags);
/// permute(&indices, &mut positions);
///
/// assert_eq!(tags, vec![11, 12, 10]);
/// assert_eq!(positions[0], [3.0, 3.0, 3.0]);
/// ```
pub fn permute<T: Copy>(sort_indices: &[usize], values: &mut Vec<T>) {
    assert_eq!(sort_indices.len(), values.len());
    let sorted: Vec<T> = sort_indices.iter().map(|&idx| values[idx]).collect();
    *values = sorted;
}
