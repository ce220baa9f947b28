//! Row iteration that fans out over Rayon when the `parallel` feature is on.
//!
//! Every pixel loop in this crate writes one output row per closure call and
//! reads only from an immutable source, so rows are independent.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls `f(y, row)` for every `row_len`-byte row of `dst`.
pub(crate) fn for_each_row<F>(dst: &mut [u8], row_len: usize, f: F)
where
    F: Fn(usize, &mut [u8]) + Send + Sync,
{
    if row_len == 0 {
        return;
    }

    #[cfg(feature = "parallel")]
    dst.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));

    #[cfg(not(feature = "parallel"))]
    dst.chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_get_their_index() {
        let mut buf = vec![0u8; 12];
        for_each_row(&mut buf, 4, |y, row| row.fill(y as u8 + 1));
        assert_eq!(buf, vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]);
    }
}
