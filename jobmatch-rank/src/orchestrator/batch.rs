//! Contiguous, order-preserving batching of the candidate set.

use crate::types::JobRecord;

/// Number of batches `len` records split into: `ceil(len / batch_size)`.
///
/// A `batch_size` of zero is treated as one.
pub fn batch_count(len: usize, batch_size: usize) -> usize {
    len.div_ceil(batch_size.max(1))
}

/// Split `jobs` into contiguous batches of at most `batch_size` records.
///
/// Batch `i` holds `jobs[i * batch_size .. min((i + 1) * batch_size, len)]`.
/// Record order is preserved within and across batches; an empty input
/// yields no batches.
pub fn split_batches(jobs: &[JobRecord], batch_size: usize) -> Vec<Vec<JobRecord>> {
    jobs.chunks(batch_size.max(1)).map(<[JobRecord]>::to_vec).collect()
}
