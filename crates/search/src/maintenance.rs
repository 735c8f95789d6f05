//! Bulk maintenance: reindex every record of a model
//!
//! Records are paged from the record store in fixed-size batches. Within a
//! batch, records are reindexed on a rayon pool bounded by
//! `maintenance_parallelism`; the next batch is fetched only once the
//! current one has fully completed. The first error aborts the pass.

use rayon::prelude::*;

use lodestar_core::{Error, Result};

use crate::searcher::Searcher;

/// Reindex every record the searcher's record store holds
///
/// Records are not rewritten, only their index entries, each rebuilt from
/// the stored copy under its reindex lock. Returns the number of records
/// processed.
///
/// # Errors
///
/// The first reindex or storage error; batches after it are not fetched.
pub fn touch_all(searcher: &Searcher) -> Result<usize> {
    let config = searcher.config();
    let batch_size = config.maintenance_batch_size;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.maintenance_parallelism)
        .thread_name(|i| format!("lodestar-maint-{}", i))
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))?;

    let mut processed = 0;
    let mut batch_no = 0;
    loop {
        let batch = searcher.records().page(processed, batch_size)?;
        if batch.is_empty() {
            break;
        }

        pool.install(|| {
            batch
                .par_iter()
                .try_for_each(|doc| searcher.refresh(&doc.id).map(|_| ()))
        })?;

        processed += batch.len();
        batch_no += 1;
        tracing::info!(
            target: "lodestar::search",
            model = searcher.model(),
            batch = batch_no,
            records = batch.len(),
            total = processed,
            "Maintenance batch reindexed"
        );

        if batch.len() < batch_size {
            break;
        }
    }

    Ok(processed)
}
