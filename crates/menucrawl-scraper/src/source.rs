//! Chooses between the live pipeline and the synthetic generator.

use menucrawl_core::{DataSource, PipelineResult, SearchRequest};

use crate::driver::Launch;
use crate::error::StageError;
use crate::pipeline::MenuPipeline;
use crate::synthetic::generate_with_thread_rng;

/// Produces restaurants for `request` from `source`.
///
/// `Fallback` runs the live pipeline and answers with synthetic data if the
/// run fails.
///
/// # Errors
///
/// Returns the run's [`StageError`] when `source` is `Live` and the run
/// fails. `Synthetic` and `Fallback` never fail.
pub async fn collect_restaurants<L: Launch>(
    pipeline: &MenuPipeline<L>,
    source: DataSource,
    request: &SearchRequest,
) -> Result<PipelineResult, StageError> {
    match source {
        DataSource::Synthetic => {
            tracing::debug!(query = request.query(), "serving synthetic restaurants");
            Ok(generate_with_thread_rng(request))
        }
        DataSource::Live => Ok(pipeline.run(request).await?.into_restaurants()),
        DataSource::Fallback => match pipeline.run(request).await {
            Ok(report) => Ok(report.into_restaurants()),
            Err(e) => {
                tracing::warn!(error = %e, "live run failed, serving synthetic restaurants");
                Ok(generate_with_thread_rng(request))
            }
        },
    }
}
