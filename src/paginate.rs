use crate::config::{PaginationConfig, SearchParams};
use crate::error::{HarvestError, Result};
use crate::providers::SearchProvider;
use crate::results::OrganicResult;
use crate::throttle::{Pause, Throttle};

/// Page through a provider until it runs dry, errors, or the offset cap is hit.
///
/// - empty page: stop and return what was collected
/// - provider-reported error (or CAPTCHA): stop; fail only when nothing was collected
/// - transport error: log, back off, move on to the next offset
pub async fn collect_results<P: SearchProvider + ?Sized>(
    provider: &P,
    params: &SearchParams,
    pagination: &PaginationConfig,
    throttle: &Throttle,
) -> Result<Vec<OrganicResult>> {
    let mut collected: Vec<OrganicResult> = Vec::new();
    let mut attempted = 0usize;
    let mut transport_failures = 0usize;
    let mut last_error: Option<HarvestError> = None;

    for start in pagination.offsets() {
        attempted += 1;
        ::log::info!("Fetching {} page starting at {}", provider.name(), start);

        let page = match provider.search(params, start).await {
            Ok(page) => page,
            Err(e) if e.is_transport() => {
                ::log::warn!("{} request failed at offset {}: {}", provider.name(), start, e);
                transport_failures += 1;
                last_error = Some(e);
                throttle.pause(Pause::Error).await;
                continue;
            }
            Err(e) => {
                if collected.is_empty() {
                    return Err(e);
                }
                ::log::warn!("{} stopped at offset {}: {}", provider.name(), start, e);
                break;
            }
        };

        if let Some(message) = page.error {
            ::log::warn!("{} error at offset {}: {}", provider.name(), start, message);
            if collected.is_empty() {
                return Err(HarvestError::Provider(message));
            }
            break;
        }

        if page.organic.is_empty() {
            ::log::info!("No more results after offset {}", start);
            break;
        }

        collected.extend(page.organic);
        throttle.pause(Pause::Page).await;
    }

    if attempted > 0 && transport_failures == attempted {
        if let Some(e) = last_error {
            return Err(e);
        }
    }

    ::log::info!("Total raw results fetched: {}", collected.len());
    Ok(collected)
}
