use crate::config::HarvestConfig;
use crate::dedup::Deduplicator;
use crate::emit;
use crate::error::Result;
use crate::filter::{CandidateFilter, Classifier};
use crate::liveness::LivenessChecker;
use crate::paginate::collect_results;
use crate::providers::{PageFetcher, SearchProvider};
use crate::results::{Candidate, RunReport};
use crate::throttle::Throttle;

#[cfg(test)]
mod tests;

/// The compiled stages of one harvest run
#[derive(Debug)]
pub struct Pipeline {
    config: HarvestConfig,
    filter: CandidateFilter,
    classifier: Classifier,
    liveness: Option<LivenessChecker>,
    throttle: Throttle,
}

impl Pipeline {
    /// Compile filters and closed-page patterns for a configuration
    pub fn new(config: HarvestConfig) -> Result<Self> {
        let filter = CandidateFilter::new(config.filter.clone())?;
        let classifier = Classifier::new(&config.categories)?;
        let liveness = match &config.liveness {
            Some(liveness) => Some(LivenessChecker::new(liveness.clone())?),
            None => None,
        };
        let throttle = Throttle::new(config.throttle.clone());

        Ok(Self {
            config,
            filter,
            classifier,
            liveness,
            throttle,
        })
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Filter, classify and dedupe in one pass, recording the drops in `report`
    pub fn screen(&self, candidates: Vec<Candidate>, report: &mut RunReport) -> Vec<Candidate> {
        let (mut kept, rejected) = self.filter.retain(candidates);
        report.rejected += rejected;
        ::log::info!("Filtered down to {} listings ({} rejected)", kept.len(), rejected);

        self.classifier.label(&mut kept);

        let mut dedup = Deduplicator::new(self.config.dedup.clone());
        let (unique, duplicates) = dedup.dedupe(kept);
        report.duplicates += duplicates;
        if duplicates > 0 {
            ::log::info!("Dropped {} duplicate listings", duplicates);
        }

        unique
    }

    /// Run every stage and write the surviving listings.
    ///
    /// `fetcher` is only used when the configuration enables the posting-page check.
    pub async fn run<P, F>(&self, provider: &P, fetcher: &F) -> Result<RunReport>
    where
        P: SearchProvider + ?Sized,
        F: PageFetcher + ?Sized,
    {
        let mut report = RunReport::default();
        ::log::info!(
            "Starting {} harvest via {}: {}",
            self.config.name,
            provider.name(),
            self.config.search.q
        );

        let raw = collect_results(
            provider,
            &self.config.search,
            &self.config.pagination,
            &self.throttle,
        )
        .await?;
        report.fetched = raw.len();

        let candidates: Vec<Candidate> = raw.into_iter().map(Candidate::from).collect();
        let mut listings = self.screen(candidates, &mut report);

        if let Some(checker) = &self.liveness {
            let checked = checker.verify(fetcher, listings, &self.throttle).await;
            report.closed = checked.closed;
            report.failed = checked.failed;
            report.missing_email = checked.missing_email;
            listings = checked.open;
        }

        if let Some(max) = self.config.max_output {
            if listings.len() > max {
                ::log::info!("Keeping the first {} of {} listings", max, listings.len());
                listings.truncate(max);
            }
        }

        let path = emit::emit(&self.config.output_dir, &self.config.output_prefix, &listings)?;
        report.emitted = listings.len();
        report.output_path = Some(path);

        ::log::info!(
            "{}: fetched {}, rejected {}, duplicates {}, closed {}, failed {}, emitted {}",
            self.config.name,
            report.fetched,
            report.rejected,
            report.duplicates,
            report.closed,
            report.failed,
            report.emitted
        );

        Ok(report)
    }
}
