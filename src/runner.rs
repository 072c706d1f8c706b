// src/runner.rs
use crate::{
    config::{consts::activity_url, ScrapeOptions},
    error::{Result, ScrapeError},
    progress::Progress,
    record::{canonicalize, check_athlete, CanonicalActivityRecord},
    session::BrowserSession,
    shard::ShardAssignment,
    specs::{athlete::recent_activity_ids, ActivityChain},
    store::ActivityStore,
};

/// What one run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub athletes_processed: usize,
    pub athletes_skipped: usize,
    pub activities_saved: usize,
    pub activities_skipped: usize,
}

/// Top-level loop for one shard: discovery, extraction, persistence.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
///
/// Item-level failures are logged and skipped. Anything else (store errors
/// above all) ends the run and is returned as-is.
pub fn run(
    opts: &ScrapeOptions,
    shard: ShardAssignment,
    athletes: &[String],
    session: &mut dyn BrowserSession,
    store: &mut dyn ActivityStore,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let ids = shard.slice(athletes);
    if ids.is_empty() {
        return Err(ScrapeError::NoAthletes);
    }

    let range = shard.range(athletes.len());
    logf!(
        "shard {}/{}: athletes {}..{} of {}",
        shard.shard_id(), shard.total_shards(), range.start, range.end, athletes.len()
    );
    if let Some(p) = progress.as_deref_mut() {
        p.begin(ids.len());
    }

    let chain = ActivityChain::standard(opts);
    let mut summary = RunSummary::default();

    let result: Result<()> = (|| {
        for athlete_id in ids {
            let activities = match recent_activity_ids(session, athlete_id, opts) {
                Ok(v) => v,
                Err(e) if e.is_item_level() => {
                    logw!("athlete {athlete_id}: {e}");
                    summary.athletes_skipped += 1;
                    if let Some(p) = progress.as_deref_mut() {
                        p.log(&format!("skipped athlete {athlete_id}: {e}"));
                        p.item_failed(athlete_id);
                    }
                    continue;
                }
                Err(e) => return Err(e),
            };
            logf!("athlete {athlete_id}: {} activit(ies) to scrape", activities.len());

            for activity_id in &activities {
                match scrape_activity(session, &chain, opts, athlete_id, activity_id) {
                    Ok(rec) => {
                        if let Err(e) = store.upsert(&rec) {
                            loge!("activity {activity_id}: store write failed: {e}");
                            return Err(e);
                        }
                        summary.activities_saved += 1;
                        logf!("activity {activity_id}: saved");
                    }
                    Err(e) if e.is_item_level() => {
                        logw!("activity {activity_id}: {e}");
                        summary.activities_skipped += 1;
                    }
                    Err(e) => return Err(e),
                }
            }

            summary.athletes_processed += 1;
            if let Some(p) = progress.as_deref_mut() {
                p.item_done(athlete_id);
            }
        }
        Ok(())
    })();

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    result?;

    logf!(
        "done: {} athlete(s), {} skipped; {} activit(ies) saved, {} skipped",
        summary.athletes_processed, summary.athletes_skipped,
        summary.activities_saved, summary.activities_skipped
    );
    Ok(summary)
}

/// Navigate to one activity and turn it into a canonical record, checking that
/// the page still belongs to `athlete_id`.
pub fn scrape_activity(
    session: &mut dyn BrowserSession,
    chain: &ActivityChain,
    opts: &ScrapeOptions,
    athlete_id: &str,
    activity_id: &str,
) -> Result<CanonicalActivityRecord> {
    session.navigate(&activity_url(activity_id))?;
    let extraction = chain.run(&*session, activity_id, opts)?;
    logd!("activity {activity_id}: primary source {}", extraction.source);
    check_athlete(&extraction.merged, activity_id, athlete_id)?;
    Ok(canonicalize(extraction.merged, activity_id, athlete_id))
}
