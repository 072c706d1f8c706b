// src/specs/activity.rs
use std::{fmt, thread};

use scraper::Html;

use super::{embedded_json::EmbeddedJson, legacy_script::LegacyScript,
            network_capture::NetworkCapture, runtime_state::RuntimeState, supplement};
use crate::config::ScrapeOptions;
use crate::error::{Result, ScrapeError};
use crate::record::{merge_fragments, MergedRecord, RawFragment};
use crate::session::BrowserSession;

/// Which primary strategy supplied the core data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    EmbeddedJson,
    RuntimeState,
    LegacyScript,
    NetworkCapture,
    None,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::EmbeddedJson => "embedded-json",
            Source::RuntimeState => "runtime-state",
            Source::LegacyScript => "legacy-script",
            Source::NetworkCapture => "network-capture",
            Source::None => "none",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a strategy may look at for one loaded activity page.
/// The markup is read once, after the settle delay, and shared.
pub struct PageContext<'a> {
    pub activity_id: &'a str,
    pub html: &'a str,
    pub doc: &'a Html,
    pub session: &'a dyn BrowserSession,
    pub opts: &'a ScrapeOptions,
}

pub trait Strategy {
    fn source(&self) -> Source;

    /// Never fails: "nothing found" and "something broke" are both empty.
    fn attempt(&self, page: &PageContext<'_>) -> RawFragment;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
    pub source: Source,
    pub merged: MergedRecord,
}

pub struct ActivityChain {
    primaries: Vec<Box<dyn Strategy>>,
}

impl ActivityChain {
    /// Priority order used in production. Network capture needs the
    /// browser's performance log, so it only joins when enabled.
    pub fn standard(opts: &ScrapeOptions) -> Self {
        let mut primaries: Vec<Box<dyn Strategy>> = Vec::with_capacity(4);
        primaries.push(Box::new(EmbeddedJson));
        primaries.push(Box::new(RuntimeState));
        primaries.push(Box::new(LegacyScript));
        if opts.use_cdp {
            primaries.push(Box::new(NetworkCapture));
        }
        Self { primaries }
    }

    pub fn with_strategies(primaries: Vec<Box<dyn Strategy>>) -> Self {
        Self { primaries }
    }

    pub fn sources(&self) -> Vec<Source> {
        self.primaries.iter().map(|s| s.source()).collect()
    }

    /// Settle, read the page once, run the cascade.
    pub fn run(&self, session: &dyn BrowserSession, activity_id: &str, opts: &ScrapeOptions) -> Result<Extraction> {
        if !opts.settle.is_zero() {
            thread::sleep(opts.settle);
        }
        let html = session.page_source()?;
        let doc = Html::parse_document(&html);
        let page = PageContext { activity_id, html: &html, doc: &doc, session, opts };

        let extraction = self.extract(&page);
        if extraction.merged.is_empty() {
            return Err(ScrapeError::ExtractionEmpty(s!(activity_id)));
        }
        Ok(extraction)
    }

    /// The cascade over an already-loaded page: first non-empty primary
    /// fragment, then the supplement, merged in that order.
    pub fn extract(&self, page: &PageContext<'_>) -> Extraction {
        let mut source = Source::None;
        let mut primary = RawFragment::new();

        for strategy in &self.primaries {
            let fragment = strategy.attempt(page);
            if !fragment.is_empty() {
                source = strategy.source();
                primary = fragment;
                break;
            }
            logd!("activity {}: {} produced nothing", page.activity_id, strategy.source());
        }

        let extra = supplement::supplement(page.html, page.doc, &primary);
        logd!(
            "activity {}: source={} primary_keys={} supplement_keys={}",
            page.activity_id, source, primary.len(), extra.len()
        );

        Extraction { source, merged: merge_fragments([primary, extra]) }
    }
}
