// src/cli.rs
use std::{fs, path::{Path, PathBuf}, time::Duration};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, Result, WrapErr};

use crate::{
    athletes::AthleteSource,
    config::{consts::activity_url, ScrapeOptions, ShardOptions},
    progress::Progress,
    record::{canonicalize, check_athlete, embedded_athlete_id},
    runner,
    session::{BrowserSession, SnapshotSession},
    specs::ActivityChain,
    store::{ActivityStore, SqliteStore},
};

#[derive(Parser, Debug)]
#[command(name = "strava_scrape", version)]
#[command(about = "Scrape recent Strava activities into a local SQLite database")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Most recent activities taken per athlete
    #[arg(long, global = true, default_value_t = 1)]
    pub per_athlete: usize,

    /// Seconds to wait for a page URL to settle after navigation
    /// (saved pages need none unless given)
    #[arg(long, global = true)]
    pub wait: Option<u64>,

    /// Pause after navigation before reading the page, in milliseconds
    /// (saved pages need none unless given)
    #[arg(long, global = true)]
    pub settle_ms: Option<u64>,

    /// Also try capturing the activity API response from the network log
    #[arg(long, global = true)]
    pub use_cdp: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Saved pages never change after load, so sleeps default to zero;
    /// `--wait` / `--settle-ms` still apply when given.
    pub fn scrape_options(&self) -> ScrapeOptions {
        let offline = ScrapeOptions::offline();
        ScrapeOptions {
            per_athlete: self.per_athlete,
            use_cdp: self.use_cdp,
            wait: self.wait.map_or(offline.wait, Duration::from_secs),
            settle: self.settle_ms.map_or(offline.settle, Duration::from_millis),
            ..offline
        }
    }
}

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Athlete id (repeatable)
    #[arg(long = "athlete-id")]
    pub athlete_ids: Vec<String>,

    /// Text file with one athlete id per line
    #[arg(long, conflicts_with = "athlete_ids")]
    pub athletes_file: Option<PathBuf>,
}

impl SourceArgs {
    pub fn source(&self) -> AthleteSource {
        match &self.athletes_file {
            Some(path) => AthleteSource::File(path.clone()),
            None => AthleteSource::Ids(self.athlete_ids.clone()),
        }
    }
}

#[derive(Args, Debug)]
pub struct ShardArgs {
    #[arg(long, default_value_t = 1)]
    pub total_shards: usize,

    /// 1-based
    #[arg(long, default_value_t = 1)]
    pub shard_id: usize,
}

impl From<&ShardArgs> for ShardOptions {
    fn from(a: &ShardArgs) -> Self {
        ShardOptions { total_shards: a.total_shards, shard_id: a.shard_id }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the athlete ids assigned to one shard
    Shard {
        #[command(flatten)]
        shard: ShardArgs,
        #[command(flatten)]
        sources: SourceArgs,
    },
    /// Run the extraction chain over one saved activity page
    Extract {
        #[arg(long)]
        html: PathBuf,
        #[arg(long)]
        activity_id: String,
        /// Reject the page if it belongs to another athlete
        #[arg(long)]
        athlete_id: Option<String>,
        /// Also save the record into this database
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Run the full scrape over a directory of saved pages
    /// (athletes/<id>.html, activities/<id>.html)
    RunSnapshots {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        db: PathBuf,
        #[command(flatten)]
        shard: ShardArgs,
        #[command(flatten)]
        sources: SourceArgs,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::log::init(cli.global.verbose);
    dispatch(&cli)
}

pub fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Shard { shard, sources } => print_shard(shard, sources),
        Command::Extract { html, activity_id, athlete_id, db } => {
            extract(&cli.global, html, activity_id, athlete_id.as_deref(), db.as_deref())
        }
        Command::RunSnapshots { dir, db, shard, sources } => {
            run_snapshots(&cli.global, dir, db, shard, sources)
        }
    }
}

fn print_shard(shard: &ShardArgs, sources: &SourceArgs) -> Result<()> {
    let ids = sources.source().load()?;
    let assignment = ShardOptions::from(shard).assignment()?;
    let range = assignment.range(ids.len());
    eprintln!(
        "shard {}/{}: [{}, {}) of {}",
        assignment.shard_id(), assignment.total_shards(), range.start, range.end, ids.len()
    );
    for id in assignment.slice(&ids) {
        println!("{id}");
    }
    Ok(())
}

fn extract(
    global: &GlobalArgs,
    html_path: &Path,
    activity_id: &str,
    athlete_id: Option<&str>,
    db: Option<&Path>,
) -> Result<()> {
    let html = fs::read_to_string(html_path)
        .wrap_err_with(|| format!("reading {}", html_path.display()))?;
    let opts = global.scrape_options();
    let url = activity_url(activity_id);

    let mut session = SnapshotSession::new().with_page(url.clone(), html);
    session.navigate(&url)?;
    let extraction = ActivityChain::standard(&opts).run(&session, activity_id, &opts)?;
    logf!("activity {activity_id}: primary source {}", extraction.source);

    let owner = match athlete_id {
        Some(expected) => {
            check_athlete(&extraction.merged, activity_id, expected)?;
            s!(expected)
        }
        None => embedded_athlete_id(&extraction.merged).unwrap_or_default(),
    };
    if db.is_some() && owner.is_empty() {
        bail!("activity {activity_id}: page names no athlete; pass --athlete-id to save it");
    }
    let record = canonicalize(extraction.merged, activity_id, &owner);
    println!("{}", serde_json::to_string_pretty(&record)?);

    if let Some(path) = db {
        let mut store = SqliteStore::open(path)?;
        store.upsert(&record)?;
        logf!("saved activity {activity_id} to {}", path.display());
    }
    Ok(())
}

fn run_snapshots(
    global: &GlobalArgs,
    dir: &Path,
    db: &Path,
    shard: &ShardArgs,
    sources: &SourceArgs,
) -> Result<()> {
    let ids = sources.source().load()?;
    let assignment = ShardOptions::from(shard).assignment()?;
    let opts = global.scrape_options();

    let mut session = SnapshotSession::from_dir(dir);
    let mut store = SqliteStore::open(db)?;
    let mut progress = ConsoleProgress::default();

    let summary = runner::run(&opts, assignment, &ids, &mut session, &mut store, Some(&mut progress))?;
    println!(
        "athletes: {} processed, {} skipped; activities: {} saved, {} skipped",
        summary.athletes_processed, summary.athletes_skipped,
        summary.activities_saved, summary.activities_skipped
    );
    Ok(())
}

/// Prints one line per athlete to stderr.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    seen: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("{total} athlete(s) in this shard");
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, athlete_id: &str) {
        self.seen += 1;
        eprintln!("[{}/{}] {athlete_id} done", self.seen, self.total);
    }
    fn item_failed(&mut self, athlete_id: &str) {
        self.seen += 1;
        eprintln!("[{}/{}] {athlete_id} skipped", self.seen, self.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn globals_map_onto_options() {
        let cli = Cli::try_parse_from([
            "strava_scrape", "--per-athlete", "3", "--wait", "2", "--settle-ms", "100", "--use-cdp",
            "shard", "--athlete-id", "1",
        ]).unwrap();
        let opts = cli.global.scrape_options();
        assert_eq!(opts.per_athlete, 3);
        assert_eq!(opts.wait, Duration::from_secs(2));
        assert_eq!(opts.settle, Duration::from_millis(100));
        assert!(opts.use_cdp);
    }

    #[test]
    fn saved_page_runs_skip_sleeps_unless_asked() {
        let args = ["strava_scrape", "run-snapshots", "--dir", "pages", "--db", "out.db", "--athlete-id", "1"];
        let quiet = Cli::try_parse_from(args).unwrap().global.scrape_options();
        assert_eq!(quiet.wait, Duration::ZERO);
        assert_eq!(quiet.settle, Duration::ZERO);

        let slow = Cli::try_parse_from(
            ["strava_scrape", "--settle-ms", "4000", "--wait", "9"].into_iter().chain(args.into_iter().skip(1)),
        ).unwrap().global.scrape_options();
        assert_eq!(slow.wait, Duration::from_secs(9));
        assert_eq!(slow.settle, Duration::from_millis(4000));
    }

    const OWNERLESS_PAGE: &str = r#"<html><body>
        <script id="__NEXT_DATA__" type="application/json">
        {"props":{"pageProps":{"activity":{"distance":5000,"moving_time":1500}}}}
        </script></body></html>"#;

    #[test]
    fn extract_will_not_save_without_an_owner() {
        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("page.html");
        let db = dir.path().join("out.db");
        fs::write(&html, OWNERLESS_PAGE).unwrap();
        let (html_arg, db_arg) = (html.to_str().unwrap(), db.to_str().unwrap());

        let cli = Cli::try_parse_from([
            "strava_scrape", "extract", "--html", html_arg, "--activity-id", "77", "--db", db_arg,
        ]).unwrap();
        assert!(dispatch(&cli).is_err());
        assert!(!db.exists());

        let cli = Cli::try_parse_from([
            "strava_scrape", "extract", "--html", html_arg, "--activity-id", "77",
            "--athlete-id", "123", "--db", db_arg,
        ]).unwrap();
        dispatch(&cli).unwrap();
        let saved = SqliteStore::open(&db).unwrap().get("77").unwrap().unwrap();
        assert_eq!(saved.strava_athlete_id, "123");
        assert_eq!(saved.distance_m, Some(5000));
    }

    #[test]
    fn shard_sources_parse() {
        let cli = Cli::try_parse_from([
            "strava_scrape", "shard", "--total-shards", "3", "--shard-id", "2",
            "--athlete-id", "10", "--athlete-id", "11",
        ]).unwrap();
        let Command::Shard { shard, sources } = cli.command else { panic!("expected shard") };
        assert_eq!((shard.total_shards, shard.shard_id), (3, 2));
        assert_eq!(sources.source().load().unwrap(), vec!["10", "11"]);
    }

    #[test]
    fn file_and_ids_conflict() {
        let res = Cli::try_parse_from([
            "strava_scrape", "shard", "--athlete-id", "1", "--athletes-file", "ids.txt",
        ]);
        assert!(res.is_err());
    }
}
