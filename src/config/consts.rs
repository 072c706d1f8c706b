// src/config/consts.rs
use std::time::Duration;

// Site
pub const BASE_URL: &str = "https://www.strava.com";
pub const ATHLETES_PATH: &str = "/athletes/";
pub const ACTIVITIES_PATH: &str = "/activities/";
pub const ACTIVITY_API_PATH: &str = "api/v4/activities/";

// Embedded JSON
pub const NEXT_DATA_ID: &str = "__NEXT_DATA__";
pub const JUNK_PREFIX: &str = "]) }while(1);</x>";

// Profile markers that mean "nothing to scrape here"
pub const PROFILE_UNAVAILABLE_MARKERS: &[&str] = &[
    "limited_profile",
    "This profile is private",
    "page you requested is not available",
];

// Timing defaults
pub const SETTLE_DELAY: Duration = Duration::from_secs(5);
pub const PAGE_WAIT: Duration = Duration::from_secs(10);
pub const URL_POLL: Duration = Duration::from_millis(250);
pub const CDP_TIMEOUT: Duration = Duration::from_secs(5);
pub const CDP_POLL: Duration = Duration::from_millis(300);
pub const SCROLL_ROUNDS: usize = 6;
pub const SCROLL_PAUSE: Duration = Duration::from_millis(1200);

// Run
pub const DEFAULT_PER_ATHLETE: usize = 1;

pub fn athlete_url(athlete_id: &str) -> String {
    join!(BASE_URL, ATHLETES_PATH, athlete_id)
}

pub fn activity_url(activity_id: &str) -> String {
    join!(BASE_URL, ACTIVITIES_PATH, activity_id)
}
