// src/specs/runtime_state.rs
// Older client runtime keeps the activity in in-memory view models that never
// reach the markup. Ask the page for them directly.
use serde_json::Value;

use super::{PageContext, Source, Strategy};
use crate::record::RawFragment;

/// Returns the activity attributes with the athlete attributes attached
/// under `athlete`, or null when either model is missing.
pub const RUNTIME_SCRIPT: &str = r#"
try {
    var activityData = window.pageView.activity().attributes;
    var athleteData  = window.activityAthlete.attributes;
    activityData.athlete = athleteData;
    return activityData;
} catch (e) { return null; }
"#;

pub struct RuntimeState;

impl Strategy for RuntimeState {
    fn source(&self) -> Source { Source::RuntimeState }

    fn attempt(&self, page: &PageContext<'_>) -> RawFragment {
        match page.session.execute_script(RUNTIME_SCRIPT) {
            Ok(Value::Object(map)) => map,
            Ok(_) => RawFragment::new(),
            Err(e) => {
                logd!("activity {}: runtime state unavailable: {e}", page.activity_id);
                RawFragment::new()
            }
        }
    }
}
