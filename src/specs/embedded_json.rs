// src/specs/embedded_json.rs
// Modern page generation: the whole page state is serialized into a JSON
// script block, and the activity sits at props.pageProps.activity.
use scraper::Html;
use serde_json::Value;

use super::{PageContext, Source, Strategy};
use crate::config::consts::NEXT_DATA_ID;
use crate::core::html::{select_all, select_first};
use crate::core::sanitize::strip_junk_prefix;
use crate::record::RawFragment;

const ACTIVITY_POINTER: &str = "/props/pageProps/activity";

pub struct EmbeddedJson;

impl Strategy for EmbeddedJson {
    fn source(&self) -> Source { Source::EmbeddedJson }

    fn attempt(&self, page: &PageContext<'_>) -> RawFragment {
        match find_page_data(page.doc) {
            Some(data) => activity_object(&data),
            None => RawFragment::new(),
        }
    }
}

/// Parsed page-state tree. Prefers the dedicated `__NEXT_DATA__` block
/// (junk marker stripped), then any JSON script that mentions both
/// `"pageProps"` and `"activity"`.
pub fn find_page_data(doc: &Html) -> Option<Value> {
    let css = join!("script#", NEXT_DATA_ID);
    if let Some(script) = select_first(doc, &css) {
        let raw: String = script.text().collect();
        if !raw.is_empty() {
            match serde_json::from_str(strip_junk_prefix(&raw)) {
                Ok(v) => return Some(v),
                Err(e) => logd!("{NEXT_DATA_ID} present but unparseable: {e}"),
            }
        }
    }

    select_all(doc, r#"script[type="application/json"]"#)
        .into_iter()
        .map(|script| script.text().collect::<String>())
        .filter(|raw| raw.contains(r#""pageProps""#) && raw.contains(r#""activity""#))
        .find_map(|raw| serde_json::from_str(&raw).ok())
}

pub fn activity_object(data: &Value) -> RawFragment {
    data.pointer(ACTIVITY_POINTER)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}
