use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{PipelineError, Result};
use super::model::StageMeta;

/// `identifier := head "-" digits "-" tail`, anchored on the first
/// `-<digits>-` run. `tail` is cut at the first `[` to form the label.
static STAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<head>.*?)-(?P<key>\d+)-(?P<tail>.*)$").expect("stage pattern is valid")
});

/// Parse a file identifier such as `Phase-03-Excavation[step2]` into its
/// sort key (`3`) and stage label (`Excavation`).
///
/// When the text after the stage number is empty (`Wall-3-[x]`) the text
/// before it is used as the label instead.
pub fn extract_stage(identifier: &str) -> Result<StageMeta> {
    let malformed = || PipelineError::MalformedIdentifier {
        identifier: identifier.to_string(),
    };

    let caps = STAGE_PATTERN.captures(identifier).ok_or_else(malformed)?;
    let sort_key = caps["key"].parse::<u32>().map_err(|_| malformed())?;

    let label = clean_label(&caps["tail"]);
    let stage_label = if label.is_empty() {
        clean_label(&caps["head"])
    } else {
        label
    };

    Ok(StageMeta {
        sort_key,
        stage_label,
    })
}

fn clean_label(text: &str) -> String {
    let before_bracket = text.split('[').next().unwrap_or("");
    before_bracket
        .trim_matches(|c: char| c == '-' || c.is_whitespace())
        .to_string()
}
