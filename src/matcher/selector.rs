use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use serde::{Serialize, Serializer};
use super::tree::MatchSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch {
    pub ratio: f64,
    #[serde(serialize_with = "lossy_path")]
    pub right: PathBuf,
}

/// Matches at or above `min_ratio`, best first; equal ratios by right path.
pub fn select(matches: &MatchSet, min_ratio: f64) -> Vec<RankedMatch> {
    let mut selected: Vec<RankedMatch> = matches
        .iter()
        .filter(|(_, ratio)| **ratio >= min_ratio)
        .map(|(right, &ratio)| RankedMatch { ratio, right: right.clone() })
        .collect();

    selected.sort_by(|a, b| match b.ratio.total_cmp(&a.ratio) {
        Ordering::Equal => a.right.cmp(&b.right),
        other => other,
    });
    selected
}

/// The match to copy: the best one, or the worst still selected when
/// `least_matching` is set.
pub fn pick_copy_source(selected: &[RankedMatch], least_matching: bool) -> Option<&RankedMatch> {
    if least_matching {
        selected.last()
    } else {
        selected.first()
    }
}

/// Text block for one left file: its path, then one indented line per match.
pub fn format_text_block(left: &Path, selected: &[RankedMatch]) -> String {
    let mut block = format!("{}\n", left.display());
    for m in selected {
        block.push_str(&format!("  {:.4} {}\n", m.ratio, m.right.display()));
    }
    block
}

/// JSON Lines record for one left file.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport<'a> {
    #[serde(serialize_with = "lossy_path")]
    pub left: &'a Path,
    pub matches: &'a [RankedMatch],
    #[serde(serialize_with = "lossy_optional_path")]
    pub copied: Option<&'a Path>,
}

// Rescued trees carry undecodable names; JSON strings must be UTF-8
fn lossy_path<P: AsRef<Path>, S: Serializer>(path: &P, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.as_ref().to_string_lossy())
}

fn lossy_optional_path<S: Serializer>(path: &Option<&Path>, serializer: S) -> Result<S::Ok, S::Error> {
    match path {
        Some(p) => lossy_path(p, serializer),
        None => serializer.serialize_none(),
    }
}

impl MatchReport<'_> {
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
