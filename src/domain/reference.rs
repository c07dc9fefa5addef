use crate::error::{BotError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static APP_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"/app/([0-9]+)").unwrap());

/// Pulls the app id out of a single store link.
pub fn extract_id(line: &str) -> Result<u64> {
    let caps = APP_PATH
        .captures(line)
        .ok_or_else(|| BotError::MalformedReference(line.to_string()))?;

    caps[1]
        .parse::<u64>()
        .map_err(|_| BotError::MalformedReference(line.to_string()))
}

/// Ids found in a multi-line message, plus the lines that held no usable link.
#[derive(Debug, Default, PartialEq)]
pub struct ExtractedIds {
    pub ids: Vec<u64>,
    pub malformed: Vec<String>,
}

pub fn extract_ids(text: &str) -> ExtractedIds {
    let mut extracted = ExtractedIds::default();

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match extract_id(line) {
            Ok(id) => extracted.ids.push(id),
            Err(_) => extracted.malformed.push(line.to_string()),
        }
    }

    extracted
}
