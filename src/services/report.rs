use crate::domain::ItemRecord;
use crate::error::{BotError, Result};
use crate::services::text_utils::wrap_text;

pub const REPORT_FILENAME: &str = "report.csv";

const ROW_COUNT: usize = 17;

const HEADERS: [&str; ROW_COUNT] = [
    "ID",
    "Game Name",
    "About The Game",
    "Short Description",
    "Release Date",
    "Developer",
    "Publisher",
    "Review Description",
    "Positive Reviews",
    "Negative Reviews",
    "Total Reviews",
    "Platforms",
    "Features",
    "Genres",
    "Tags",
    "Controller Support",
    "Steam Deck Support",
];

/// Renders records as a transposed CSV table: one row per attribute, one column per app.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReport;

impl CsvReport {
    pub fn build(&self, records: &[ItemRecord]) -> Result<Vec<u8>> {
        if records.is_empty() {
            return Err(BotError::EmptyInput);
        }

        let columns: Vec<[String; ROW_COUNT]> = records.iter().map(column).collect();
        let mut writer = csv::Writer::from_writer(Vec::new());

        for (row, header) in HEADERS.iter().enumerate() {
            let cells = columns.iter().map(|cells| cells[row].as_str());
            writer.write_record(std::iter::once(*header).chain(cells))?;
        }

        writer.into_inner().map_err(|e| BotError::Io(e.into_error()))
    }
}

fn column(record: &ItemRecord) -> [String; ROW_COUNT] {
    [
        record.id.to_string(),
        record.name.clone(),
        wrap_text(&record.about_the_game),
        wrap_text(&record.short_description),
        record.release_date.clone(),
        record.developers.join("\n"),
        record.publishers.join("\n"),
        record.review.description.clone(),
        record.review.positive.to_string(),
        record.review.negative.to_string(),
        record.review.total.to_string(),
        record.platforms.join("; "),
        wrap_text(&record.features.join("; ")),
        wrap_text(&record.genres.join("; ")),
        wrap_text(&record.tags.join("; ")),
        record.controller_support.clone(),
        record.deck_compatibility.clone(),
    ]
}
