//! Rendering of image listings as a table or as JSON

use crate::error::Result;
use crate::image::RepositoryTags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json { OutputFormat::Json } else { OutputFormat::Table }
    }
}

pub struct ImageRenderer;

impl ImageRenderer {
    pub fn render(images: &[RepositoryTags], format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(images)?),
            OutputFormat::Table => Ok(Self::render_table(images)),
        }
    }

    /// One row per (repository, tag) pair
    pub fn rows(images: &[RepositoryTags]) -> Vec<(&str, &str)> {
        images
            .iter()
            .flat_map(|image| {
                image
                    .tags
                    .iter()
                    .map(move |tag| (image.name.as_str(), tag.as_str()))
            })
            .collect()
    }

    fn render_table(images: &[RepositoryTags]) -> String {
        const REPOSITORY: &str = "REPOSITORY";
        const TAG: &str = "TAG";

        let rows = Self::rows(images);
        let width = rows
            .iter()
            .map(|(repository, _)| repository.chars().count())
            .chain(std::iter::once(REPOSITORY.len()))
            .max()
            .unwrap_or(REPOSITORY.len());

        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(format!("{:<width$}  {}", REPOSITORY, TAG, width = width));
        for (repository, tag) in rows {
            lines.push(format!("{:<width$}  {}", repository, tag, width = width));
        }
        lines.join("\n")
    }
}
