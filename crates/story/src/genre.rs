use std::str::FromStr;

use strum::{Display, EnumString, VariantNames};

use crate::error::{Result, StoryError};

/// Story genres the client offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(ascii_case_insensitive)]
pub enum Genre {
    Fantasy,
    #[strum(to_string = "Sci-Fi")]
    SciFi,
    Romance,
    Mystery,
    Horror,
}

impl Genre {
    /// Parse an optional genre field; blank means no genre
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>> {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };

        Self::from_str(value).map(Some).map_err(|_| {
            StoryError::Validation(format!(
                "Unknown genre '{value}', expected one of: {}",
                Self::VARIANTS.join(", ")
            ))
        })
    }
}

/// Prompt sent upstream for a user prompt and optional genre
pub fn compose_prompt(prompt: &str, genre: Option<Genre>) -> String {
    match genre {
        Some(genre) => format!("Write a short {genre} story about: {prompt}"),
        None => prompt.to_string(),
    }
}
