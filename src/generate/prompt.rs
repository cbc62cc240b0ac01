//! Prompt construction for blog generation.

use crate::storage::models::Tone;

/// Builds the generation prompt for a title.
///
/// The tone clause is only included for non-neutral tones.
pub fn build_prompt(title: &str, tone: Option<Tone>) -> String {
    let tone_clause = match tone {
        Some(tone) if tone != Tone::Neutral => {
            format!("Write in a {} tone.", tone.as_str().to_lowercase())
        }
        _ => String::new(),
    };

    format!(
        "You are an expert marketing copywriter and SEO specialist.\n\
         {tone_clause}\n\
         Generate a comprehensive blog article that is 600-800 words long.\n\
         Include:\n\
         - Captivating introduction\n\
         - Multiple sections with h2/h3 headings\n\
         - Bulleted lists where helpful\n\
         - Actionable insights and examples\n\
         - Conclusion with a call to action\n\n\
         Topic: {}\n\n\
         Return plain text that is readable as Markdown.",
        title.trim()
    )
}
