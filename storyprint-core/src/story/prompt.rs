//! Prompts sent to the text and image generation services

use crate::story::request::StoryRequest;

/// User message accompanying the story prompt
pub const STORY_USER_MESSAGE: &str = "Write the story.";

/// Narrator used in portraits when no extra details were given
const DEFAULT_COMMUNITY: &str = "local community";

/// Build the system prompt asking for a first-person time travel story told
/// by a local teenager meeting Sofie and the student.
pub fn story_prompt(request: &StoryRequest) -> String {
    let details = match request.extra_details.as_deref() {
        Some(details) if !details.trim().is_empty() => {
            format!(" The narrator is {}.", details.trim())
        }
        _ => " Choose the narrator's ethnicity and social class yourself, as fits the time and place."
            .to_string(),
    };

    format!(
        "You are a teenager living in {location} on {date}.{details} \
         Greet Sofie and {name}, two visitors who have travelled back in time, by name in your first line, \
         then introduce yourself with your name and age. \
         Write a story of 500 to 600 words in the first person, as if you were telling it yourself, \
         for readers aged 16 to 18. Show them your everyday life: food, clothing, work, family, school \
         (only where realistic), leisure, beliefs and the local surroundings as they were at that exact \
         time and place.\n\n\
         The story should contain a little drama or suspense, and the visitors should have at least \
         one moment where they say \"wow\". Use concrete, sensory historical details and avoid anything \
         that did not exist yet. Keep the voice young, direct and honest; avoid heavy poetry and long \
         metaphors. End with a few wise or inspiring words for the reader to think about, and finally \
         thank the visitors for coming.\n\n\
         Rules: Sofie only observes and never speaks. Do not explain, summarize or announce the story; \
         go straight into the first line. Never mention modern schools or other modern institutions.",
        location = request.location.trim(),
        date = request.date.trim(),
        name = request.name.trim(),
    )
}

/// Build the image prompt for a portrait of the narrator
pub fn portrait_prompt(request: &StoryRequest) -> String {
    let community = request
        .extra_details
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_COMMUNITY);

    let year = match request.year() {
        Some(year) => year.to_string(),
        None => request.date.trim().to_string(),
    };

    format!(
        "Portrait of a teenage girl from {community} in {location} in the year {year}, \
         realistic style, detailed, standing in historical setting",
        location = request.location.trim(),
    )
}
