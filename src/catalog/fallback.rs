//! Built-in module list

use super::{ModuleId, ModuleInfo};

/// (title, description), in display order. Ids are the 1-based position.
const MODULES: [(&str, &str); 15] = [
    ("Active Listening", "Hearing what is meant, not only what is said"),
    ("Critical Thinking", "Questioning assumptions and weighing evidence"),
    ("Effective Communication", "Saying what you mean clearly and kindly"),
    ("Emotional Intelligence", "Recognizing and working with emotions"),
    ("Conflict Resolution", "Turning disagreement into understanding"),
    ("Problem Solving", "Breaking hard problems into answerable questions"),
    ("Decision Making", "Choosing well under uncertainty"),
    ("Time Management", "Deciding what matters and when"),
    ("Teamwork and Collaboration", "Working well with others toward shared goals"),
    ("Leadership Fundamentals", "Guiding people without commanding them"),
    ("Giving and Receiving Feedback", "Making feedback useful on both sides"),
    ("Public Speaking", "Organizing ideas for an audience"),
    ("Negotiation Skills", "Finding agreements both sides can accept"),
    ("Adaptability and Resilience", "Responding to change and setbacks"),
    ("Ethical Reasoning", "Examining what we ought to do and why"),
];

#[must_use]
pub fn fallback_modules() -> Vec<ModuleInfo> {
    (1u32..)
        .zip(MODULES)
        .map(|(id, (title, description))| ModuleInfo {
            id: ModuleId::from(id),
            title: title.to_string(),
            description: description.to_string(),
        })
        .collect()
}
