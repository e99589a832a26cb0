//! Request assembly for the built-in features
//!
//! Both features produce a plain `ChatMessage` list; model choice and
//! credentials are resolved later by the gateway from the profile.

use crate::profiles::Profile;
use crate::types::ChatMessage;

pub const FORM_FILLER_SYSTEM_PROMPT: &str =
    "You are a browser extension that helps the user fill in a form.";

pub const NO_QUOTES_INSTRUCTION: &str = "Do not wrap your response in quotes.";

/// Messages for summarizing a page with the profile's prompt template
pub fn summarize_messages(profile: &Profile, content: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(profile.system_message.as_str()),
        ChatMessage::user(format!(
            "Instructions: {}\n\nWeb page contents: {}",
            profile.custom_prompts, content
        )),
    ]
}

/// Messages for filling a form field from `prompt`, with optional page text
pub fn fill_form_messages(prompt: &str, extra: Option<&str>) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(FORM_FILLER_SYSTEM_PROMPT)];

    if let Some(extra) = extra.filter(|e| !e.is_empty()) {
        messages.push(ChatMessage::user(format!(
            "For context, the page contains the following text: {}",
            extra
        )));
    }

    messages.push(ChatMessage::user(NO_QUOTES_INSTRUCTION));
    messages.push(ChatMessage::user(prompt));
    messages
}
