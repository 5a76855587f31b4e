//! Provider-agnostic prompt construction.
//!
//! Every backend receives the same single text prompt: the topic, the numbered transcript
//! so far, the role of the speaker whose turn it is, and optional moderator instructions.
//! The builder is pure, so identical inputs always produce byte-identical prompts.
//!
//! ```rust
//! use duologue::prompt_builder::build_prompt;
//! use duologue::TranscriptEntry;
//!
//! let prompt = build_prompt(
//!     "Is Rust a good first language?",
//!     &[TranscriptEntry::new("Claude 3.5 Sonnet", "Yes, with caveats.")],
//!     "Gemini 1.5 Flash",
//!     Some("  Keep it under 100 words. "),
//! )
//! .unwrap();
//!
//! assert!(prompt.contains("1. Claude 3.5 Sonnet: Yes, with caveats."));
//! assert!(prompt.ends_with("Additional instructions: Keep it under 100 words."));
//! ```

use crate::duologue::error::DebateError;
use crate::duologue::transcript::TranscriptEntry;

/// Inputs of one prompt. Derived per turn, never stored.
#[derive(Clone, Debug)]
pub struct PromptRequest<'a> {
    pub topic: &'a str,
    pub transcript: &'a [TranscriptEntry],
    pub speaker_label: &'a str,
    pub extra_instructions: Option<&'a str>,
}

impl PromptRequest<'_> {
    pub fn build(&self) -> Result<String, DebateError> {
        build_prompt(
            self.topic,
            self.transcript,
            self.speaker_label,
            self.extra_instructions,
        )
    }
}

/// Render the prompt for `speaker_label`.
///
/// Fails with [`DebateError::InvalidInput`] when `topic` is empty or whitespace. The
/// "Conversation so far" block is omitted entirely for an empty transcript, and blank
/// `extra_instructions` are ignored.
pub fn build_prompt(
    topic: &str,
    transcript: &[TranscriptEntry],
    speaker_label: &str,
    extra_instructions: Option<&str>,
) -> Result<String, DebateError> {
    if topic.trim().is_empty() {
        return Err(DebateError::InvalidInput("Missing topic.".to_string()));
    }

    let mut prompt = format!("Topic: {}\n", topic);

    if !transcript.is_empty() {
        let lines: Vec<String> = transcript
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{}. {}: {}", i + 1, entry.speaker, entry.text))
            .collect();
        prompt.push_str("Conversation so far:\n");
        prompt.push_str(&lines.join("\n"));
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "Your role: {}. Respond thoughtfully to progress the discussion.",
        speaker_label
    ));

    if let Some(extra) = extra_instructions.map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str(&format!("\nAdditional instructions: {}", extra));
    }

    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_transcript_has_no_history_block() {
        let prompt = build_prompt("T", &[], "X", None).unwrap();
        assert_eq!(
            prompt,
            "Topic: T\nYour role: X. Respond thoughtfully to progress the discussion."
        );
    }

    #[test]
    fn history_is_numbered_from_one() {
        let history = vec![
            TranscriptEntry::new("A", "hi"),
            TranscriptEntry::new("B", "hello"),
        ];
        let prompt = build_prompt("T", &history, "X", None).unwrap();
        assert_eq!(
            prompt,
            "Topic: T\nConversation so far:\n1. A: hi\n2. B: hello\n\
             Your role: X. Respond thoughtfully to progress the discussion."
        );
    }

    #[test]
    fn same_inputs_give_same_prompt() {
        let history = vec![
            TranscriptEntry::new("Claude", "Cities need cars."),
            TranscriptEntry::human("What about buses?"),
            TranscriptEntry::new("Gemini", "Buses are cars, mostly."),
        ];
        let first = build_prompt("Ban cars?", &history, "Claude", Some("Stay civil.")).unwrap();
        let second = build_prompt("Ban cars?", &history, "Claude", Some("Stay civil.")).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("2. User: What about buses?"));
    }

    #[test]
    fn blank_extra_instructions_are_dropped() {
        let with_blank = build_prompt("T", &[], "X", Some("   \n")).unwrap();
        let without = build_prompt("T", &[], "X", None).unwrap();
        assert_eq!(with_blank, without);
    }

    #[test]
    fn extra_instructions_are_trimmed_and_appended() {
        let prompt = build_prompt("T", &[], "X", Some("  be brief  ")).unwrap();
        assert!(prompt.ends_with("discussion.\nAdditional instructions: be brief"));
    }

    #[test]
    fn empty_topic_is_rejected() {
        assert!(matches!(
            build_prompt("", &[], "X", None),
            Err(DebateError::InvalidInput(_))
        ));
        assert!(matches!(
            build_prompt("  ", &[], "X", None),
            Err(DebateError::InvalidInput(_))
        ));
    }

    #[test]
    fn prompt_request_matches_free_function() {
        let history = vec![TranscriptEntry::human("over to you")];
        let request = PromptRequest {
            topic: "Tabs or spaces",
            transcript: &history,
            speaker_label: "ChatGPT",
            extra_instructions: Some("cite sources"),
        };
        assert_eq!(
            request.build().unwrap(),
            build_prompt("Tabs or spaces", &history, "ChatGPT", Some("cite sources")).unwrap()
        );
    }
}
