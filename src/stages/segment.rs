use tracing::debug;

use crate::models::{Conversation, Speaker, Utterance};

/// Segmenter state carried from one line to the next
#[derive(Debug, Default)]
struct SegmenterState {
    /// Speaker whose utterance is being built, with its fragments so far
    current: Option<(Speaker, Vec<String>)>,
    /// Completed utterances
    utterances: Vec<Utterance>,
}

impl SegmenterState {
    /// Consume one stripped line
    fn step(mut self, line: &str) -> Self {
        match Speaker::from_tag_line(line) {
            Some(speaker) => {
                self.flush();
                // The tag statement always seeds the buffer, even when empty
                self.current = Some((speaker, vec![statement_after_tag(line).to_string()]));
            }
            None => {
                // Lines before the first tag have nowhere to go
                if let Some((_, fragments)) = self.current.as_mut() {
                    push_fragment(fragments, line);
                }
            }
        }
        self
    }

    /// Emit the in-progress utterance, one per speaker tag
    fn flush(&mut self) {
        if let Some((speaker, fragments)) = self.current.take() {
            if !fragments.is_empty() {
                self.utterances
                    .push(Utterance::new(speaker, join_fragments(&fragments)));
            }
        }
    }

    fn finish(mut self) -> Conversation {
        self.flush();
        Conversation::new(self.utterances)
    }
}

/// Blank continuation lines add nothing to the utterance
fn push_fragment(fragments: &mut Vec<String>, fragment: &str) {
    if !fragment.is_empty() {
        fragments.push(fragment.to_string());
    }
}

/// Join with single spaces; an empty tag statement leaves no stray space
fn join_fragments(fragments: &[String]) -> String {
    fragments
        .iter()
        .filter(|f| !f.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text following the speaker tag.
///
/// Splits on the last `]` so brackets inside the tag (timestamps, names) are
/// skipped, then drops the `:` separator used by `[Sales Agent]: ...` lines.
fn statement_after_tag(line: &str) -> &str {
    let rest = line.rsplit(']').next().unwrap_or(line).trim();
    rest.strip_prefix(':').map(str::trim).unwrap_or(rest)
}

/// Split a raw transcript into speaker-attributed utterances.
///
/// Returns an empty conversation when no speaker tag is found.
pub fn segment(raw_text: &str) -> Conversation {
    let normalized = raw_text.replace("\r\n", "\n");

    let conversation = normalized
        .trim()
        .split('\n')
        .map(str::trim)
        .fold(SegmenterState::default(), SegmenterState::step)
        .finish();

    debug!(
        "Segmented transcript into {} utterances ({} agent, {} customer)",
        conversation.len(),
        conversation.count_for(Speaker::Agent),
        conversation.count_for(Speaker::Customer)
    );

    conversation
}
