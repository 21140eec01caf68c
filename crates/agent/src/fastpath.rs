//! Fast-path responder: templated replies that bypass the model.
//!
//! Matchers are evaluated in a fixed order and the first match wins:
//! memory commands, history recaps, greetings, gratitude, small talk.
//! All matching is case-insensitive on the trimmed input. Fast-path
//! replies never touch the response cache.

use chrono::Timelike;
use gigmate_core::{AgentResponse, UserContext};
use rand::Rng;

/// Uniform choice over an enumerated set, injectable for deterministic
/// tests.
pub trait PhrasePicker: Send + Sync {
    /// Pick an index in `0..len`. `len` is always at least 1.
    fn pick(&self, len: usize) -> usize;
}

/// The production picker: uniform random choice.
pub struct RandomPicker;

impl PhrasePicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// A picker that always returns the same index. Test support.
pub struct FixedPicker(pub usize);

impl PhrasePicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len - 1)
    }
}

/// What a matched fast path wants the orchestrator to do.
pub enum FastPathReply {
    /// Clear the session and response cache, then answer with this reply.
    ClearMemory(AgentResponse),

    /// Answer with this reply as-is.
    Reply(AgentResponse),
}

const MEMORY_COMMANDS: &[&str] = &["clear chat", "clear history", "reset conversation"];

const RECAP_PHRASES: &[&str] = &[
    "what did we talk about",
    "what have we discussed",
    "summarize our conversation",
    "conversation summary",
    "chat history",
];

const GREETING_PREFIXES: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

const GRATITUDE_PHRASES: &[&str] = &["thank you", "thanks", "thx", "appreciate it"];

const GRATITUDE_ACKS: &[&str] = &[
    "You're welcome! Let me know if there's anything else you need.",
    "Happy to help! Anything else I can do for you?",
    "Anytime! Just ask if something else comes up.",
    "Glad I could help!",
];

pub struct FastPathResponder {
    picker: Box<dyn PhrasePicker>,
    hour_override: Option<u32>,
}

impl FastPathResponder {
    pub fn new(picker: Box<dyn PhrasePicker>) -> Self {
        Self {
            picker,
            hour_override: None,
        }
    }

    /// Pin the hour used for salutations (test support).
    pub fn with_hour(mut self, hour: u32) -> Self {
        self.hour_override = Some(hour);
        self
    }

    fn hour(&self) -> u32 {
        self.hour_override
            .unwrap_or_else(|| chrono::Local::now().hour())
    }

    fn salutation(&self) -> &'static str {
        match self.hour() {
            5..=11 => "Good morning",
            12..=17 => "Good afternoon",
            _ => "Good evening",
        }
    }

    /// Evaluate the ordered matchers against one input. `transcript` is the
    /// rendered recent history for the recap path; `None` result means the
    /// input goes on to the intent pipeline.
    pub fn evaluate(
        &self,
        input: &str,
        context: &UserContext,
        transcript: &str,
    ) -> Option<FastPathReply> {
        let normalized = input.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        // 1. Memory commands
        if MEMORY_COMMANDS.iter().any(|c| normalized.contains(c)) {
            let response = AgentResponse::success(
                "Done! I've cleared our conversation history. What would you like to talk about next?",
            );
            return Some(FastPathReply::ClearMemory(response));
        }

        // 2. History recap
        if RECAP_PHRASES.iter().any(|p| normalized.contains(p)) {
            let message = if transcript.is_empty() {
                "We haven't talked about anything yet in this conversation. Ask me anything!"
                    .to_string()
            } else {
                format!("Here's what we've covered recently:\n\n{transcript}")
            };
            return Some(FastPathReply::Reply(AgentResponse::success(message)));
        }

        // 3. Greetings
        if GREETING_PREFIXES.iter().any(|g| {
            normalized == *g
                || normalized.starts_with(&format!("{g} "))
                || normalized.starts_with(&format!("{g},"))
                || normalized.starts_with(&format!("{g}!"))
        }) {
            let salutation = self.salutation();
            let who = match &context.name {
                Some(name) => format!("{salutation}, {name}!"),
                None => format!("{salutation}!"),
            };
            let message = format!(
                "{who} I'm Gigmate, your marketplace assistant. How can I help you today?"
            );
            return Some(FastPathReply::Reply(
                AgentResponse::success(message).with_suggestions([
                    "Search for new jobs",
                    "Check your proposal status",
                    "Review your payments",
                ]),
            ));
        }

        // 4. Gratitude
        if GRATITUDE_PHRASES.iter().any(|p| normalized.contains(p)) {
            let ack = GRATITUDE_ACKS[self.picker.pick(GRATITUDE_ACKS.len())];
            return Some(FastPathReply::Reply(AgentResponse::success(ack)));
        }

        // 5. Small talk
        if normalized.contains("how are you") {
            return Some(FastPathReply::Reply(
                AgentResponse::success(
                    "I'm doing great and ready to help you get things done on the marketplace!",
                )
                .with_suggestions(["Search for jobs", "Check your proposals"]),
            ));
        }
        if normalized.contains("who are you") || normalized.contains("what are you") {
            return Some(FastPathReply::Reply(
                AgentResponse::success(
                    "I'm Gigmate, an assistant for your freelance marketplace account. \
                     I can look things up and take actions on your behalf.",
                )
                .with_suggestions(["See what I can do", "Search for jobs"]),
            ));
        }
        if normalized.contains("what can you do") || normalized.contains("help me with") {
            return Some(FastPathReply::Reply(
                AgentResponse::success(
                    "I can search jobs, track your proposals, summarize your payments, \
                     and send messages to other users.",
                )
                .with_suggestions(["Search for jobs", "Review your payments"]),
            ));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responder() -> FastPathResponder {
        FastPathResponder::new(Box::new(FixedPicker(0))).with_hour(9)
    }

    fn context() -> UserContext {
        UserContext::minimal("u1")
    }

    #[test]
    fn memory_command_requests_clear() {
        let reply = responder().evaluate("Clear chat please", &context(), "");
        assert!(matches!(reply, Some(FastPathReply::ClearMemory(_))));
    }

    #[test]
    fn recap_with_empty_history() {
        let reply = responder().evaluate("what did we talk about?", &context(), "");
        match reply {
            Some(FastPathReply::Reply(r)) => assert!(r.message.contains("haven't talked")),
            _ => panic!("expected recap reply"),
        }
    }

    #[test]
    fn recap_embeds_transcript() {
        let transcript = "User: find jobs\nAssistant: I found 2 jobs.";
        let reply = responder().evaluate("summarize our conversation", &context(), transcript);
        match reply {
            Some(FastPathReply::Reply(r)) => assert!(r.message.contains("find jobs")),
            _ => panic!("expected recap reply"),
        }
    }

    #[test]
    fn greeting_has_salutation_and_three_suggestions() {
        let reply = responder().evaluate("hello", &context(), "");
        match reply {
            Some(FastPathReply::Reply(r)) => {
                assert!(r.message.starts_with("Good morning"));
                assert!(r.success);
                assert_eq!(r.suggestions.len(), 3);
                assert!(r.capability_used.is_none());
            }
            _ => panic!("expected greeting reply"),
        }
    }

    #[test]
    fn greeting_personalized_when_name_known() {
        let mut ctx = context();
        ctx.name = Some("Jordan".into());
        let reply = responder().evaluate("hey there", &ctx, "");
        match reply {
            Some(FastPathReply::Reply(r)) => assert!(r.message.contains("Jordan")),
            _ => panic!("expected greeting reply"),
        }
    }

    #[test]
    fn salutation_follows_the_clock() {
        let evening = FastPathResponder::new(Box::new(FixedPicker(0))).with_hour(21);
        match evening.evaluate("hi", &context(), "") {
            Some(FastPathReply::Reply(r)) => assert!(r.message.starts_with("Good evening")),
            _ => panic!("expected greeting reply"),
        }
    }

    #[test]
    fn gratitude_uses_picker() {
        let second = FastPathResponder::new(Box::new(FixedPicker(1))).with_hour(9);
        match second.evaluate("thanks a lot", &context(), "") {
            Some(FastPathReply::Reply(r)) => assert_eq!(r.message, GRATITUDE_ACKS[1]),
            _ => panic!("expected gratitude reply"),
        }
    }

    #[test]
    fn small_talk_has_two_suggestions() {
        match responder().evaluate("what can you do?", &context(), "") {
            Some(FastPathReply::Reply(r)) => {
                assert_eq!(r.suggestions.len(), 2);
                assert!(r.message.contains("search jobs"));
            }
            _ => panic!("expected small-talk reply"),
        }
    }

    #[test]
    fn memory_command_wins_over_later_matchers() {
        // "clear history" also contains no greeting, but ordering matters
        // when phrases overlap: "thanks, clear chat" must clear.
        let reply = responder().evaluate("thanks, clear chat", &context(), "");
        assert!(matches!(reply, Some(FastPathReply::ClearMemory(_))));
    }

    #[test]
    fn capability_requests_fall_through() {
        assert!(responder()
            .evaluate("find me rust jobs under $5000", &context(), "")
            .is_none());
        assert!(responder().evaluate("", &context(), "").is_none());
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(responder().evaluate("HELLO", &context(), "").is_some());
        assert!(responder().evaluate("  Thank You!  ", &context(), "").is_some());
    }
}
