use super::{CommandContext, CommandHandler};
use crate::error::Result;
use async_trait::async_trait;

const DEFAULT_QUIZ_TOPIC: &str = "quantum optics";

/// The AI-backed tutoring commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorKind {
    Ask,
    Explain,
    Derive,
    Quiz,
}

impl TutorKind {
    pub fn all() -> &'static [TutorKind] {
        &[
            TutorKind::Ask,
            TutorKind::Explain,
            TutorKind::Derive,
            TutorKind::Quiz,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            TutorKind::Ask => "ask",
            TutorKind::Explain => "explain",
            TutorKind::Derive => "derive",
            TutorKind::Quiz => "quiz",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TutorKind::Ask => "Ask any quantum optics question",
            TutorKind::Explain => "Explain a quantum concept",
            TutorKind::Derive => "Derive a quantum formula",
            TutorKind::Quiz => "Generate practice questions [topic]",
        }
    }

    fn instructions(&self) -> &'static str {
        match self {
            TutorKind::Ask => "Provide detailed technical answer.",
            TutorKind::Explain => "Include mathematical formalism and practical applications.",
            TutorKind::Derive => "Show step-by-step derivation with explanations.",
            TutorKind::Quiz => "Format with A-D options. Include solutions at the end.",
        }
    }

    /// Reply used instead of a request when no arguments were given.
    fn missing_argument_reply(&self) -> Option<&'static str> {
        match self {
            TutorKind::Ask => Some("Please enter your question"),
            TutorKind::Explain => Some("Please specify a concept"),
            TutorKind::Derive => Some("Please specify a formula"),
            TutorKind::Quiz => None,
        }
    }

    /// The user prompt for `text` (the joined arguments).
    pub fn prompt(&self, text: &str) -> String {
        match self {
            TutorKind::Ask => text.to_string(),
            TutorKind::Explain => format!("Explain: {}", text),
            TutorKind::Derive => format!("Derive: {}", text),
            TutorKind::Quiz => {
                let topic = if text.is_empty() {
                    DEFAULT_QUIZ_TOPIC
                } else {
                    text
                };
                format!("Create 3 multiple choice questions about {}", topic)
            }
        }
    }
}

pub struct TutorCommand(pub TutorKind);

#[async_trait(?Send)]
impl CommandHandler for TutorCommand {
    async fn execute(&self, ctx: &mut CommandContext<'_>, args: Vec<String>) -> Result<String> {
        let kind = self.0;
        if args.is_empty() {
            if let Some(reply) = kind.missing_argument_reply() {
                return Ok(reply.to_string());
            }
        }

        let prompt = kind.prompt(&args.join(" "));
        tracing::debug!(command = kind.name(), %prompt, "asking tutor");
        Ok(ctx.services.ai.complete(&prompt, kind.instructions()).await)
    }
}
