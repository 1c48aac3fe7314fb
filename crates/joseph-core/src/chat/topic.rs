//! Topic to instruction mapping.
//!
//! Every function here is pure: the same topic always yields the same text.

use joseph_types::topic::Topic;

const PERSONA: &str = "You are Joseph AI, an expert economic and business intelligence assistant.";

const GUIDANCE: &str = "Provide helpful, accurate, and contextual responses. \
Be professional but conversational. When data is provided, ground your \
analysis in it and call out the figures you rely on. If the user asks about \
something outside your expertise, politely redirect to relevant business topics. \
Remember the conversation history and build upon previous messages.";

const GENERAL_PREFIX: &str = "You are a general business assistant.";

/// Resolve a raw topic token to its instruction. Never fails.
pub fn resolve_instruction(token: &str) -> String {
    instruction_for(Topic::from_token(token))
}

/// Instruction text for a topic.
pub fn instruction_for(topic: Topic) -> String {
    match topic {
        Topic::General => format!(
            "{GENERAL_PREFIX} You help with {}.\n\n{GUIDANCE}",
            topic.description().to_lowercase()
        ),
        _ => format!(
            "{PERSONA}\n\nCurrent context: {}: {}.\n\n{GUIDANCE}",
            topic.display_name(),
            topic.description()
        ),
    }
}

/// Deterministic reply used when generation fails.
pub fn fallback_reply(topic: Topic) -> String {
    format!(
        "As Joseph AI, I'm here to help with {}.",
        topic.description().to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_token_resolves_to_general() {
        let text = resolve_instruction("foobar");
        assert!(text.starts_with("You are a general business assistant"));
        assert_eq!(text, instruction_for(Topic::General));
    }

    #[test]
    fn test_empty_token_resolves_to_general() {
        assert!(resolve_instruction("").starts_with("You are a general business assistant"));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        for topic in Topic::ALL {
            assert_eq!(
                resolve_instruction(topic.as_str()),
                resolve_instruction(topic.as_str())
            );
        }
    }

    #[test]
    fn test_known_topic_names_its_scope() {
        let text = resolve_instruction("revenue-strategy");
        assert!(text.starts_with(PERSONA));
        assert!(text.contains("Revenue optimization and growth strategies"));
    }

    #[test]
    fn test_fallback_reply_per_topic() {
        assert_eq!(
            fallback_reply(Topic::RevenueStrategy),
            "As Joseph AI, I'm here to help with revenue optimization and growth strategies."
        );
        assert_eq!(
            fallback_reply(Topic::General),
            "As Joseph AI, I'm here to help with general business and economic analysis."
        );
    }

    #[test]
    fn test_every_topic_has_distinct_instruction() {
        let mut seen = std::collections::HashSet::new();
        for topic in Topic::ALL {
            assert!(seen.insert(instruction_for(topic)));
        }
    }
}
