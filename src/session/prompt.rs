//! Priming texts derived from a topic and the response style

use crate::catalog::ConversationTopic;
use crate::preferences::Brevity;

/// System prompt combining the topic specialization with a brevity directive
pub fn build_system_prompt(topic: &ConversationTopic, brevity: Brevity) -> String {
    format!(
        "You are a specialist in the field of {}. {}. {}",
        topic.title,
        topic.instruction,
        brevity.directive()
    )
}

/// Text of the synthetic first turn in every history
pub fn acknowledgment(topic: &ConversationTopic) -> String {
    format!("Initialized as {} specialist.", topic.title)
}

/// What the UI shows right after priming
pub fn greeting(topic: &ConversationTopic) -> String {
    format!(
        "Hello! I'm your {} model. How can I help you today?",
        topic.title
    )
}
