//! Prompt assembly for the course tutor.

/// Reply the tutor gives when the notes do not cover a question.
pub const OFF_TOPIC_REPLY: &str = "I can only answer questions related to the course notes.";

/// Persona and ground rules sent ahead of every question.
pub const SYSTEM_PROMPT: &str = "\
You are the AI Tutor for this course.
Your Goal: Answer student questions accurately using ONLY the provided Course Context.
Rules:
1. Use a friendly, encouraging professional tone.
2. If the answer is found in the context, explain it clearly.
3. If the answer is NOT in the context, politely say: \"I can only answer questions related to the course notes.\"
4. Do NOT hallucinate information not present in the notes.
5. Keep answers concise unless a detailed explanation is requested.";

/// Full single-turn prompt: rules, then the notes, then the question.
#[must_use]
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "{SYSTEM_PROMPT}\n\nCOURSE CONTEXT:\n{}\n\nSTUDENT QUESTION: {}",
        context.trim(),
        question.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_orders_rules_context_question() {
        let prompt = build_prompt("  Hypervisors host VMs.\n", " What is a hypervisor? ");
        let rules = prompt.find("Rules:").unwrap();
        let context = prompt.find("COURSE CONTEXT:\nHypervisors host VMs.").unwrap();
        let question = prompt.find("STUDENT QUESTION: What is a hypervisor?").unwrap();
        assert!(rules < context && context < question);
        assert!(prompt.contains(OFF_TOPIC_REPLY));
    }
}
