pub fn classification_prompt(description: &str) -> String {
    // Keep the contract explicit:
    // - Closed category/priority vocabularies only.
    // - Bare JSON output, nothing else.
    format!(
        r#"You are a support ticket classification assistant. Analyze the following support ticket description and classify it into the appropriate category and priority.

Categories:
- billing: payments, invoices, refunds, subscriptions, pricing
- technical: bugs, errors, performance issues, features not working
- account: account access, login issues, password resets, profile settings, permissions
- general: general inquiries, questions, feature requests, feedback

Priority levels:
- low: minor issues, general questions, no immediate impact
- medium: moderate issues affecting some functionality, non-urgent
- high: significant issues affecting core functionality, needs prompt attention
- critical: system down, major security issues, complete service disruption, revenue impact

Ticket description:
{description}

Respond ONLY with a valid JSON object in this exact format (no additional text):
{{"category": "billing|technical|account|general", "priority": "low|medium|high|critical"}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_the_description_and_output_contract() {
        let prompt = classification_prompt("Password reset link expired");
        assert!(prompt.contains("Password reset link expired"));
        assert!(prompt.contains(r#"{"category": "billing|technical|account|general""#));
    }
}
