// Shared prompt fragments. Each feature that prompts the model keeps its own
// prompts.rs alongside it and reuses these.

/// Closing instruction that asks for a bare JSON object.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
