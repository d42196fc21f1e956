//! Default values referenced by `#[serde(default = "...")]` attributes.

pub fn snapshot_lines() -> usize {
    400
}

pub fn max_references() -> usize {
    5
}

pub fn snippet_radius() -> usize {
    5
}

pub fn log_tail_chars() -> usize {
    12_000
}

pub fn llm_timeout_secs() -> u64 {
    30
}

pub fn openai_model() -> String {
    "gpt-4o-mini".to_string()
}

pub fn openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

pub fn gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}
