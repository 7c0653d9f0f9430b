const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Pull the JSON payload out of a model reply.
///
/// Prefers a ```json fenced block, then any ``` fenced block, else the whole
/// reply. An unterminated fence runs to the end of the text.
pub fn extract_json(response: &str) -> &str {
    if let Some(start) = response.find(JSON_FENCE) {
        return fenced_body(&response[start + JSON_FENCE.len()..]);
    }
    if let Some(start) = response.find(FENCE) {
        return fenced_body(&response[start + FENCE.len()..]);
    }
    response.trim()
}

fn fenced_body(rest: &str) -> &str {
    let end = rest.find(FENCE).unwrap_or(rest.len());
    rest[..end].trim()
}
