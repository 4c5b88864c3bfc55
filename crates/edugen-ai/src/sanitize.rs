//! Sanitization of model replies that should be raw JSON

/// Strip markdown code-fence decoration from a JSON reply.
///
/// Removes a leading fence (with or without a `json` tag) and a trailing
/// fence, then trims. An absent or empty reply becomes `{}`.
pub fn clean_json_response(text: Option<&str>) -> String {
    let mut body = text.unwrap_or_default().trim();

    if let Some(rest) = body.strip_prefix("```") {
        body = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }

    let body = body.trim();
    if body.is_empty() {
        "{}".to_string()
    } else {
        body.to_string()
    }
}
