// src/utils/html.rs

/// Clean author-supplied text (game titles and descriptions) with ammonia.
///
/// Whitelist-based: safe inline tags survive, `<script>` and friends are
/// removed together with their content, and event-handler attributes are
/// stripped. Surrounding whitespace is trimmed.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input.trim())
}
