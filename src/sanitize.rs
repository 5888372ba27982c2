// Markup stripping for submitted content.
//
// Submissions arrive as HTML-ish text. The moderation API wants plain
// text, and a submission that is nothing but markup carries nothing worth
// moderating.

use std::sync::OnceLock;

use regex_lite::Regex;

fn script_style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Drop script and style elements along with their contents.
        Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").unwrap()
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Strip all markup from text: script/style elements go with their
/// contents, every other tag loses just its brackets, and the result is
/// trimmed. A markup-only input comes back empty.
pub fn strip_markup(text: &str) -> String {
    let without_blocks = script_style_re().replace_all(text, "");
    let without_tags = tag_re().replace_all(&without_blocks, "");
    without_tags.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(strip_markup("hello world"), "hello world");
    }

    #[test]
    fn tags_are_removed_content_kept() {
        assert_eq!(
            strip_markup("<p>hello <b>world</b></p>"),
            "hello world"
        );
    }

    #[test]
    fn script_contents_are_dropped() {
        assert_eq!(
            strip_markup("before<script>alert('x')</script>after"),
            "beforeafter"
        );
    }

    #[test]
    fn style_contents_are_dropped_case_insensitive() {
        assert_eq!(
            strip_markup("a<STYLE>p { color: red }</STYLE>b"),
            "ab"
        );
    }

    #[test]
    fn script_spanning_lines_is_dropped() {
        let input = "keep\n<script type=\"text/javascript\">\nvar x = 1;\n</script>\nthis";
        assert_eq!(strip_markup(input), "keep\n\nthis");
    }

    #[test]
    fn markup_only_input_is_empty() {
        assert_eq!(strip_markup("<p><br/></p>"), "");
        assert_eq!(strip_markup("<script>spam()</script>"), "");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(strip_markup("  <p> hi </p>  "), "hi");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(strip_markup(""), "");
    }
}
