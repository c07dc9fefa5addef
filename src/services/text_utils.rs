use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

pub const WRAP_WIDTH: usize = 80;

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static BLOCK_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</(?:p|h1|h2|h3)\s*>").unwrap());
static DIV_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</div\s*>").unwrap());
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<li(?:\s[^>]*)?>").unwrap());
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Turns store HTML into plain text with newline-based layout.
pub fn clean_description(desc: &str) -> String {
    let desc = LINE_BREAK.replace_all(desc, "\n");
    let desc = BLOCK_END.replace_all(&desc, "\n\n");
    let desc = DIV_END.replace_all(&desc, "\n");
    let desc = LIST_ITEM.replace_all(&desc, "\n * ");

    let text = strip_markup(&desc);
    BLANK_RUN.replace_all(text.trim(), "\n\n").into_owned()
}

/// Keeps only text nodes, dropping every tag and the contents of script-like elements.
fn strip_markup(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    let mut text = String::with_capacity(fragment.len());

    for node in document.root_element().descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| matches!(el.name(), "script" | "style" | "template"))
        });

        if !hidden {
            text.push_str(chunk);
        }
    }

    text
}

/// Greedy word wrap that keeps existing line breaks and never splits a word.
pub fn wrap_text(text: &str) -> String {
    let mut lines = Vec::new();

    for line in text.split('\n') {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            lines.push(String::new());
            continue;
        };

        let mut current = first.to_string();
        let mut width = first.chars().count();

        for word in words {
            let word_width = word.chars().count();
            if width + 1 + word_width <= WRAP_WIDTH {
                current.push(' ');
                current.push_str(word);
                width += 1 + word_width;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
                width = word_width;
            }
        }

        lines.push(current);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_become_blank_line_separated() {
        assert_eq!(
            clean_description("<p>Hello</p><p>World</p>"),
            "Hello\n\nWorld"
        );
    }

    #[test]
    fn line_breaks_and_list_items() {
        assert_eq!(clean_description("One<br>Two<br />Three"), "One\nTwo\nThree");
        assert_eq!(
            clean_description("<ul class=\"bb_ul\"><li>Fast</li><li>Fun</li></ul>"),
            "* Fast\n * Fun"
        );
    }

    #[test]
    fn long_newline_runs_collapse_to_two() {
        assert_eq!(
            clean_description("<h2>Title</h2><br><br><br>Body"),
            "Title\n\nBody"
        );
    }

    #[test]
    fn unknown_markup_and_scripts_are_removed() {
        assert_eq!(
            clean_description("Hi<script>alert(1)</script> <img src=\"x.png\"><b>there</b>"),
            "Hi there"
        );
        assert_eq!(clean_description("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(clean_description("   "), "");
    }

    #[test]
    fn short_lines_are_unchanged() {
        let line = "A short line that fits easily.";
        assert_eq!(wrap_text(line), line);

        let exact = "x".repeat(WRAP_WIDTH);
        assert_eq!(wrap_text(&exact), exact);
    }

    #[test]
    fn long_word_is_never_split() {
        let token = "y".repeat(200);
        assert_eq!(wrap_text(&token), token);
        assert_eq!(wrap_text(&format!("a {token} b")), format!("a\n{token}\nb"));
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let text = ["word"; 30].join(" ");
        let wrapped = wrap_text(&text);

        for line in wrapped.lines() {
            assert!(line.chars().count() <= WRAP_WIDTH);
        }
        assert_eq!(wrapped.split_whitespace().count(), 30);
        assert_eq!(wrapped.lines().next().unwrap().chars().count(), 79);
    }

    #[test]
    fn blank_lines_are_preserved() {
        assert_eq!(wrap_text("first\n\n   \nsecond"), "first\n\n\nsecond");
        assert_eq!(wrap_text(""), "");
    }
}
