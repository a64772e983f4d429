//! ChatGPT source normalization
//!
//! ChatGPT copies use `[...]` blocks for display math and `(...)` for inline
//! math instead of the `$$...$$` / `$...$` delimiters the Markdown math
//! extension expects. This pass rewrites both forms, leaving everything that
//! is already valid untouched (re-running on clean input is a no-op).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Display math between `[` and `]` on separate lines.
    static ref BRACKET_BLOCK: Regex =
        Regex::new(r"\[\s*\n([^\]]+?)\n\s*\]").unwrap();

    /// Single-line `[formula]` on its own line.
    static ref BRACKET_LINE: Regex =
        Regex::new(r"(?m)^\[([^\]\n]+)\]$").unwrap();

    /// Math-significant characters used to decide whether a bracket line is
    /// really a formula.
    static ref MATH_CHARS: Regex = Regex::new(r"[\^_{}=+\-*/]").unwrap();

    /// Inline math wrapped in parentheses: `(\frac{...})`.
    static ref PAREN_MATH: Regex =
        Regex::new(r"\(\\([a-zA-Z]+)(\{[^)]+)\)").unwrap();

    /// An existing display math block, which must be left untouched.
    static ref DISPLAY_BLOCK: Regex = Regex::new(r"(?s)\$\$.*?\$\$").unwrap();
}

/// Rewrite ChatGPT math notation to standard Markdown math delimiters.
pub fn preprocess_chatgpt(markdown: &str) -> String {
    // Display math blocks first, before any inline processing.
    let processed = BRACKET_BLOCK.replace_all(markdown, |caps: &regex::Captures| {
        format!("$${}$$", caps[1].trim())
    });

    let processed = BRACKET_LINE.replace_all(&processed, |caps: &regex::Captures| {
        let formula = &caps[1];
        if formula.contains('\\') || MATH_CHARS.is_match(formula) {
            format!("$${}$$", formula.trim())
        } else {
            caps[0].to_string()
        }
    });

    // Inline math only outside of existing $$ blocks.
    map_outside_display_math(&processed, convert_paren_math)
}

/// Apply `f` to the segments between `$$...$$` blocks, keeping the blocks
/// themselves verbatim.
fn map_outside_display_math(text: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for block in DISPLAY_BLOCK.find_iter(text) {
        out.push_str(&f(&text[last..block.start()]));
        out.push_str(block.as_str());
        last = block.end();
    }
    out.push_str(&f(&text[last..]));
    out
}

/// Convert `(\command{...})` to `$\command{...}$`, skipping matches that sit
/// in front of an unopened `]` (they belong to a bracket construct that the
/// display pass intentionally left alone).
fn convert_paren_math(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in PAREN_MATH.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        let after = &text[whole.end()..];
        let closes_bracket = match (after.find('['), after.find(']')) {
            (_, None) => false,
            (Some(open), Some(close)) => close < open,
            (None, Some(_)) => true,
        };
        if closes_bracket {
            continue;
        }
        out.push_str(&text[last..whole.start()]);
        out.push_str(&format!("$\\{}{}$", &caps[1], &caps[2]));
        last = whole.end();
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiline_bracket_block_becomes_display_math() {
        let input = "Result:\n[\n\\frac{4500}{3} = \\frac{x}{7}\n]\nDone.";
        let output = preprocess_chatgpt(input);
        assert!(output.contains("$$\\frac{4500}{3} = \\frac{x}{7}$$"));
        assert!(!output.contains("[\n"));
    }

    #[test]
    fn test_single_line_bracket_formula() {
        let output = preprocess_chatgpt("[x^2 + y^2 = z^2]");
        assert_eq!(output, "$$x^2 + y^2 = z^2$$");
    }

    #[test]
    fn test_single_line_bracket_prose_kept() {
        let output = preprocess_chatgpt("[see note]");
        assert_eq!(output, "[see note]");
    }

    #[test]
    fn test_paren_inline_math() {
        let output = preprocess_chatgpt(r"The value (\frac{1}{2}) is half.");
        assert!(output.contains(r"$\frac{1}{2}$"));
    }

    #[test]
    fn test_existing_display_math_untouched() {
        let input = "$$(\\frac{1}{2})$$";
        assert_eq!(preprocess_chatgpt(input), input);
    }

    #[test]
    fn test_idempotent_on_clean_input() {
        let clean = "# Title\n\n$$E=mc^2$$\n\nInline $x+y$ math.\n";
        assert_eq!(preprocess_chatgpt(clean), clean);

        let once = preprocess_chatgpt("[\nx^2\n]");
        assert_eq!(preprocess_chatgpt(&once), once);
    }
}
