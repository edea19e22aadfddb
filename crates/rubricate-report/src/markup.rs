//! Math-markup conversion for question text.
//!
//! Datasets mark formulas with `{{MATHBLOCK}}..{{/MATHBLOCK}}` (display) and
//! `{{MATH}}..{{/MATH}}` (inline). They become `\[..\]` and `\(..\)`.

const BLOCK_OPEN: &str = "{{MATHBLOCK}}";
const BLOCK_CLOSE: &str = "{{/MATHBLOCK}}";
const INLINE_OPEN: &str = "{{MATH}}";
const INLINE_CLOSE: &str = "{{/MATH}}";

/// Replace both tag kinds. Unterminated tags are left as they are.
pub fn convert_math_tags(text: &str) -> String {
    let text = replace_pairs(text, BLOCK_OPEN, BLOCK_CLOSE, "\\[", "\\]", true);
    replace_pairs(&text, INLINE_OPEN, INLINE_CLOSE, "\\(", "\\)", false)
}

fn replace_pairs(
    text: &str,
    open: &str,
    close: &str,
    left: &str,
    right: &str,
    multiline: bool,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        let body_start = start + open.len();
        let Some(len) = rest[body_start..].find(close) else {
            break;
        };
        let body = &rest[body_start..body_start + len];
        if !multiline && body.contains('\n') {
            // inline math never spans lines; keep the opening tag verbatim
            out.push_str(&rest[..body_start]);
            rest = &rest[body_start..];
            continue;
        }
        out.push_str(&rest[..start]);
        out.push_str(left);
        out.push_str(body.trim());
        out.push_str(right);
        rest = &rest[body_start + len + close.len()..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_and_block() {
        assert_eq!(
            convert_math_tags("Solve {{MATH}} x^2 = 4 {{/MATH}} for x."),
            "Solve \\(x^2 = 4\\) for x."
        );
        assert_eq!(
            convert_math_tags("Area:\n{{MATHBLOCK}}\nA = \\pi r^2\n{{/MATHBLOCK}}"),
            "Area:\n\\[A = \\pi r^2\\]"
        );
    }

    #[test]
    fn several_tags() {
        assert_eq!(
            convert_math_tags("{{MATH}}a{{/MATH}} and {{MATH}}b{{/MATH}}"),
            "\\(a\\) and \\(b\\)"
        );
    }

    #[test]
    fn inline_does_not_span_lines() {
        let text = "{{MATH}}a\nb{{/MATH}}";
        assert_eq!(convert_math_tags(text), text);
    }

    #[test]
    fn unterminated_tags_untouched() {
        assert_eq!(convert_math_tags("x {{MATH}} y"), "x {{MATH}} y");
        assert_eq!(convert_math_tags("plain text"), "plain text");
    }
}
