use super::*;

#[test]
fn escapes_markup_characters() {
    assert_eq!(
        escape_html(r#"<a href="x">&'"#),
        "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
    );
}

#[test]
fn bold_and_code_spans_translate() {
    assert_eq!(
        inline_markup("Run **now** with `cargo <x>`"),
        "Run <strong>now</strong> with <code>cargo &lt;x&gt;</code>"
    );
}

#[test]
fn code_inside_bold_is_translated() {
    assert_eq!(
        inline_markup("**use `x`**"),
        "<strong>use <code>x</code></strong>"
    );
}

#[test]
fn unterminated_markers_stay_literal() {
    assert_eq!(inline_markup("a ** b"), "a ** b");
    assert_eq!(inline_markup("a ` b"), "a ` b");
    assert_eq!(inline_markup("****"), "****");
}

#[test]
fn other_markdown_is_not_interpreted() {
    assert_eq!(inline_markup("_x_ [l](u) #h"), "_x_ [l](u) #h");
}

#[test]
fn multiline_titles_use_breaks() {
    assert_eq!(multiline_markup("Line one\nLine **two**"), "Line one<br>Line <strong>two</strong>");
}
