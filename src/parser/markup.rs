/// Replace every `<...>` run with a single space, shortest match first.
///
/// A tag never spans a newline: a `<` whose closing `>` would only be
/// reached across a line break is kept as text, as is a `<` with no
/// closing `>` at all.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut open: Option<usize> = None;

    for (i, c) in input.char_indices() {
        match (open, c) {
            (None, '<') => open = Some(i),
            (None, _) => out.push(c),
            (Some(_), '>') => {
                out.push(' ');
                open = None;
            }
            (Some(start), '\n') => {
                out.push_str(&input[start..=i]);
                open = None;
            }
            (Some(_), _) => {}
        }
    }

    if let Some(start) = open {
        out.push_str(&input[start..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_simple_tags() {
        assert_eq!(strip_tags("<p>Build <b>models</b></p>"), " Build  models  ");
    }

    #[test]
    fn shortest_match() {
        // non-greedy: text between two tags survives
        assert_eq!(strip_tags("<a>keep</a>"), " keep ");
        // a second '<' before the first '>' belongs to the same tag
        assert_eq!(strip_tags("x<a<b>y"), "x y");
    }

    #[test]
    fn unterminated_open_is_kept() {
        assert_eq!(strip_tags("salary < 100k"), "salary < 100k");
        assert_eq!(strip_tags("a > b"), "a > b");
    }

    #[test]
    fn no_tag_across_newline() {
        assert_eq!(strip_tags("<a\n<b>c"), "<a\n c");
    }

    #[test]
    fn plain_text_untouched() {
        let s = "Ünïcode text — no tags at all";
        assert_eq!(strip_tags(s), s);
    }

    #[test]
    fn idempotent() {
        let samples = [
            "<div><ul><li>Python</li><li>SQL</li></ul></div>",
            "keep < this\n<br>and <that",
            "<<>>",
            "x<a<b>y > z",
        ];
        for s in samples {
            let once = strip_tags(s);
            assert_eq!(strip_tags(&once), once, "input: {s:?}");
        }
    }
}
