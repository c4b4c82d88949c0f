use crate::lexer::{CONSTANTS, KEYWORDS, Token, calculate_depth};
use logos::Logos;
use nu_ansi_term::{Color, Style};
use reedline::{StyledText, ValidationResult, Validator};

#[derive(Debug)]
struct PaletteItem<'a> {
    name: &'a str,
    fg: Color,
}

const PALETTE: &[PaletteItem] = &[
    PaletteItem { name: "", fg: Color::White },
    PaletteItem { name: "keyword", fg: Color::Magenta },
    PaletteItem { name: "constant", fg: Color::Cyan },
    PaletteItem { name: "number", fg: Color::Cyan },
    PaletteItem { name: "string", fg: Color::Green },
    PaletteItem { name: "comment", fg: Color::DarkGray },
    PaletteItem { name: "variable", fg: Color::Red },
    PaletteItem { name: "punctuation", fg: Color::White },
];

fn color_of(name: &str) -> Color {
    PALETTE
        .iter()
        .find(|item| item.name == name)
        .map_or(PALETTE[0].fg, |item| item.fg)
}

fn classify(token: Token, text: &str) -> &'static str {
    match token {
        Token::LineComment | Token::BlockComment => "comment",
        Token::StringDouble | Token::StringSingle | Token::Template => "string",
        Token::Number => "number",
        Token::Ident if KEYWORDS.contains(&text) => "keyword",
        Token::Ident if CONSTANTS.contains(&text) => "constant",
        Token::Ident => "variable",
        _ => "punctuation",
    }
}

/// Token-level JavaScript highlighting for the REPL.
pub struct Highlighter;

impl reedline::Highlighter for Highlighter {
    fn highlight(&self, line: &str, _: usize) -> StyledText {
        let mut output = StyledText::new();
        let plain = Style::new().fg(PALETTE[0].fg);
        let mut curr_end = 0;

        for (token, span) in Token::lexer(line).spanned() {
            if span.start > curr_end {
                output.push((plain, line[curr_end..span.start].to_string()));
            }
            let text = &line[span.clone()];
            let style = match token {
                Ok(token) => Style::new().fg(color_of(classify(token, text))),
                // Unterminated literals and stray characters.
                Err(()) => plain,
            };
            output.push((style, text.to_string()));
            curr_end = span.end;
        }

        if curr_end < line.len() {
            output.push((plain, line[curr_end..].to_string()));
        }

        output
    }
}

/// Keeps reading lines while brackets are open.
pub struct BracketValidator;

impl Validator for BracketValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        match calculate_depth(line) {
            Some(depth) if depth > 0 => ValidationResult::Incomplete,
            _ => ValidationResult::Complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reedline::Highlighter as _;

    #[test]
    fn test_highlight_preserves_text() {
        let line = "let s = 'a' + x; // done";
        let styled = Highlighter.highlight(line, 0);
        let joined: String = styled.buffer.iter().map(|(_, text)| text.as_str()).collect();
        assert_eq!(joined, line);
    }

    #[test]
    fn test_keyword_and_string_colors() {
        let styled = Highlighter.highlight("return 'x'", 0);
        let keyword = styled.buffer.iter().find(|(_, t)| t == "return").unwrap();
        let string = styled.buffer.iter().find(|(_, t)| t == "'x'").unwrap();
        assert_eq!(keyword.0.foreground, Some(Color::Magenta));
        assert_eq!(string.0.foreground, Some(Color::Green));
    }

    #[test]
    fn test_validator_waits_for_closing_brace() {
        assert!(matches!(
            BracketValidator.validate("function f() {"),
            ValidationResult::Incomplete
        ));
        assert!(matches!(
            BracketValidator.validate("function f() {\n  return 1;\n}"),
            ValidationResult::Complete
        ));
        assert!(matches!(
            BracketValidator.validate("'open"),
            ValidationResult::Complete
        ));
    }
}
