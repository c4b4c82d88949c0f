use logos::Logos;

/// A coarse JavaScript tokenizer, good enough for bracket matching and
/// highlighting. The engine does the real parsing.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    StringDouble,

    #[regex(r#"'(?:[^'\\\n]|\\.)*'"#)]
    StringSingle,

    #[regex(r"`(?:[^`\\]|\\.)*`")]
    Template,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?n?")]
    #[regex(r"0[xXoObB][0-9a-fA-F_]+n?")]
    Number,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    #[token("/")]
    Slash,

    #[regex(r#"[^ \t\r\n\f\{\}\[\]\(\)"'`A-Za-z0-9_$/]+"#)]
    Punct,
}

/// Extend a `/*` token through the closing `*/`; unterminated comments are errors.
fn block_comment(lex: &mut logos::Lexer<Token>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

pub const KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "finally", "for", "function", "if",
    "import", "in", "instanceof", "let", "new", "of", "return", "static", "super", "switch",
    "this", "throw", "try", "typeof", "var", "void", "while", "with", "yield",
];

pub const CONSTANTS: &[&str] = &["true", "false", "null", "undefined", "NaN", "Infinity"];

/// Net bracket depth of `buffer`.
///
/// Returns `None` when the buffer contains something the tokenizer cannot
/// match, such as an unterminated string; the engine reports those.
pub fn calculate_depth(buffer: &str) -> Option<usize> {
    let mut depth: isize = 0;

    for token_res in Token::lexer(buffer) {
        match token_res {
            Ok(Token::LBrace) | Ok(Token::LBracket) | Ok(Token::LParen) => depth += 1,
            Ok(Token::RBrace) | Ok(Token::RBracket) | Ok(Token::RParen) => depth -= 1,
            Ok(_) => {}
            Err(_) => return None,
        }
    }

    Some(depth.max(0) as usize)
}
