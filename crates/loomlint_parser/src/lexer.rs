//! Tokenizer for the script parser.
//!
//! Built on `logos`. Whitespace and comments are skipped; line breaks are
//! recovered afterwards from the gaps between tokens, which is all automatic
//! semicolon insertion needs.

use logos::{FilterResult, Logos};
use loomlint_ast::{Span, Token, TokenKind, is_line_terminator};

use crate::{LanguageOptions, ParseError, syntax_error};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\u{000B}\u{000C}\u{00A0}\u{FEFF}\u{2028}\u{2029}]+")]
#[logos(skip r"//[^\n\r\u{2028}\u{2029}]*")]
enum RawToken {
    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Word,

    #[regex(r"0[xX][0-9a-fA-F]+(_[0-9a-fA-F]+)*")]
    #[regex(r"0[oO][0-7]+(_[0-7]+)*")]
    #[regex(r"0[bB][01]+(_[01]+)*")]
    #[regex(r"[0-9]+(_[0-9]+)*(\.([0-9]+(_[0-9]+)*)?)?([eE][+-]?[0-9]+(_[0-9]+)*)?")]
    #[regex(r"\.[0-9]+(_[0-9]+)*([eE][+-]?[0-9]+(_[0-9]+)*)?")]
    Number,

    #[regex(r#""([^"\\\n\r]|\\[^\r\n]|\\\r?\n)*""#)]
    #[regex(r#"'([^'\\\n\r]|\\[^\r\n]|\\\r?\n)*'"#)]
    String,

    #[regex(r"[{}()\[\];,~:]")]
    #[regex(r"\.|\.\.\.|\?|\?\?|\?\?=|=>")]
    #[regex(r"[<>=!+\-*/%&|\^]")]
    #[regex(r"<=|>=|==|!=|===|!==|\*\*|\+\+|--|<<|>>|>>>|&&|\|\|")]
    #[regex(r"\+=|-=|\*=|/=|%=|\*\*=|<<=|>>=|>>>=|&=|\|=|\^=|&&=|\|\|=")]
    Punctuator,
}

fn block_comment(lex: &mut logos::Lexer<RawToken>) -> FilterResult<(), ()> {
    let remainder = lex.remainder();
    match remainder.find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(remainder.len());
            FilterResult::Error(())
        }
    }
}

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "export",
    "extends",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
];

/// Tokens plus, for each token, whether a line break precedes it.
#[derive(Debug)]
pub(crate) struct Lexed<'a> {
    pub tokens: Vec<Token<'a>>,
    pub newline_before: Vec<bool>,
}

pub(crate) fn tokenize<'a>(
    source: &'a str,
    options: &LanguageOptions,
) -> Result<Lexed<'a>, ParseError> {
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();
    let mut newline_before = Vec::new();
    let mut last_end = 0usize;

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let text = lexer.slice();

        let kind = match result {
            Ok(RawToken::Word) => classify_word(text),
            Ok(RawToken::Number) => {
                if text.contains('_') && !options.has_numeric_separators() {
                    return Err(syntax_error(
                        source,
                        "Numeric separators are not allowed here",
                        range.start,
                    ));
                }
                TokenKind::Numeric
            }
            Ok(RawToken::String) => TokenKind::String,
            Ok(RawToken::Punctuator) => TokenKind::Punctuator,
            Ok(RawToken::BlockComment) => continue,
            Err(()) => {
                let message = if source[range.start..].starts_with("/*") {
                    "Unterminated comment".to_string()
                } else {
                    let c = source[range.start..].chars().next().unwrap_or('\0');
                    format!("Unexpected character '{c}'")
                };
                return Err(syntax_error(source, message, range.start));
            }
        };

        newline_before.push(source[last_end..range.start].chars().any(is_line_terminator));
        tokens.push(Token::new(
            kind,
            text,
            Span::new(range.start as u32, range.end as u32),
        ));
        last_end = range.end;
    }

    Ok(Lexed {
        tokens,
        newline_before,
    })
}

fn classify_word(text: &str) -> TokenKind {
    match text {
        "true" | "false" => TokenKind::Boolean,
        "null" => TokenKind::Null,
        _ if KEYWORDS.contains(&text) => TokenKind::Keyword,
        _ => TokenKind::Identifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<(TokenKind, &str)> {
        tokenize(source, &LanguageOptions::default())
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| (t.kind, t.value))
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            kinds("var x = 0x1F;"),
            vec![
                (TokenKind::Keyword, "var"),
                (TokenKind::Identifier, "x"),
                (TokenKind::Punctuator, "="),
                (TokenKind::Numeric, "0x1F"),
                (TokenKind::Punctuator, ";"),
            ]
        );
    }

    #[test]
    fn test_contextual_words_are_identifiers() {
        assert_eq!(
            kinds("let static"),
            vec![(TokenKind::Identifier, "let"), (TokenKind::Identifier, "static")]
        );
        assert_eq!(
            kinds("true null"),
            vec![(TokenKind::Boolean, "true"), (TokenKind::Null, "null")]
        );
    }

    #[test]
    fn test_longest_punctuator_wins() {
        assert_eq!(
            kinds("a >>>= b === c => ..."),
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Punctuator, ">>>="),
                (TokenKind::Identifier, "b"),
                (TokenKind::Punctuator, "==="),
                (TokenKind::Identifier, "c"),
                (TokenKind::Punctuator, "=>"),
                (TokenKind::Punctuator, "..."),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1_000 .5 1.5e-3 0b1_0 0o7 019.5"),
            vec![
                (TokenKind::Numeric, "1_000"),
                (TokenKind::Numeric, ".5"),
                (TokenKind::Numeric, "1.5e-3"),
                (TokenKind::Numeric, "0b1_0"),
                (TokenKind::Numeric, "0o7"),
                (TokenKind::Numeric, "019.5"),
            ]
        );
    }

    #[test]
    fn test_comments_and_newlines() {
        let lexed = tokenize("a /* x\n */ b // c\nd", &LanguageOptions::default()).unwrap();
        let values: Vec<_> = lexed.tokens.iter().map(|t| t.value).collect();
        assert_eq!(values, vec!["a", "b", "d"]);
        assert_eq!(lexed.newline_before, vec![false, true, true]);
    }

    #[test]
    fn test_separator_rejected_before_es2021() {
        let err = tokenize("1_000", &LanguageOptions::new(5)).unwrap_err();
        assert_eq!(err.message(), "Numeric separators are not allowed here");
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("a\n  #", &LanguageOptions::default()).unwrap_err();
        assert_eq!(err.message(), "Unexpected character '#'");
        assert_eq!(err.position(), Some(loomlint_ast::Position::new(2, 2)));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("a /* b", &LanguageOptions::default()).unwrap_err();
        assert_eq!(err.message(), "Unterminated comment");
    }
}
