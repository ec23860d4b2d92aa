use std::path::Path;

use dsnlexer::{
    base::{Error, MemoryProvider, SilentHandler, VoidHandler},
    lexical::{
        keyword::{KeywordId, KeywordTable},
        token::TokenKind,
        DsnLexer,
    },
};

const KEYWORDS: &[&str] = &[
    "pcb",
    "parser",
    "string_quote",
    "resolution",
    "unit",
    "structure",
    "layer",
    "type",
    "property",
    "index",
    "boundary",
    "path",
    "network",
    "net",
    "pins",
    "include",
    "library",
    "image",
    "wiring",
];

fn provider() -> MemoryProvider {
    let mut provider = MemoryProvider::new();
    provider.add_file("board.dsn", include_str!("./board.dsn"));
    provider.add_file("main.dsn", include_str!("./main.dsn"));
    provider.add_file("parts.dsn", include_str!("./parts.dsn"));
    provider.add_file("invalid.dsn", include_str!("./invalid.dsn"));
    provider
}

#[test]
fn lexing_board() {
    let keywords = KeywordTable::from_names(KEYWORDS);
    let tokens = dsnlexer::tokenize(
        &VoidHandler,
        &provider(),
        Path::new("board.dsn"),
        &keywords,
    )
    .expect("Failed to tokenize");

    assert_eq!(tokens[0].kind(), TokenKind::LeftBracket);
    assert_eq!(tokens[0].line_offset(), 1);
    assert_eq!(tokens[1].kind(), TokenKind::Symbol);
    assert_eq!(tokens[1].text(), "pcb");
    assert_eq!(tokens[2].kind(), TokenKind::QuotedString);
    assert_eq!(tokens[2].text(), "demo board.dsn");
    assert_eq!(tokens.last().unwrap().kind(), TokenKind::EndOfFile);

    let quote = tokens
        .iter()
        .position(|token| token.kind() == TokenKind::StringQuote)
        .expect("string_quote directive");
    assert_eq!(tokens[quote + 1].kind(), TokenKind::QuoteDefinitionChar);
    assert_eq!(tokens[quote + 1].text(), "\"");

    let numbers = tokens
        .iter()
        .filter(|token| token.kind() == TokenKind::Number)
        .map(|token| token.text().as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        numbers,
        vec!["10", "0", "0", "-50", "50", "50.5", "-1e3", "1.5E+2"]
    );

    let count = |kind: TokenKind| tokens.iter().filter(|token| token.kind() == kind).count();
    assert_eq!(count(TokenKind::LeftBracket), count(TokenKind::RightBracket));
    assert_eq!(count(TokenKind::Dash), 1);
    assert_eq!(count(TokenKind::Comment), 0);

    let symbols = tokens
        .iter()
        .filter(|token| token.kind() == TokenKind::Symbol)
        .map(|token| token.text().as_str())
        .collect::<Vec<_>>();
    assert!(symbols.contains(&"F.Cu"));
    assert!(symbols.contains(&"U2-14"));
}

#[test]
fn lexing_resolves_keywords_on_request() {
    let keywords = KeywordTable::from_names(KEYWORDS);
    let tokens = dsnlexer::tokenize(
        &VoidHandler,
        &provider(),
        Path::new("board.dsn"),
        &keywords,
    )
    .expect("Failed to tokenize");

    let resolved = tokens
        .into_iter()
        .map(|token| token.resolved(&keywords))
        .collect::<Vec<_>>();

    assert_eq!(resolved[1].kind(), TokenKind::Keyword(KeywordId(0)));
    assert!(resolved
        .iter()
        .any(|token| token.kind() == TokenKind::Keyword(KeywordId(13)) && token.text() == "net"));
    assert!(resolved
        .iter()
        .any(|token| token.kind() == TokenKind::Symbol && token.text() == "GND"));
    assert_eq!(keywords.find_token("NETWORK"), Some(KeywordId(12)));
}

#[test]
fn lexing_follows_includes() {
    let provider = provider();
    let keywords = KeywordTable::from_names(KEYWORDS);
    let include = keywords.find_token("include").unwrap();

    let reader = dsnlexer::base::FileProvider::open(&provider, "main.dsn").unwrap();
    let mut lexer = DsnLexer::new(reader, &keywords);

    let mut seen = Vec::new();
    loop {
        let kind = lexer.next_token().unwrap();
        if kind == TokenKind::EndOfFile {
            if lexer.pop_reader() {
                continue;
            }
            break;
        }

        if kind == TokenKind::Symbol && lexer.find_token(lexer.current_token_text()) == Some(include)
        {
            lexer.need_symbol().unwrap();
            let name = lexer.current_token_text().to_string();
            lexer.need_right().unwrap();
            lexer.push_reader(dsnlexer::base::FileProvider::open(&provider, &name).unwrap());
            continue;
        }

        seen.push((
            lexer.current_source_name().to_string(),
            lexer.current_line_number(),
            lexer.current_token_text().to_string(),
        ));
    }

    let texts = seen
        .iter()
        .map(|(_, _, text)| text.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        texts,
        vec![
            "(", "pcb", "demo", "(", "(", "library", "(", "image", "R0805", ")", ")", "(",
            "wiring", ")", ")"
        ]
    );

    assert!(seen.contains(&("parts.dsn".to_string(), 2, "image".to_string())));
    assert!(seen.contains(&("main.dsn".to_string(), 3, "wiring".to_string())));
    assert_eq!(lexer.current_source_name(), "main.dsn");
}

#[test]
fn lexing_invalid() {
    let handler = SilentHandler::new();
    let keywords = KeywordTable::from_names(KEYWORDS);

    let err = dsnlexer::tokenize(&handler, &provider(), Path::new("invalid.dsn"), &keywords)
        .expect_err("Expecting lexing failure");
    assert!(handler.has_received());

    let Error::LexicalError(dsnlexer::lexical::Error::Syntax(err)) = err else {
        panic!("Expecting a syntax error");
    };
    assert_eq!(err.source_name(), "invalid.dsn");
    assert_eq!(err.line_number(), 2);
    assert_eq!(err.offset(), 25);
}

#[test]
fn lexing_missing_source() {
    let handler = SilentHandler::new();
    let keywords = KeywordTable::default();

    let err = dsnlexer::tokenize(&handler, &provider(), Path::new("nope.dsn"), &keywords)
        .expect_err("Expecting open failure");
    assert!(matches!(err, Error::IoError(_)));
    assert!(handler.has_received());
}

#[test]
fn lexing_open_file() {
    let path = std::env::temp_dir().join(format!("dsnlexer-open-{}.dsn", std::process::id()));
    std::fs::write(&path, "(unit inch)\n").unwrap();

    let keywords = KeywordTable::from_names(KEYWORDS);
    let file = std::fs::File::open(&path).unwrap();
    let mut lexer = DsnLexer::from_file(file, "unit.dsn", &keywords);

    lexer.need_left().unwrap();
    assert_eq!(lexer.need_keyword().unwrap(), KeywordId(4));
    lexer.need_symbol().unwrap();
    assert_eq!(lexer.current_token_text(), "inch");
    lexer.need_right().unwrap();
    assert_eq!(lexer.next_token().unwrap(), TokenKind::EndOfFile);
    assert_eq!(lexer.current_source_name(), "unit.dsn");

    std::fs::remove_file(&path).unwrap();
}
