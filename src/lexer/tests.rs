use super::*;

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn skips_whitespace() {
    let tokens = lex("  select   \t*\nfrom  t ");
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Keyword,
            TokenKind::Punctuation,
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::EndOfInput,
        ]
    );
}

#[test]
fn keywords_and_identifiers_are_lowercased() {
    let tokens = lex("SELECT Name FROM Users");
    assert_eq!(tokens[0].text, "select");
    assert_eq!(tokens[1].text, "name");
    assert_eq!(tokens[2].text, "from");
    assert_eq!(tokens[3].text, "users");
}

#[test]
fn string_literals_preserve_case_and_drop_quotes() {
    let tokens = lex("'Hello World'");
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "Hello World");

    let tokens = lex("\"Other\"");
    assert_eq!(tokens[0].text, "Other");
}

#[test]
fn unterminated_string_consumes_to_end() {
    let tokens = lex("'unterminated");
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "unterminated");
    assert_eq!(tokens[1].kind, TokenKind::EndOfInput);
}

#[test]
fn numbers_allow_stray_dots() {
    let tokens = lex("3.14 1.2.3 .5");
    assert_eq!(tokens[0].text, "3.14");
    assert_eq!(tokens[1].text, "1.2.3");
    assert_eq!(tokens[2].text, ".5");
}

#[test]
fn two_character_operators() {
    let tokens = lex("= == != > < >= <=");
    let texts: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Operator)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(texts, vec!["=", "==", "!=", ">", "<", ">=", "<="]);
}

#[test]
fn punctuation_tokens() {
    let tokens = lex("(a, b*);");
    let texts: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Punctuation)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(texts, vec!["(", ",", "*", ")", ";"]);
}

#[test]
fn keyword_set_is_case_insensitive() {
    for kw in ["select", "SELECT", "Select", "sElEcT"] {
        let tokens = lex(kw);
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].text, "select");
    }
}

#[test]
fn identifiers_round_trip_lowercase() {
    let sql = "SELECT Id, Name FROM Accounts WHERE Id = 1";
    let tokens = lex(sql);
    let idents: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Identifier)
        .map(|t| t.text.clone())
        .collect();
    assert_eq!(idents, vec!["id", "name", "accounts", "id"]);
}

#[test]
fn always_terminated_by_end_of_input() {
    assert_eq!(lex("").last().unwrap().kind, TokenKind::EndOfInput);
    assert_eq!(lex("select").last().unwrap().kind, TokenKind::EndOfInput);
}
