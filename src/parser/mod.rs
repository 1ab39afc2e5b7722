//! Recursive-descent parser: token stream → typed `ParsedQuery`.
//!
//! There is no parser error type here by design — the reference grammar
//! in §4.2 treats a bad parse as data, not an exception: a malformed or
//! unrecognized statement simply comes back with `kind == Invalid`, or
//! with some field left at its default, and the caller (the catalog) is
//! responsible for rejecting it with a one-line message.

#[cfg(test)]
mod tests;

use crate::lexer::{Token, TokenKind};

/// The statement kind, mirroring the reference `ParsedQuery` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    CreateDatabase,
    UseDatabase,
    CreateTable,
    DropTable,
    DropDatabase,
    AlterTable,
    Insert,
    Select,
    Update,
    Delete,
    Invalid,
}

/// A `WHERE`/condition comparison operator. `=` and `==` both lex to `Eq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Operator {
    fn from_text(text: &str) -> Option<Self> {
        match text {
            "=" | "==" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Ge),
            "<=" => Some(Operator::Le),
            _ => None,
        }
    }
}

/// A single `column op value` predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub op: Operator,
    pub value: String,
}

/// The kind of structural change an `ALTER TABLE` statement requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterAction {
    Add,
    Drop,
    Modify,
}

/// A fully parsed statement. Only the fields relevant to `kind` are
/// populated; everything else is left at its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub kind: Option<QueryKind>,
    pub database_name: String,
    pub table_name: String,
    pub columns: Vec<String>,
    pub values: Vec<String>,
    pub select_columns: Vec<String>,
    pub select_all: bool,
    pub conditions: Vec<Condition>,
    pub order_by_column: Option<String>,
    pub order_by_desc: bool,
    pub group_by_column: Option<String>,
    pub updates: Vec<(String, String)>,
    pub alter_action: Option<AlterAction>,
    pub alter_column_name: Option<String>,
    pub alter_column_type: Option<String>,
}

impl ParsedQuery {
    fn new(kind: QueryKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// `true` unless parsing produced `Invalid` — does not by itself mean
    /// the statement is semantically valid (e.g. a `DELETE` with no
    /// `WHERE` still parses successfully).
    pub fn is_valid(&self) -> bool {
        !matches!(self.kind, None | Some(QueryKind::Invalid))
    }

    pub fn kind(&self) -> QueryKind {
        self.kind.unwrap_or(QueryKind::Invalid)
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| self.eof())
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or_else(|| self.eof())
    }

    fn eof(&self) -> &'a Token {
        self.tokens.last().expect("token stream always ends in EndOfInput")
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check_kind(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn check_text(&self, text: &str) -> bool {
        self.peek().text == text
    }

    /// Consume the next token if its text matches, case-insensitively not
    /// needed since keywords/identifiers are already lowercased by the lexer.
    fn match_text(&mut self, text: &str) -> bool {
        if self.check_text(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume_identifier(&mut self) -> Option<String> {
        if self.check_kind(TokenKind::Identifier) {
            Some(self.advance().text)
        } else {
            None
        }
    }

    /// Accept any literal-shaped token (number, string, or bare identifier)
    /// as a value, per the `val` production in the grammar.
    fn consume_value(&mut self) -> Option<String> {
        match self.peek().kind {
            TokenKind::Number | TokenKind::String | TokenKind::Identifier => {
                Some(self.advance().text)
            }
            _ => None,
        }
    }

    fn parse_condition(&mut self) -> Option<Condition> {
        let column = self.consume_identifier()?;
        if !self.check_kind(TokenKind::Operator) {
            return None;
        }
        let op = Operator::from_text(&self.advance().text)?;
        let value = self.consume_value()?;
        Some(Condition { column, op, value })
    }

    fn parse_create_database(&mut self) -> ParsedQuery {
        let mut q = ParsedQuery::new(QueryKind::CreateDatabase);
        self.advance(); // CREATE
        self.advance(); // DATABASE
        match self.consume_identifier() {
            Some(name) => q.database_name = name,
            None => q.kind = Some(QueryKind::Invalid),
        }
        q
    }

    fn parse_use_database(&mut self) -> ParsedQuery {
        let mut q = ParsedQuery::new(QueryKind::UseDatabase);
        self.advance(); // USE
        match self.consume_identifier() {
            Some(name) => q.database_name = name,
            None => q.kind = Some(QueryKind::Invalid),
        }
        q
    }

    fn parse_drop_database(&mut self) -> ParsedQuery {
        let mut q = ParsedQuery::new(QueryKind::DropDatabase);
        self.advance(); // DROP
        self.advance(); // DATABASE
        match self.consume_identifier() {
            Some(name) => q.database_name = name,
            None => q.kind = Some(QueryKind::Invalid),
        }
        q
    }

    fn parse_drop_table(&mut self) -> ParsedQuery {
        let mut q = ParsedQuery::new(QueryKind::DropTable);
        self.advance(); // DROP
        self.advance(); // TABLE
        match self.consume_identifier() {
            Some(name) => q.table_name = name,
            None => q.kind = Some(QueryKind::Invalid),
        }
        q
    }

    fn parse_create_table(&mut self) -> ParsedQuery {
        let mut q = ParsedQuery::new(QueryKind::CreateTable);
        self.advance(); // CREATE
        self.advance(); // TABLE

        match self.consume_identifier() {
            Some(name) => q.table_name = name,
            None => {
                q.kind = Some(QueryKind::Invalid);
                return q;
            }
        }

        if !self.match_text("(") {
            q.kind = Some(QueryKind::Invalid);
            return q;
        }

        while !self.check_text(")") && !self.check_kind(TokenKind::EndOfInput) {
            match self.consume_identifier() {
                Some(col_name) => {
                    // A trailing type name (INT, TEXT, ...) is accepted and
                    // discarded: column types are informational only.
                    if self.check_kind(TokenKind::Identifier) {
                        self.advance();
                    }
                    q.columns.push(col_name);
                }
                None => {
                    q.kind = Some(QueryKind::Invalid);
                    return q;
                }
            }
            self.match_text(",");
        }
        self.match_text(")");
        q
    }

    fn parse_alter_table(&mut self) -> ParsedQuery {
        let mut q = ParsedQuery::new(QueryKind::AlterTable);
        self.advance(); // ALTER
        self.advance(); // TABLE

        match self.consume_identifier() {
            Some(name) => q.table_name = name,
            None => {
                q.kind = Some(QueryKind::Invalid);
                return q;
            }
        }

        if self.match_text("add") {
            q.alter_action = Some(AlterAction::Add);
        } else if self.match_text("drop") {
            q.alter_action = Some(AlterAction::Drop);
        } else if self.match_text("modify") {
            q.alter_action = Some(AlterAction::Modify);
        } else {
            q.kind = Some(QueryKind::Invalid);
            return q;
        }

        q.alter_column_name = self.consume_identifier();
        if self.check_kind(TokenKind::Identifier) {
            q.alter_column_type = Some(self.advance().text);
        }
        q
    }

    fn parse_insert(&mut self) -> ParsedQuery {
        let mut q = ParsedQuery::new(QueryKind::Insert);
        self.advance(); // INSERT
        self.advance(); // INTO

        match self.consume_identifier() {
            Some(name) => q.table_name = name,
            None => {
                q.kind = Some(QueryKind::Invalid);
                return q;
            }
        }

        if !self.match_text("values") || !self.match_text("(") {
            q.kind = Some(QueryKind::Invalid);
            return q;
        }

        while !self.check_text(")") && !self.check_kind(TokenKind::EndOfInput) {
            match self.consume_value() {
                Some(v) => q.values.push(v),
                None => break,
            }
            self.match_text(",");
        }
        self.match_text(")");
        q
    }

    fn parse_select(&mut self) -> ParsedQuery {
        let mut q = ParsedQuery::new(QueryKind::Select);
        self.advance(); // SELECT

        if self.match_text("*") {
            q.select_all = true;
        } else {
            loop {
                match self.consume_identifier() {
                    Some(col) => q.select_columns.push(col),
                    None => break,
                }
                if !self.match_text(",") {
                    break;
                }
            }
        }

        if !self.match_text("from") {
            q.kind = Some(QueryKind::Invalid);
            return q;
        }
        match self.consume_identifier() {
            Some(name) => q.table_name = name,
            None => {
                q.kind = Some(QueryKind::Invalid);
                return q;
            }
        }

        if self.match_text("where")
            && let Some(cond) = self.parse_condition()
        {
            q.conditions.push(cond);
        }

        if self.match_text("order") && self.match_text("by") {
            q.order_by_column = self.consume_identifier();
            q.order_by_desc = self.match_text("desc");
            self.match_text("asc");
        }

        if self.match_text("group") && self.match_text("by") {
            q.group_by_column = self.consume_identifier();
        }

        q
    }

    fn parse_delete(&mut self) -> ParsedQuery {
        let mut q = ParsedQuery::new(QueryKind::Delete);
        self.advance(); // DELETE
        self.advance(); // FROM

        match self.consume_identifier() {
            Some(name) => q.table_name = name,
            None => {
                q.kind = Some(QueryKind::Invalid);
                return q;
            }
        }

        if self.match_text("where")
            && let Some(cond) = self.parse_condition()
        {
            q.conditions.push(cond);
        }
        q
    }

    fn parse_update(&mut self) -> ParsedQuery {
        let mut q = ParsedQuery::new(QueryKind::Update);
        self.advance(); // UPDATE

        match self.consume_identifier() {
            Some(name) => q.table_name = name,
            None => {
                q.kind = Some(QueryKind::Invalid);
                return q;
            }
        }

        if !self.match_text("set") {
            q.kind = Some(QueryKind::Invalid);
            return q;
        }

        loop {
            let Some(column) = self.consume_identifier() else {
                break;
            };
            if !self.match_text("=") {
                break;
            }
            let Some(value) = self.consume_value() else {
                break;
            };
            q.updates.push((column, value));
            if !self.match_text(",") {
                break;
            }
        }

        if self.match_text("where")
            && let Some(cond) = self.parse_condition()
        {
            q.conditions.push(cond);
        }
        q
    }

    fn parse(&mut self) -> ParsedQuery {
        if !self.check_kind(TokenKind::Keyword) {
            return ParsedQuery::default();
        }

        let keyword = self.peek().text.clone();
        match keyword.as_str() {
            "create" => {
                if self.peek_at(1).text == "database" {
                    self.parse_create_database()
                } else {
                    self.parse_create_table()
                }
            }
            "drop" => {
                if self.peek_at(1).text == "database" {
                    self.parse_drop_database()
                } else {
                    self.parse_drop_table()
                }
            }
            "use" => self.parse_use_database(),
            "alter" => self.parse_alter_table(),
            "insert" => self.parse_insert(),
            "select" => self.parse_select(),
            "delete" => self.parse_delete(),
            "update" => self.parse_update(),
            _ => ParsedQuery::default(),
        }
    }
}

/// Parse a single statement's token stream into a `ParsedQuery`.
pub fn parse(tokens: &[Token]) -> ParsedQuery {
    Parser::new(tokens).parse()
}
