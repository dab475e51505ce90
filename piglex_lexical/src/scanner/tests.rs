use std::fmt::{Display, Write};

use piglex_base::{diagnostic::Storage, source_file::Location};
use proptest::{
    prelude::Arbitrary,
    prop_assert, prop_assert_eq, prop_oneof, proptest,
    strategy::{BoxedStrategy, Strategy},
};

use super::{tokenize, Scanner};
use crate::{
    config::{Options, UnknownDirectivePolicy},
    error::{Diagnostic, Error, MalformedDirective, UnclassifiedWord, UnknownDirective},
    frame::State,
    registry::Registry,
    token::{KeywordKind, Token, TokenKind},
};

fn scan_with(
    source: &str,
    options: Options,
) -> (Result<Vec<Token>, Error>, Registry, Vec<Diagnostic>) {
    let mut registry = Registry::new();
    let storage: Storage<Diagnostic> = Storage::new();

    let result = tokenize(source, &mut registry, &storage, options);

    (result, registry, storage.into_vec())
}

fn scan(source: &str) -> Vec<(TokenKind, String)> {
    let (result, ..) = scan_with(source, Options::default());

    result
        .unwrap()
        .into_iter()
        .map(|token| (token.kind(), token.into_value()))
        .collect()
}

fn expect(tokens: &[(TokenKind, &str)]) -> Vec<(TokenKind, String)> {
    tokens
        .iter()
        .map(|(kind, value)| (*kind, (*value).to_string()))
        .collect()
}

#[test]
fn rules_section_end_to_end() {
    let source = "%token FOO, BAR\n%lex\nabc\tdo_something\n%end\n";
    let (result, registry, diagnostics) = scan_with(source, Options::default());
    let tokens = result.unwrap();

    assert_eq!(
        tokens
            .iter()
            .map(|token| (token.kind(), token.value().clone()))
            .collect::<Vec<_>>(),
        expect(&[
            (TokenKind::Instruction, "token FOO, BAR"),
            (TokenKind::Instruction, "lex"),
            (TokenKind::Regexp, "abc"),
            (TokenKind::Unclassified, "ERR: do_something"),
            (TokenKind::Instruction, "end"),
            (TokenKind::Eof, ""),
        ])
    );
    assert_eq!(tokens[2].tag(), Some('\t'));
    assert_eq!(registry.tokens(), &vec!["FOO".to_string(), "BAR".to_string()]);
    assert_eq!(
        diagnostics,
        vec![Diagnostic::from(UnclassifiedWord {
            word: "do_something".to_string(),
            location: Location { line: 3, column: 5 },
        })]
    );
}

#[test]
fn percent_after_column_zero_is_a_plain_character() {
    assert_eq!(
        scan("a % b\n"),
        expect(&[
            (TokenKind::Raw, "a"),
            (TokenKind::Raw, "%"),
            (TokenKind::Raw, "b"),
            (TokenKind::Eof, ""),
        ])
    );
}

#[test]
fn block_comment_is_emitted_once_closed() {
    assert_eq!(
        scan("x/* a *b\n **/y"),
        expect(&[
            (TokenKind::Raw, "x"),
            (TokenKind::CommentClosed, "/* a *b\n **/"),
            (TokenKind::Raw, "y"),
            (TokenKind::Eof, ""),
        ])
    );
}

#[test]
fn unterminated_block_comment_is_fatal() {
    let (result, ..) = scan_with("/* unterminated", Options::default());

    assert_eq!(
        result,
        Err(Error::UnexpectedEndOfInput {
            state: State::CComment,
            text: "/* unterminated".to_string(),
            location: Location { line: 1, column: 1 },
        })
    );

    let (result, ..) = scan_with("x\n  /* a *", Options::default());

    assert_eq!(
        result,
        Err(Error::UnexpectedEndOfInput {
            state: State::Star,
            text: "/* a *".to_string(),
            location: Location { line: 2, column: 3 },
        })
    );
}

#[test]
fn scanner_stays_halted_after_an_error() {
    let mut registry = Registry::new();
    let storage: Storage<Diagnostic> = Storage::new();
    let mut scanner = Scanner::new("/* open", &mut registry, &storage, Options::default());
    let mut tokens = Vec::new();

    assert!(matches!(
        scanner.run(&mut tokens),
        Err(Error::UnexpectedEndOfInput { .. })
    ));
    assert_eq!(scanner.state(), State::Error);
    assert_eq!(
        scanner.run(&mut tokens),
        Err(Error::Halted {
            text: "/* open".to_string()
        })
    );
    assert!(tokens.is_empty());
}

#[test]
fn line_comments() {
    assert_eq!(
        scan("// one\n# two\r\nx // three"),
        expect(&[
            (TokenKind::CommentLine, "// one"),
            (TokenKind::CommentLine, "# two"),
            (TokenKind::Raw, "x"),
            (TokenKind::CommentLine, "// three"),
            (TokenKind::Eof, ""),
        ])
    );
}

#[test]
fn lone_slash_goes_back_to_the_enclosing_state() {
    assert_eq!(
        scan("a / b"),
        expect(&[
            (TokenKind::Raw, "a"),
            (TokenKind::Raw, "/"),
            (TokenKind::Raw, "b"),
            (TokenKind::Eof, ""),
        ])
    );

    assert_eq!(
        scan("%output out/lexer.go\n%lex\na/b\tlen\n"),
        expect(&[
            (TokenKind::Instruction, "output out/lexer.go"),
            (TokenKind::Instruction, "lex"),
            (TokenKind::Regexp, "a/b"),
            (TokenKind::Keyword(KeywordKind::Len), "len"),
            (TokenKind::Eof, ""),
        ])
    );
}

#[test]
fn action_block() {
    assert_eq!(
        scan("%token NUM\n%lex\n[0-9]+\t{ return NUM }\n[a-z]+\t{ return NUM}  \n"),
        expect(&[
            (TokenKind::Instruction, "token NUM"),
            (TokenKind::Instruction, "lex"),
            (TokenKind::Regexp, "[0-9]+"),
            (TokenKind::BlockStart, "{"),
            (TokenKind::Keyword(KeywordKind::Return), "return"),
            (TokenKind::UserToken, "NUM"),
            (TokenKind::BlockEnd, "}"),
            (TokenKind::Regexp, "[a-z]+"),
            (TokenKind::BlockStart, "{"),
            (TokenKind::Keyword(KeywordKind::Return), "return"),
            (TokenKind::BlockEnd, "NUM}"),
            (TokenKind::Eof, ""),
        ])
    );
}

#[test]
fn multi_line_action_block() {
    assert_eq!(
        scan("%lex\nx\t{\n\tstate _INIT\r\n\tvalue\n}\ny\tlen\n"),
        expect(&[
            (TokenKind::Instruction, "lex"),
            (TokenKind::Regexp, "x"),
            (TokenKind::BlockStart, "{"),
            (TokenKind::Keyword(KeywordKind::State), "state"),
            (TokenKind::UserState, "_INIT"),
            (TokenKind::Keyword(KeywordKind::Value), "value"),
            (TokenKind::BlockEnd, "}"),
            (TokenKind::Regexp, "y"),
            (TokenKind::Keyword(KeywordKind::Len), "len"),
            (TokenKind::Eof, ""),
        ])
    );
}

#[test]
fn unterminated_action_block_is_fatal() {
    let (result, ..) = scan_with("%lex\nx\t{ return", Options::default());

    assert_eq!(
        result,
        Err(Error::UnexpectedEndOfInput {
            state: State::ActionBlock,
            text: "return".to_string(),
            location: Location { line: 2, column: 3 },
        })
    );
}

#[test]
fn action_words_are_classified() {
    assert_eq!(
        scan("%state STRING\n%lex\n\"\tstate STRING\t_INIT error\n"),
        expect(&[
            (TokenKind::Instruction, "state STRING"),
            (TokenKind::Instruction, "lex"),
            (TokenKind::Regexp, "\""),
            (TokenKind::Keyword(KeywordKind::State), "state"),
            (TokenKind::UserState, "STRING"),
            (TokenKind::UserState, "_INIT"),
            (TokenKind::Keyword(KeywordKind::Error), "error"),
            (TokenKind::Eof, ""),
        ])
    );
}

#[test]
fn line_comment_ends_an_action_line() {
    assert_eq!(
        scan("%lex\nabc\treturn // done\nxyz\tlen # too\n"),
        expect(&[
            (TokenKind::Instruction, "lex"),
            (TokenKind::Regexp, "abc"),
            (TokenKind::Keyword(KeywordKind::Return), "return"),
            (TokenKind::CommentLine, "// done"),
            (TokenKind::Regexp, "xyz"),
            (TokenKind::Keyword(KeywordKind::Len), "len"),
            (TokenKind::CommentLine, "# too"),
            (TokenKind::Eof, ""),
        ])
    );
}

#[test]
fn directive_inside_rules_returns_to_rules() {
    let (result, registry, _) = scan_with("%lex\n%token A // names\nx\tA\n", Options::default());

    assert_eq!(
        result
            .unwrap()
            .into_iter()
            .map(|token| (token.kind(), token.into_value()))
            .collect::<Vec<_>>(),
        expect(&[
            (TokenKind::Instruction, "lex"),
            (TokenKind::CommentLine, "// names"),
            (TokenKind::Instruction, "token A "),
            (TokenKind::Regexp, "x"),
            (TokenKind::UserToken, "A"),
            (TokenKind::Eof, ""),
        ])
    );
    assert_eq!(registry.tokens(), &vec!["A".to_string()]);
}

#[test]
fn newline_after_a_pattern_starts_the_action() {
    let (result, _, diagnostics) = scan_with("%lex\nabc\nfoo\n", Options::default());
    let tokens = result.unwrap();

    assert_eq!(
        tokens
            .iter()
            .map(|token| (token.kind(), token.value().clone()))
            .collect::<Vec<_>>(),
        expect(&[
            (TokenKind::Instruction, "lex"),
            (TokenKind::Regexp, "abc"),
            (TokenKind::Unclassified, "ERR: foo"),
            (TokenKind::Eof, ""),
        ])
    );
    assert_eq!(tokens[1].tag(), Some('\n'));
    assert_eq!(
        diagnostics,
        vec![Diagnostic::from(UnclassifiedWord {
            word: "foo".to_string(),
            location: Location { line: 3, column: 1 },
        })]
    );
}

#[test]
fn scanner_is_in_action_once_the_pattern_is_emitted() {
    let mut registry = Registry::new();
    let storage: Storage<Diagnostic> = Storage::new();
    let mut scanner = Scanner::new("%lex\nabc\n", &mut registry, &storage, Options::default());
    let mut tokens: Vec<Token> = Vec::new();

    while !tokens.iter().any(|token| token.kind() == TokenKind::Regexp) {
        scanner.step(&mut tokens).unwrap();
    }

    assert_eq!(scanner.state(), State::Action);
}

#[test]
fn pattern_at_end_of_input() {
    assert_eq!(
        scan("%lex\n[a-z]+"),
        expect(&[
            (TokenKind::Instruction, "lex"),
            (TokenKind::Regexp, "[a-z]+"),
            (TokenKind::Eof, ""),
        ])
    );
}

#[test]
fn comment_states_drop_plain_characters() {
    let mut registry = Registry::new();
    let storage: Storage<Diagnostic> = Storage::new();
    let mut scanner = Scanner::new("", &mut registry, &storage, Options::default());
    let mut tokens: Vec<Token> = Vec::new();

    for state in [
        State::Slash,
        State::Star,
        State::LineComment,
        State::CComment,
        State::Finished,
        State::Error,
    ] {
        assert_eq!(scanner.accept(state, 'x', &mut tokens), Ok(()));
    }

    assert!(tokens.is_empty());
    assert_eq!(scanner.state(), State::Init);
}

#[test]
fn directive_at_end_of_input() {
    let (result, registry, _) = scan_with("%token A,B", Options::default());

    assert_eq!(
        result
            .unwrap()
            .into_iter()
            .map(|token| token.kind())
            .collect::<Vec<_>>(),
        vec![TokenKind::Instruction, TokenKind::Eof]
    );
    assert_eq!(registry.tokens(), &vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn keyword_wins_over_declared_names() {
    assert_eq!(
        scan("%token return\n%state return\n%lex\nx\treturn\n")[4],
        (TokenKind::Keyword(KeywordKind::Return), "return".to_string())
    );
}

#[test]
fn token_name_wins_over_state_name() {
    for source in [
        "%token DUP\n%state DUP\n%lex\nx\tDUP\n",
        "%state DUP\n%token DUP\n%lex\nx\tDUP\n",
    ] {
        assert_eq!(scan(source)[4], (TokenKind::UserToken, "DUP".to_string()));
    }
}

#[test]
fn unknown_directive_policies() {
    let source = "%end\n";

    let (result, _, diagnostics) = scan_with(source, Options::default());
    assert!(result.is_ok());
    assert!(diagnostics.is_empty());

    let (result, _, diagnostics) = scan_with(source, Options {
        unknown_directives: UnknownDirectivePolicy::Warn,
    });
    assert!(result.is_ok());
    assert_eq!(
        diagnostics,
        vec![Diagnostic::from(UnknownDirective {
            verb: "end".to_string(),
            location: Location { line: 1, column: 1 },
        })]
    );

    let (result, _, _) = scan_with(source, Options {
        unknown_directives: UnknownDirectivePolicy::Error,
    });
    assert_eq!(
        result,
        Err(Error::UnknownDirective {
            verb: "end".to_string(),
            location: Location { line: 1, column: 1 },
        })
    );
}

#[test]
fn alias_needs_two_names() {
    let (result, _, diagnostics) = scan_with("%alias ID\n%alias ID IDENT\n", Options::default());

    assert!(result.is_ok());
    assert_eq!(
        diagnostics,
        vec![Diagnostic::from(MalformedDirective {
            line: "alias ID".to_string(),
            reason: "`alias` expects a name and a target".to_string(),
            location: Location { line: 1, column: 1 },
        })]
    );
}

#[test]
fn informational_directives_do_not_change_state() {
    let (result, registry, diagnostics) = scan_with(
        "%only STRING\n%except _INIT\n%include a.lex b.lex\n%\nx",
        Options::default(),
    );

    assert_eq!(
        result
            .unwrap()
            .into_iter()
            .map(|token| token.kind())
            .collect::<Vec<_>>(),
        vec![
            TokenKind::Instruction,
            TokenKind::Instruction,
            TokenKind::Instruction,
            TokenKind::Instruction,
            TokenKind::Raw,
            TokenKind::Eof,
        ]
    );
    assert_eq!(registry, Registry::new());
    assert!(diagnostics.is_empty());
}

/// Represents a piece of top-level input that the scanner hands back unchanged, apart from the
/// blanks.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Character(char),
    Blank(char),
    BlockComment(String),
    LineComment(&'static str, String),
}

impl Arbitrary for Piece {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            proptest::char::ranges(vec!['a'..='z', '0'..='9', ';'..='='].into())
                .prop_map(Self::Character),
            proptest::sample::select(vec![' ', '\t', '\n']).prop_map(Self::Blank),
            "[a-z*;]{0,8}".prop_map(Self::BlockComment),
            (proptest::sample::select(vec!["//", "#"]), "[a-z*;]{0,8}")
                .prop_map(|(start, body)| Self::LineComment(start, body)),
        ]
        .boxed()
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Character(character) | Self::Blank(character) => f.write_char(*character),
            Self::BlockComment(body) => write!(f, "/*{body}*/"),
            Self::LineComment(start, body) => writeln!(f, "{start}{body}"),
        }
    }
}

fn render(pieces: &[Piece]) -> String { pieces.iter().map(ToString::to_string).collect() }

proptest! {
    #[test]
    fn every_block_comment_closes_once(pieces in proptest::collection::vec(Piece::arbitrary(), 0..16)) {
        let source = render(&pieces);
        let comments = pieces
            .iter()
            .filter_map(|piece| match piece {
                Piece::BlockComment(..) => Some(piece.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>();

        let tokens = scan(&source);
        let closed = tokens
            .into_iter()
            .filter(|(kind, _)| *kind == TokenKind::CommentClosed)
            .map(|(_, value)| value)
            .collect::<Vec<_>>();

        prop_assert_eq!(closed, comments);
    }

    #[test]
    fn unclosed_block_comment_never_finishes(prefix in "[a-z ]{0,8}", body in "[a-z *\n]{0,16}") {
        let source = format!("{prefix}/*{body}");
        let (result, ..) = scan_with(&source, Options::default());

        let unclosed = matches!(
            result,
            Err(Error::UnexpectedEndOfInput { state: State::CComment | State::Star, .. })
        );

        prop_assert!(unclosed, "an unclosed block comment must stop the scan");
    }

    #[test]
    fn top_level_values_round_trip(pieces in proptest::collection::vec(Piece::arbitrary(), 0..24)) {
        let source = render(&pieces);

        let scanned = scan(&source)
            .into_iter()
            .filter(|(kind, _)| *kind != TokenKind::Eof)
            .map(|(_, value)| value)
            .collect::<String>();
        let expected = source
            .chars()
            .filter(|character| !matches!(character, ' ' | '\t' | '\r' | '\n'))
            .collect::<String>();

        prop_assert_eq!(scanned, expected);
    }

    #[test]
    fn percent_inside_a_line_is_not_a_directive(
        lines in proptest::collection::vec(("[a-z ]{1,5}", "[a-z ]{0,5}"), 1..6)
    ) {
        let source = lines
            .iter()
            .map(|(before, after)| format!("{before}%{after}\n"))
            .collect::<String>();

        let tokens = scan(&source);

        prop_assert!(tokens.iter().all(|(kind, _)| *kind != TokenKind::Instruction));
        prop_assert_eq!(
            tokens.iter().filter(|(_, value)| value == "%").count(),
            lines.len()
        );
    }
}
