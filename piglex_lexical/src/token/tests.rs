use std::{collections::HashSet, str::FromStr};

use proptest::{prop_assert, prop_assert_eq, proptest};
use strum::IntoEnumIterator;

use super::{KeywordKind, Token, TokenKind};

#[test]
fn keyword_from_str() {
    for keyword in KeywordKind::iter() {
        assert_eq!(KeywordKind::from_str(keyword.as_str()), Ok(keyword));
    }

    assert!(KeywordKind::from_str("Return").is_err());
    assert!(KeywordKind::from_str("").is_err());
}

#[test]
fn codes_are_pinned() {
    let codes = [
        (TokenKind::Raw, 0),
        (TokenKind::UserState, 13),
        (TokenKind::CommentClosed, 258),
        (TokenKind::CommentLine, 260),
        (TokenKind::Instruction, 261),
        (TokenKind::Eof, 262),
        (TokenKind::Regexp, 263),
        (TokenKind::BlockStart, 264),
        (TokenKind::BlockEnd, 267),
        (TokenKind::Keyword(KeywordKind::Return), 268),
        (TokenKind::Keyword(KeywordKind::State), 269),
        (TokenKind::Keyword(KeywordKind::Token), 270),
        (TokenKind::Keyword(KeywordKind::Len), 271),
        (TokenKind::Keyword(KeywordKind::Value), 272),
        (TokenKind::Keyword(KeywordKind::Error), 273),
        (TokenKind::Unclassified, 273),
        (TokenKind::UserToken, 274),
    ];

    for (kind, code) in codes {
        assert_eq!(kind.code(), code, "{kind:?}");
    }
}

#[test]
fn codes_do_not_collide() {
    let mut kinds = vec![
        TokenKind::Raw,
        TokenKind::CommentClosed,
        TokenKind::CommentLine,
        TokenKind::Instruction,
        TokenKind::Regexp,
        TokenKind::BlockStart,
        TokenKind::BlockEnd,
        TokenKind::UserToken,
        TokenKind::UserState,
        TokenKind::Eof,
    ];
    kinds.extend(KeywordKind::iter().map(TokenKind::Keyword));

    let codes = kinds.iter().map(|kind| kind.code()).collect::<HashSet<_>>();

    assert_eq!(codes.len(), kinds.len());
}

#[test]
fn token_display() {
    let token = Token::new(TokenKind::Regexp, "[a-z]+");
    assert_eq!(token.to_string(), "[263: [a-z]+]");

    let token = Token::raw_char('%');
    assert_eq!(token.to_string(), "[0: %]");
    assert_eq!(token.tag(), Some('%'));
}

proptest! {
    #[test]
    fn non_keyword_words_are_rejected(word in "[a-z_]{1,12}") {
        let parsed = KeywordKind::from_str(&word);

        if KeywordKind::iter().any(|keyword| keyword.as_str() == word) {
            prop_assert_eq!(parsed.map(KeywordKind::as_str), Ok(word.as_str()));
        } else {
            prop_assert!(parsed.is_err());
        }
    }
}
