//! Property-based tests for definition parsing
//!
//! Literals are drawn from punctuation and captured values from
//! alphanumerics, so a literal can never start inside a value.

use proptest::prelude::*;
use scrapedef::domain::definition::{tokenize, Lexer, TokenKind};
use scrapedef::{DefinitionParser, FilterRegistry};

/// Literal text that can never be mistaken for a value or a placeholder
fn literal_strategy() -> impl Strategy<Value = String> {
    "[<>/#;:=!@]{1,4}"
}

/// Captured values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,8}"
}

/// ASCII whitespace runs the matcher is allowed to skip
fn whitespace_strategy() -> impl Strategy<Value = String> {
    "[ \t\n\r]{1,3}"
}

// Put `ws` in front of every character of `literal`
fn spread(literal: &str, ws: &str) -> String {
    literal.chars().map(|ch| format!("{}{}", ws, ch)).collect()
}

proptest! {
    #[test]
    fn substituted_literals_round_trip(
        l0 in literal_strategy(),
        l1 in literal_strategy(),
        l2 in literal_strategy(),
        first in value_strategy(),
        second in value_strategy(),
    ) {
        let parser = DefinitionParser::new(&format!("{}{{{{first}}}}{}{{{{second}}}}{}", l0, l1, l2)).unwrap();
        let records = parser.parse(&format!("{}{}{}{}{}", l0, first, l1, second, l2));

        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(&records[0]["first"], &first);
        prop_assert_eq!(&records[0]["second"], &second);
    }

    #[test]
    fn whitespace_in_content_is_ignored(
        l0 in literal_strategy(),
        l1 in literal_strategy(),
        value in value_strategy(),
        ws in whitespace_strategy(),
    ) {
        let parser = DefinitionParser::new(&format!("{}{{{{value}}}}{}", l0, l1)).unwrap();
        let content = format!("{}{}{}", spread(&l0, &ws), value, spread(&l1, &ws));
        let records = parser.parse(&content);

        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(&records[0]["value"], &value);
    }

    #[test]
    fn whitespace_in_definition_is_ignored(
        l0 in literal_strategy(),
        l1 in literal_strategy(),
        l2 in literal_strategy(),
        first in value_strategy(),
        second in value_strategy(),
        definition_ws in whitespace_strategy(),
        content_ws in prop_oneof![Just(String::new()), whitespace_strategy()],
    ) {
        let compact = DefinitionParser::new(&format!("{}{{{{first}}}}{}{{{{second}}}}{}", l0, l1, l2)).unwrap();
        let spaced = DefinitionParser::new(&format!(
            "{}{{{{first}}}}{}{{{{second}}}}{}",
            spread(&l0, &definition_ws),
            spread(&l1, &definition_ws),
            spread(&l2, &definition_ws),
        ))
        .unwrap();
        let content = format!(
            "{}{}{}{}{}",
            spread(&l0, &content_ws),
            first,
            spread(&l1, &content_ws),
            second,
            spread(&l2, &content_ws),
        );

        let records = spaced.parse(&content);
        prop_assert_eq!(&records, &compact.parse(&content));
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(&records[0]["first"], &first);
        prop_assert_eq!(&records[0]["second"], &second);
    }

    #[test]
    fn repeated_blocks_yield_one_record_each(
        l0 in literal_strategy(),
        l1 in literal_strategy(),
        values in prop::collection::vec(value_strategy(), 1..10),
    ) {
        let parser = DefinitionParser::new(&format!("{}{{{{value}}}}{}", l0, l1)).unwrap();
        let content: String = values.iter().map(|v| format!("{}{}{}", l0, v, l1)).collect();
        let records = parser.parse(&content);

        let found: Vec<&str> = records.iter().map(|r| r["value"].as_str()).collect();
        let expected: Vec<&str> = values.iter().map(String::as_str).collect();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn discarded_values_never_become_fields(
        l0 in literal_strategy(),
        l1 in literal_strategy(),
        l2 in literal_strategy(),
        skipped in value_strategy(),
        kept in value_strategy(),
    ) {
        let parser = DefinitionParser::new(&format!("{}{{{{_}}}}{}{{{{kept}}}}{}", l0, l1, l2)).unwrap();
        let records = parser.parse(&format!("{}{}{}{}{}", l0, skipped, l1, kept, l2));

        prop_assert_eq!(records.len(), 1);
        prop_assert!(!records[0].contains_key("_"));
        prop_assert_eq!(records[0].len(), 1);
        prop_assert_eq!(&records[0]["kept"], &kept);
    }

    #[test]
    fn pence_reads_the_digits_of_a_price(amount in 0u64..1_000_000_000_000) {
        let price = format!("£{}.{:02}", amount / 100, amount % 100);
        let registry = FilterRegistry::new();
        prop_assert_eq!(registry.apply_chain(&price, ["pence"]), amount.to_string());
    }

    #[test]
    fn tokenizer_always_terminates_once(source in "\\PC{0,40}") {
        let tokens = Lexer::new(&source).run();
        let terminal = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::EndOfTemplate | TokenKind::Error))
            .count();

        prop_assert_eq!(terminal, 1);
        prop_assert!(matches!(
            tokens.last().map(|t| t.kind),
            Some(TokenKind::EndOfTemplate) | Some(TokenKind::Error)
        ));
        prop_assert_eq!(tokenize(&source).is_ok(), tokens.last().map(|t| t.kind) == Some(TokenKind::EndOfTemplate));
    }

    #[test]
    fn parsing_arbitrary_content_terminates(
        l0 in literal_strategy(),
        l1 in literal_strategy(),
        content in "\\PC{0,60}",
    ) {
        let parser = DefinitionParser::new(&format!("{}{{{{value}}}}{}", l0, l1)).unwrap();
        let records = parser.parse(&content);
        prop_assert!(records.len() <= content.len());
    }
}
