//! Property tests for the message grammar.
//!
//! 1. Parsing never panics, whatever the input.
//! 2. A serialized message parses back to the same message.
//! 3. Re-serializing a parsed line is stable under extra spacing.

use kestrel_proto::Message;
use proptest::prelude::*;

fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z\\[\\]\\\\^_`{|}][a-zA-Z0-9\\-\\[\\]\\\\^_`{|}]{0,8}")
        .expect("valid regex")
}

fn hostname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(\\.[a-z0-9]+){0,3}").expect("valid regex")
}

fn prefix_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        hostname_strategy(),
        (nickname_strategy(), nickname_strategy(), hostname_strategy())
            .prop_map(|(nick, user, host)| format!("{nick}!{user}@{host}")),
    ]
}

fn command_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[A-Za-z]{1,12}").expect("valid regex"),
        (1u16..1000).prop_map(|n| format!("{n:03}")),
    ]
}

/// Middle parameters: non-empty, no spaces, no leading colon.
fn middle_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^ :\r\n\0][^ \r\n\0]{0,20}").expect("valid regex")
}

/// Trailing text, including the edge cases the long form exists for.
fn trailing_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[^\r\n\0]{0,200}").expect("valid regex"),
        Just(String::new()),
        Just(" ".to_string()),
        Just(":".to_string()),
        Just("::".to_string()),
        Just(": trailing".to_string()),
        Just("multiple   spaces   here".to_string()),
    ]
}

fn message_strategy() -> impl Strategy<Value = Message> {
    (
        prop::option::of(prefix_strategy()),
        command_strategy(),
        prop::collection::vec(middle_strategy(), 0..8),
        prop::option::of(trailing_strategy()),
    )
        .prop_map(|(prefix, command, mut params, trailing)| {
            params.extend(trailing);
            Message {
                prefix,
                command,
                params,
            }
        })
}

proptest! {
    #[test]
    fn parse_never_panics(line in "\\PC{0,600}") {
        let _ = line.parse::<Message>();
        let _ = Message::parse(&line);
    }

    #[test]
    fn serialize_then_parse_is_identity(msg in message_strategy()) {
        let wire = msg.to_string();
        let parsed: Message = wire.parse().expect("serialized message must parse");
        prop_assert_eq!(parsed, msg);
    }

    #[test]
    fn reserialization_is_stable(msg in message_strategy(), pad in 1usize..4) {
        let spaced = msg.to_string().replacen(' ', &" ".repeat(pad), 1);
        let first: Message = spaced.parse().expect("spaced line must parse");
        let second: Message = first.to_string().parse().expect("reserialized line must parse");
        prop_assert_eq!(first, second);
    }
}
