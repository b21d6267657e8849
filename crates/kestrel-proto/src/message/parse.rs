//! `FromStr` for [`Message`], built on `nom`.
//!
//! ```text
//! [':' prefix SPACE] command (SPACE middle)* [SPACE ':' trailing]
//! ```

use std::str::FromStr;

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::{MessageParseError, ProtocolError};

use super::types::Message;

/// RFC 2812 caps a message at 15 parameters; extra tokens fold into the last.
const MAX_PARAMS: usize = 15;

fn parse_prefix(input: &str) -> IResult<&str, &str> {
    terminated(
        preceded(char(':'), take_while1(|c| c != ' ')),
        char(' '),
    )(input)
}

/// `1*letter / 3digit`
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;

    let letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let numeric = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());
    let terminated = rest.is_empty() || rest.starts_with(' ');

    if (letters || numeric) && terminated {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Split the parameter section. Runs of spaces count as one separator and
/// a token starting with `:` swallows the rest of the line.
fn parse_params(mut rest: &str) -> Vec<String> {
    let mut params = Vec::new();

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing.to_string());
            break;
        }

        if params.len() == MAX_PARAMS - 1 {
            params.push(rest.trim_end_matches(' ').to_string());
            break;
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(rest[..end].to_string());
        rest = &rest[end..];
    }

    params
}

fn parse_message(input: &str) -> IResult<&str, (Option<&str>, &str)> {
    let (input, _) = space0(input)?;
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = parse_command(input)?;
    Ok((input, (prefix, command)))
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        let line = s.trim_end_matches(['\r', '\n']);

        let invalid = |cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        };

        if line.trim().is_empty() {
            return Err(invalid(MessageParseError::EmptyMessage));
        }

        let (rest, (prefix, command)) = parse_message(line).map_err(|_| {
            if line.trim_start().starts_with(':') && parse_prefix(line.trim_start()).is_err() {
                invalid(MessageParseError::InvalidPrefix(line.to_owned()))
            } else {
                invalid(MessageParseError::InvalidCommand)
            }
        })?;

        Ok(Message {
            prefix: prefix.map(str::to_owned),
            command: command.to_owned(),
            params: parse_params(rest),
        })
    }
}
