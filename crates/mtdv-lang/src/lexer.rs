pub mod error;
pub mod token;

use error::{LexerError, Position};
use nom::Parser;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, line_ending, multispace0, multispace1, not_line_ending, one_of},
    combinator::{map, opt, recognize, value},
    multi::many0,
    sequence::{preceded, terminated},
};
use nom_locate::LocatedSpan;
use token::{Token, TokenKind};

const COMMENT: char = '%';
const EXCERPT_LENGTH: usize = 40;

type Span<'a> = LocatedSpan<&'a str>;

macro_rules! define_token_parser {
    ($name:ident, $tag:expr, $kind:expr) => {
        fn $name(input: Span) -> IResult<Span, TokenKind> {
            value($kind, tag($tag)).parse(input)
        }
    };
}

define_token_parser!(end_marker, "#", TokenKind::EndMarker);
define_token_parser!(block_close, "}", TokenKind::BlockClose);
define_token_parser!(init, "I", TokenKind::Init);
define_token_parser!(pause, "P", TokenKind::Pause);
define_token_parser!(move_left, "G", TokenKind::MoveLeft);
define_token_parser!(move_right, "D", TokenKind::MoveRight);
define_token_parser!(write_zero, "0", TokenKind::WriteZero);
define_token_parser!(write_one, "1", TokenKind::WriteOne);
define_token_parser!(halt, "fin", TokenKind::Halt);
define_token_parser!(loop_open, "boucle", TokenKind::LoopOpen);

/// Splits the program text into tokens.
///
/// Comments (`%` up to the end of the line) and whitespace are discarded.
/// The first character that does not start a symbol aborts tokenization.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
    let span = Span::new(input);

    match symbols(span) {
        Ok((rest, kinds)) if rest.fragment().is_empty() => {
            log::trace!("tokenized {} symbols", kinds.len());
            Ok(kinds
                .into_iter()
                .enumerate()
                .map(|(i, kind)| Token::new(i + 1, kind))
                .collect())
        }
        Ok((rest, _)) => Err(unexpected(rest)),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(unexpected(e.input)),
        Err(nom::Err::Incomplete(_)) => Err(unexpected(span)),
    }
}

fn unexpected(span: Span) -> LexerError {
    LexerError::UnexpectedCharacter {
        offset: span.location_offset(),
        position: Position {
            line: span.location_line(),
            column: span.get_utf8_column(),
        },
        excerpt: span.fragment().chars().take(EXCERPT_LENGTH).collect(),
    }
}

fn comment(input: Span) -> IResult<Span, Span> {
    recognize((char(COMMENT), not_line_ending, opt(line_ending))).parse(input)
}

fn trivia(input: Span) -> IResult<Span, ()> {
    value((), many0(alt((multispace1, comment)))).parse(input)
}

// `si(0)` and `si(1)` accept whitespace, newlines included, around the digit.
fn conditional(input: Span) -> IResult<Span, TokenKind> {
    map(
        (
            tag("si"),
            multispace0,
            char('('),
            multispace0,
            one_of("01"),
            multispace0,
            char(')'),
        ),
        |(_, _, _, _, digit, _, _)| match digit {
            '0' => TokenKind::IfZeroOpen,
            _ => TokenKind::IfOneOpen,
        },
    )
    .parse(input)
}

fn keywords(input: Span) -> IResult<Span, TokenKind> {
    alt((loop_open, halt, conditional)).parse(input)
}

fn punctuations(input: Span) -> IResult<Span, TokenKind> {
    alt((end_marker, block_close)).parse(input)
}

fn instructions(input: Span) -> IResult<Span, TokenKind> {
    alt((init, pause, move_left, move_right, write_zero, write_one)).parse(input)
}

fn symbol(input: Span) -> IResult<Span, TokenKind> {
    alt((keywords, punctuations, instructions)).parse(input)
}

fn symbols(input: Span) -> IResult<Span, Vec<TokenKind>> {
    terminated(many0(preceded(trivia, symbol)), trivia).parse(input)
}
