use std::{ops::Range, str::FromStr};

use logos::Logos;
use thiserror::Error;
use time::{macros::format_description, Date, PrimitiveDateTime, Time};

use crate::direction::{Direction, UnknownDirection};

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\x0b\x0c]+")] // Whitespace only separates words
enum Token {
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    // Other Unicode whitespace may end up inside a word, `Fields::cover` trims it
    #[regex(r"[^,:\x00-\x20\x7f]+")]
    Word,
}

/// One observation, parsed from a line such as
///
/// ```text
/// Estacion: Centro, Latitud: -34.6, Longitud: -58.4, Fecha: 2023-05-01, Hora: 10:30, Temperatura: 18.5, Humedad: 70, Presion: 1013.2, Viento: 12.5,NE
/// ```
///
/// Fields are positional: the labels are only there for humans and are
/// thrown away.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub station: String,
    pub latitude: f64,
    pub longitude: f64,
    pub date: String,
    pub time: String,

    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,

    pub wind_speed: f64,
    pub wind_direction: Direction,
}

impl Reading {
    /// Date and time of the observation, when both are in a format we know
    /// (`YYYY-MM-DD` or `DD/MM/YYYY`, then `HH:MM` or `HH:MM:SS`).
    pub fn observed_at(&self) -> Option<PrimitiveDateTime> {
        let date = Date::parse(&self.date, format_description!("[year]-[month]-[day]"))
            .or_else(|_| Date::parse(&self.date, format_description!("[day]/[month]/[year]")))
            .ok()?;
        let time = Time::parse(&self.time, format_description!("[hour]:[minute]:[second]"))
            .or_else(|_| Time::parse(&self.time, format_description!("[hour]:[minute]")))
            .ok()?;
        Some(PrimitiveDateTime::new(date, time))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadingErrorKind {
    #[error("Missing {0} field")]
    MissingField(&'static str),
    #[error("The {0} field has no `label:` prefix")]
    MissingLabel(&'static str),
    #[error("The {0} field is empty")]
    EmptyValue(&'static str),
    #[error("Bad {field}: `{value}` is not a number")]
    InvalidNumber { field: &'static str, value: String },
    #[error("The wind field must be `speed,direction`")]
    MalformedWind,
    #[error(transparent)]
    UnknownDirection(#[from] UnknownDirection),
    #[error("Unexpected control character")]
    UnexpectedCharacter,
    #[error("The line is not valid UTF-8")]
    InvalidUtf8,
}

/// A line that could not be turned into a [`Reading`].
///
/// `span` is the byte range of the offending text inside the line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseReadingError {
    pub kind: ReadingErrorKind,
    pub span: Range<usize>,
}

impl ParseReadingError {
    fn new(kind: impl Into<ReadingErrorKind>, span: Range<usize>) -> Self {
        Self {
            kind: kind.into(),
            span,
        }
    }
}

impl FromStr for Reading {
    type Err = ParseReadingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = Fields::new(s)?;

        let station = fields.text("station")?;
        let latitude = fields.number("latitude")?;
        let longitude = fields.number("longitude")?;
        let date = fields.text("date")?;
        let time = fields.text("time")?;
        let temperature = fields.number("temperature")?;
        let humidity = fields.number("humidity")?;
        let pressure = fields.number("pressure")?;
        let (wind_speed, wind_direction) = fields.wind()?;

        Ok(Self {
            station,
            latitude,
            longitude,
            date,
            time,
            temperature,
            humidity,
            pressure,
            wind_speed,
            wind_direction,
        })
    }
}

/// Value of a `label: value` field, both as a byte range of the line and as
/// a range of indices into the token list.
struct Value {
    span: Range<usize>,
    tokens: Range<usize>,
}

struct Fields<'a> {
    line: &'a str,
    tokens: Vec<(Token, Range<usize>)>,
    pos: usize,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str) -> Result<Self, ParseReadingError> {
        let tokens: Vec<_> = Token::lexer(line)
            .spanned()
            .map(|(token, span)| match token {
                Ok(token) => Ok((token, span)),
                Err(()) => Err(ParseReadingError::new(
                    ReadingErrorKind::UnexpectedCharacter,
                    span,
                )),
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            line,
            tokens,
            pos: 0,
        })
    }

    fn end_of_line(&self) -> Range<usize> {
        self.line.len()..self.line.len()
    }

    /// Reads the next `label: value` field. The value stops at the next comma,
    /// unless this is the last field, in which case it runs to the end of the line.
    fn field(&mut self, name: &'static str, last: bool) -> Result<Value, ParseReadingError> {
        let start = self.pos;
        if start >= self.tokens.len() {
            return Err(ParseReadingError::new(
                ReadingErrorKind::MissingField(name),
                self.end_of_line(),
            ));
        }

        // label
        loop {
            match self.tokens.get(self.pos) {
                Some((Token::Colon, _)) => {
                    self.pos += 1;
                    break;
                }
                Some((Token::Word, _)) => self.pos += 1,
                Some((Token::Comma, _)) | None => {
                    let span = self.cover(start..self.pos).unwrap_or_else(|| {
                        let at = self.tokens.get(start).map_or(self.line.len(), |t| t.1.start);
                        at..at
                    });
                    return Err(ParseReadingError::new(
                        ReadingErrorKind::MissingLabel(name),
                        span,
                    ));
                }
            }
        }
        let colon = self.tokens[self.pos - 1].1.clone();

        let value_start = self.pos;
        while let Some((token, _)) = self.tokens.get(self.pos) {
            if *token == Token::Comma && !last {
                break;
            }
            self.pos += 1;
        }
        let tokens = value_start..self.pos;

        // skip the separator
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }

        match self.cover(tokens.clone()) {
            Some(span) => Ok(Value { span, tokens }),
            None => Err(ParseReadingError::new(
                ReadingErrorKind::EmptyValue(name),
                colon,
            )),
        }
    }

    /// Byte range going from the first to the last of the given tokens,
    /// trimmed of whitespace. `None` if nothing is left.
    fn cover(&self, tokens: Range<usize>) -> Option<Range<usize>> {
        let tokens = &self.tokens[tokens];
        let (start, end) = (tokens.first()?.1.start, tokens.last()?.1.end);

        let text = &self.line[start..end];
        let trimmed = text.trim_start();
        let start = start + (text.len() - trimmed.len());
        let end = start + trimmed.trim_end().len();
        (start < end).then_some(start..end)
    }

    fn text(&mut self, name: &'static str) -> Result<String, ParseReadingError> {
        let value = self.field(name, false)?;
        Ok(self.line[value.span].to_string())
    }

    fn number(&mut self, name: &'static str) -> Result<f64, ParseReadingError> {
        let value = self.field(name, false)?;
        self.parse_number(name, value.span)
    }

    fn parse_number(&self, name: &'static str, span: Range<usize>) -> Result<f64, ParseReadingError> {
        let text = &self.line[span.clone()];
        text.parse().map_err(|_| {
            ParseReadingError::new(
                ReadingErrorKind::InvalidNumber {
                    field: name,
                    value: text.to_string(),
                },
                span,
            )
        })
    }

    /// The last field, whose value is itself a `speed,direction` pair.
    fn wind(&mut self) -> Result<(f64, Direction), ParseReadingError> {
        let value = self.field("wind", true)?;

        let commas: Vec<usize> = value
            .tokens
            .clone()
            .filter(|&i| self.tokens[i].0 == Token::Comma)
            .collect();
        let [comma] = commas.as_slice() else {
            return Err(ParseReadingError::new(
                ReadingErrorKind::MalformedWind,
                value.span,
            ));
        };

        let (speed, direction) = match (
            self.cover(value.tokens.start..*comma),
            self.cover(comma + 1..value.tokens.end),
        ) {
            (Some(speed), Some(direction)) => (speed, direction),
            _ => {
                return Err(ParseReadingError::new(
                    ReadingErrorKind::MalformedWind,
                    value.span,
                ))
            }
        };

        let speed = self.parse_number("wind speed", speed)?;
        let direction = self.line[direction.clone()]
            .parse()
            .map_err(|e: UnknownDirection| ParseReadingError::new(e, direction))?;

        Ok((speed, direction))
    }
}
