use std::mem;

use crate::{
	config::DelimiterConfig,
	segment::{self, Segment},
	template::TemplateError,
};

// --------------------------------------------------------------------------------
// --------------------------------------------------------------------------------

// Turns one `/`-delimited piece of a route template into a single segment.
// `template` is carried only for error messages.
pub(crate) fn tokenize(
	piece: &str,
	template: &str,
	config: &DelimiterConfig,
) -> Result<Segment, TemplateError> {
	validate(piece, template, config)?;

	if let Some(pure_segment) = as_pure_segment(piece, config) {
		return Ok(pure_segment);
	}

	scan(piece, template, config)
}

// --------------------------------------------------

fn validate(piece: &str, template: &str, config: &DelimiterConfig) -> Result<(), TemplateError> {
	let delimiter_count = piece.chars().filter(|ch| config.is_delimiter(*ch)).count();
	if delimiter_count % 2 != 0 && !config.optional_closing_type1() {
		return Err(TemplateError::missing_closing_delimiter(piece, template));
	}

	let mut chars = piece.chars().peekable();
	while let Some(ch) = chars.next() {
		let Some(next_ch) = chars.peek() else {
			break;
		};

		// A wildcard butting against a parameter cannot be matched unambiguously
		// with reluctant patterns.
		if (ch == '*' && config.is_opening(*next_ch)) || (config.is_closing(ch) && *next_ch == '*')
		{
			return Err(TemplateError::adjacent_wildcard_and_parameter(
				piece, template,
			));
		}
	}

	Ok(())
}

// Shortcuts for pieces that are a single parameter, a lone wildcard, or
// plain literal text, so the common cases skip the state machine.
fn as_pure_segment(piece: &str, config: &DelimiterConfig) -> Option<Segment> {
	if let Some(rest) = piece.strip_prefix(config.opening_type1()) {
		if let Some(closing) = config.closing_type1() {
			if let Some(name) = rest.strip_suffix(closing) {
				if is_plain(name, config) {
					return Some(Segment::SlashRejectingParam(name.into()));
				}
			}
		}

		if config.optional_closing_type1() && is_plain(rest, config) {
			return Some(Segment::SlashRejectingParam(rest.into()));
		}
	}

	if let Some((opening, closing)) = config.type2() {
		if let Some(name) = piece
			.strip_prefix(opening)
			.and_then(|rest| rest.strip_suffix(closing))
		{
			if is_plain(name, config) {
				return Some(Segment::SlashAcceptingParam(name.into()));
			}
		}
	}

	if piece == "*" {
		return Some(Segment::Wildcard);
	}

	if is_plain(piece, config) {
		return Some(Segment::Literal(piece.into()));
	}

	None
}

fn is_plain(text: &str, config: &DelimiterConfig) -> bool {
	text.chars().all(|ch| ch != '*' && !config.is_delimiter(ch))
}

// --------------------------------------------------

enum State {
	Normal,
	InsideType1,
	InsideType2,
}

// Single left-to-right scan for mixed-content pieces like `pre-{id}-post*`.
fn scan(piece: &str, template: &str, config: &DelimiterConfig) -> Result<Segment, TemplateError> {
	let mut tokens = Vec::new();
	let mut literal_buf = String::new();
	let mut name_buf = String::new();
	let mut state = State::Normal;

	for ch in piece.chars() {
		match state {
			State::Normal => {
				if ch == '*' {
					flush_literal(&mut literal_buf, &mut tokens);

					if tokens.last() != Some(&Segment::Wildcard) {
						tokens.push(Segment::Wildcard);
					}
				} else if ch == config.opening_type1() {
					flush_literal(&mut literal_buf, &mut tokens);
					state = State::InsideType1;
				} else if config.type2().is_some_and(|(opening, _)| ch == opening) {
					flush_literal(&mut literal_buf, &mut tokens);
					state = State::InsideType2;
				} else if config.is_delimiter(ch) {
					// A closing delimiter with no matching opener.
					return Err(TemplateError::missing_closing_delimiter(piece, template));
				} else {
					literal_buf.push(ch);
				}
			}
			State::InsideType1 => {
				if config.closing_type1() == Some(ch) {
					tokens.push(Segment::SlashRejectingParam(mem::take(&mut name_buf).into()));
					state = State::Normal;
				} else if config.is_delimiter(ch) {
					// Parameters cannot nest.
					return Err(TemplateError::missing_closing_delimiter(piece, template));
				} else {
					name_buf.push(ch);
				}
			}
			State::InsideType2 => {
				if config.type2().is_some_and(|(_, closing)| ch == closing) {
					tokens.push(Segment::SlashAcceptingParam(mem::take(&mut name_buf).into()));
					state = State::Normal;
				} else if config.is_delimiter(ch) {
					return Err(TemplateError::missing_closing_delimiter(piece, template));
				} else {
					name_buf.push(ch);
				}
			}
		}
	}

	match state {
		State::Normal => flush_literal(&mut literal_buf, &mut tokens),
		State::InsideType1 if config.optional_closing_type1() => {
			tokens.push(Segment::SlashRejectingParam(name_buf.into()));
		}
		_ => return Err(TemplateError::missing_closing_delimiter(piece, template)),
	}

	Ok(segment::fold(tokens))
}

fn flush_literal(literal_buf: &mut String, tokens: &mut Vec<Segment>) {
	if !literal_buf.is_empty() {
		tokens.push(Segment::Literal(mem::take(literal_buf).into()));
	}
}

// --------------------------------------------------------------------------------
// --------------------------------------------------------------------------------
