use std::fmt::{self, Write};

use crate::config::DelimiterConfig;

// --------------------------------------------------------------------------------
// --------------------------------------------------------------------------------

pub(crate) const SLASH_REJECTING_PARAM_REGEX: &str = "[^/]+?";
pub(crate) const SLASH_ACCEPTING_PARAM_REGEX: &str = ".+?";
pub(crate) const WILDCARD_REGEX: &str = "[^/]*?";

// --------------------------------------------------

// One `/`-delimited piece of a route template. A mixed-content piece like
// `file-*.txt` becomes a Composite; Composites are flat and never contain
// adjacent literals or adjacent wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
	Literal(Box<str>),
	SlashRejectingParam(Box<str>),
	SlashAcceptingParam(Box<str>),
	Wildcard,
	Composite(Vec<Segment>),
}

impl Segment {
	// Regex fragment used to test whether a path matches. Nothing is grouped.
	pub(crate) fn match_fragment(&self, buf: &mut String) {
		match self {
			Segment::Literal(content) => buf.push_str(&regex::escape(content)),
			Segment::SlashRejectingParam(_) => buf.push_str(SLASH_REJECTING_PARAM_REGEX),
			Segment::SlashAcceptingParam(_) => buf.push_str(SLASH_ACCEPTING_PARAM_REGEX),
			Segment::Wildcard => buf.push_str(WILDCARD_REGEX),
			Segment::Composite(subsegments) => {
				for subsegment in subsegments {
					subsegment.match_fragment(buf);
				}
			}
		}
	}

	// Same shape as the match fragment, with parameters in capturing groups.
	pub(crate) fn param_capture_fragment(&self, buf: &mut String) {
		match self {
			Segment::SlashRejectingParam(_) => {
				buf.push('(');
				buf.push_str(SLASH_REJECTING_PARAM_REGEX);
				buf.push(')');
			}
			Segment::SlashAcceptingParam(_) => {
				buf.push('(');
				buf.push_str(SLASH_ACCEPTING_PARAM_REGEX);
				buf.push(')');
			}
			Segment::Composite(subsegments) => {
				for subsegment in subsegments {
					subsegment.param_capture_fragment(buf);
				}
			}
			_ => self.match_fragment(buf),
		}
	}

	// Same shape as the match fragment, with wildcards in capturing groups.
	pub(crate) fn splat_capture_fragment(&self, buf: &mut String) {
		match self {
			Segment::Wildcard => {
				buf.push('(');
				buf.push_str(WILDCARD_REGEX);
				buf.push(')');
			}
			Segment::Composite(subsegments) => {
				for subsegment in subsegments {
					subsegment.splat_capture_fragment(buf);
				}
			}
			_ => self.match_fragment(buf),
		}
	}

	pub(crate) fn collect_param_names<'s>(&'s self, names: &mut Vec<&'s str>) {
		match self {
			Segment::SlashRejectingParam(name) | Segment::SlashAcceptingParam(name) => {
				names.push(name);
			}
			Segment::Composite(subsegments) => {
				for subsegment in subsegments {
					subsegment.collect_param_names(names);
				}
			}
			_ => {}
		}
	}

	// Renders the segment back in its template form.
	pub(crate) fn write_canonical(
		&self,
		config: &DelimiterConfig,
		f: &mut fmt::Formatter<'_>,
	) -> fmt::Result {
		match self {
			Segment::Literal(content) => f.write_str(content),
			Segment::SlashRejectingParam(name) => {
				f.write_char(config.opening_type1())?;
				f.write_str(name)?;

				if let Some(closing) = config.closing_type1() {
					f.write_char(closing)?;
				}

				Ok(())
			}
			Segment::SlashAcceptingParam(name) => {
				// A type 2 parameter can only have been parsed with the pair configured.
				if let Some((opening, closing)) = config.type2() {
					f.write_char(opening)?;
					f.write_str(name)?;
					f.write_char(closing)?;
				}

				Ok(())
			}
			Segment::Wildcard => f.write_char('*'),
			Segment::Composite(subsegments) => {
				for subsegment in subsegments {
					subsegment.write_canonical(config, f)?;
				}

				Ok(())
			}
		}
	}
}

// --------------------------------------------------

// Folds a token stream into a single segment: nested composites are
// flattened, adjacent literals merged, repeated wildcards collapsed, and a
// single remaining token is returned unwrapped.
pub(crate) fn fold(tokens: Vec<Segment>) -> Segment {
	let mut subsegments = Vec::with_capacity(tokens.len());

	for token in tokens {
		if let Segment::Composite(nested) = token {
			for nested_token in nested {
				push_folded(&mut subsegments, nested_token);
			}
		} else {
			push_folded(&mut subsegments, token);
		}
	}

	if subsegments.len() > 1 {
		return Segment::Composite(subsegments);
	}

	subsegments.pop().unwrap_or(Segment::Composite(Vec::new()))
}

fn push_folded(subsegments: &mut Vec<Segment>, token: Segment) {
	match &token {
		Segment::Literal(content) => {
			if let Some(Segment::Literal(previous)) = subsegments.last_mut() {
				*previous = format!("{}{}", previous, content).into();

				return;
			}
		}
		Segment::Wildcard => {
			if subsegments.last() == Some(&Segment::Wildcard) {
				return;
			}
		}
		_ => {}
	}

	subsegments.push(token);
}

// --------------------------------------------------------------------------------
// --------------------------------------------------------------------------------
