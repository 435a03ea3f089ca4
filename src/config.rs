// --------------------------------------------------------------------------------
// --------------------------------------------------------------------------------

// Delimiter dialect of route templates. Type 1 delimits slash-rejecting
// parameters, type 2 slash-accepting ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterConfig {
	opening_type1: char,
	some_closing_type1: Option<char>,
	optional_closing_type1: bool,
	some_type2: Option<(char, char)>,
}

impl DelimiterConfig {
	pub fn new(
		opening_type1: char,
		some_closing_type1: Option<char>,
		optional_closing_type1: bool,
		some_type2: Option<(char, char)>,
	) -> Result<DelimiterConfig, DelimiterError> {
		let mut delimiters = vec![opening_type1];
		delimiters.extend(some_closing_type1);

		if let Some((opening_type2, closing_type2)) = some_type2 {
			delimiters.push(opening_type2);
			delimiters.push(closing_type2);
		}

		for (i, delimiter) in delimiters.iter().enumerate() {
			if *delimiter == '/' || *delimiter == '*' {
				return Err(DelimiterError::ReservedCharacter(*delimiter));
			}

			if delimiters[i + 1..].contains(delimiter) {
				return Err(DelimiterError::OverlappingDelimiters(*delimiter));
			}
		}

		if some_closing_type1.is_none() && !optional_closing_type1 {
			return Err(DelimiterError::UnclosableType1);
		}

		Ok(Self {
			opening_type1,
			some_closing_type1,
			optional_closing_type1,
			some_type2,
		})
	}

	// `{name}` and `<name>` parameters.
	pub fn brackets() -> DelimiterConfig {
		Self {
			opening_type1: '{',
			some_closing_type1: Some('}'),
			optional_closing_type1: false,
			some_type2: Some(('<', '>')),
		}
	}

	// `:name` parameters without a closing delimiter; type 2 is disabled.
	pub fn colon() -> DelimiterConfig {
		Self {
			opening_type1: ':',
			some_closing_type1: None,
			optional_closing_type1: true,
			some_type2: None,
		}
	}

	#[inline(always)]
	pub fn opening_type1(&self) -> char {
		self.opening_type1
	}

	#[inline(always)]
	pub fn closing_type1(&self) -> Option<char> {
		self.some_closing_type1
	}

	#[inline(always)]
	pub fn optional_closing_type1(&self) -> bool {
		self.optional_closing_type1
	}

	#[inline(always)]
	pub fn type2(&self) -> Option<(char, char)> {
		self.some_type2
	}

	#[inline]
	pub(crate) fn is_delimiter(&self, ch: char) -> bool {
		self.is_opening(ch) || self.is_closing(ch)
	}

	#[inline]
	pub(crate) fn is_opening(&self, ch: char) -> bool {
		ch == self.opening_type1 || self.some_type2.is_some_and(|(opening, _)| ch == opening)
	}

	#[inline]
	pub(crate) fn is_closing(&self, ch: char) -> bool {
		self.some_closing_type1 == Some(ch)
			|| self.some_type2.is_some_and(|(_, closing)| ch == closing)
	}
}

// -------------------------

impl Default for DelimiterConfig {
	fn default() -> Self {
		Self::brackets()
	}
}

// --------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, crate::ImplError)]
pub enum DelimiterError {
	#[error("'{0}' is reserved in route templates and cannot be a delimiter")]
	ReservedCharacter(char),
	#[error("'{0}' is assigned to more than one delimiter role")]
	OverlappingDelimiters(char),
	#[error("type 1 parameters must have a closing delimiter when closing is not optional")]
	UnclosableType1,
}

// --------------------------------------------------------------------------------
// --------------------------------------------------------------------------------
