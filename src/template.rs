use std::{
	fmt::{self, Display, Write},
	sync::Arc,
};

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::{config::DelimiterConfig, params::Params, segment::Segment, tokenizer};

// --------------------------------------------------------------------------------
// --------------------------------------------------------------------------------

const MATCH_EVERY_SUB_PATH_MARKER: &str = "**";

// Appended as an extra trailing alternative segment when a template ends in
// `**`; unlike a wildcard, it crosses `/` boundaries.
const SUB_PATH_CATCH_ALL_REGEX: &str = ".*?";
const GROUPED_SUB_PATH_CATCH_ALL_REGEX: &str = "(.*?)";

// --------------------------------------------------

// A compiled route template like `/users/{id}/orders/<rest>`. Construction
// is the only fallible operation; matching and extraction never fail.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
	raw: Box<str>,
	config: DelimiterConfig,
	segments: Vec<Segment>,
	match_every_sub_path: bool,
	param_names: Vec<Arc<str>>,

	// One alternative each, or two when `match_every_sub_path` is set; the
	// same index across the three families refers to the same alternative.
	match_regexes: Vec<Regex>,
	param_capture_regexes: Vec<Regex>,
	splat_capture_regexes: Vec<Regex>,
}

impl RouteTemplate {
	// Parses with the default bracket delimiters, ignoring trailing slashes.
	pub fn new(pattern: &str) -> Result<RouteTemplate, TemplateError> {
		Self::parse(pattern, &DelimiterConfig::default(), true)
	}

	pub fn parse(
		pattern: &str,
		config: &DelimiterConfig,
		ignore_trailing_slashes: bool,
	) -> Result<RouteTemplate, TemplateError> {
		let (path, match_every_sub_path) = match pattern.strip_suffix(MATCH_EVERY_SUB_PATH_MARKER)
		{
			Some(path) => (path, true),
			None => (pattern, false),
		};

		let mut segments = Vec::new();
		for piece in path.split('/').filter(|piece| !piece.is_empty()) {
			segments.push(tokenizer::tokenize(piece, pattern, config)?);
		}

		let mut param_names = Vec::new();
		for segment in &segments {
			segment.collect_param_names(&mut param_names);
		}

		for (i, name) in param_names.iter().enumerate() {
			if param_names[..i].contains(name) {
				return Err(TemplateError::DuplicateParameterName {
					name: (*name).into(),
					template: pattern.into(),
				});
			}
		}

		let suffix = if ignore_trailing_slashes {
			"/?"
		} else if pattern.ends_with('/') {
			"/"
		} else {
			""
		};

		// The `^` anchor is followed by a `/` for every segment; for the root
		// template that leading slash is the whole path, so a bare `/` suffix
		// would demand a second one.
		let suffix = if segments.is_empty() && suffix == "/" {
			""
		} else {
			suffix
		};

		let match_regexes = compile_alternatives(
			&segments,
			match_every_sub_path,
			suffix,
			SUB_PATH_CATCH_ALL_REGEX,
			Segment::match_fragment,
		);

		let param_capture_regexes = compile_alternatives(
			&segments,
			match_every_sub_path,
			suffix,
			SUB_PATH_CATCH_ALL_REGEX,
			Segment::param_capture_fragment,
		);

		let splat_capture_regexes = compile_alternatives(
			&segments,
			match_every_sub_path,
			suffix,
			GROUPED_SUB_PATH_CATCH_ALL_REGEX,
			Segment::splat_capture_fragment,
		);

		let param_names: Vec<Arc<str>> = param_names.into_iter().map(Arc::from).collect();

		Ok(Self {
			raw: pattern.into(),
			config: *config,
			segments,
			match_every_sub_path,
			param_names,
			match_regexes,
			param_capture_regexes,
			splat_capture_regexes,
		})
	}

	#[inline(always)]
	pub fn pattern(&self) -> &str {
		&self.raw
	}

	#[inline(always)]
	pub fn matches_every_sub_path(&self) -> bool {
		self.match_every_sub_path
	}

	pub fn param_names(&self) -> impl Iterator<Item = &str> {
		self.param_names.iter().map(AsRef::as_ref)
	}

	pub fn matches(&self, path: &str) -> bool {
		self.match_regexes.iter().any(|regex| regex.is_match(path))
	}

	// Extracted parameters in declaration order, percent-decoded. A
	// non-matching path yields no parameters.
	pub fn path_params(&self, path: &str) -> Params {
		let Some(index) = self.matching_alternative(path) else {
			return Params::new();
		};

		let Some(captures) = self.param_capture_regexes[index].captures(path) else {
			return Params::new();
		};

		let mut params = Params::with_capacity(self.param_names.len());
		for (name, some_capture) in self.param_names.iter().zip(captures.iter().skip(1)) {
			if let Some(capture) = some_capture {
				params.push(name.clone(), percent_decoded(capture.as_str()));
			}
		}

		params
	}

	// Wildcard captures in left-to-right order, percent-decoded. Empty when
	// the template has no wildcards or the path does not match.
	pub fn splats(&self, path: &str) -> Vec<String> {
		let Some(index) = self.matching_alternative(path) else {
			return Vec::new();
		};

		let Some(captures) = self.splat_capture_regexes[index].captures(path) else {
			return Vec::new();
		};

		captures
			.iter()
			.skip(1)
			.flatten()
			.map(|capture| percent_decoded(capture.as_str()))
			.collect()
	}

	#[inline]
	fn matching_alternative(&self, path: &str) -> Option<usize> {
		self.match_regexes.iter().position(|regex| regex.is_match(path))
	}
}

// -------------------------

impl Display for RouteTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.segments.is_empty() && !self.match_every_sub_path {
			return f.write_char('/');
		}

		for segment in &self.segments {
			f.write_char('/')?;
			segment.write_canonical(&self.config, f)?;
		}

		if self.match_every_sub_path {
			f.write_str("/**")?;
		}

		Ok(())
	}
}

// --------------------------------------------------

fn compile_alternatives<F>(
	segments: &[Segment],
	match_every_sub_path: bool,
	suffix: &str,
	catch_all: &str,
	fragment: F,
) -> Vec<Regex>
where
	F: Fn(&Segment, &mut String),
{
	let mut alternatives = vec![compile(segments, None, suffix, &fragment)];

	if match_every_sub_path {
		alternatives.push(compile(segments, Some(catch_all), suffix, &fragment));
	}

	alternatives
}

fn compile<F>(
	segments: &[Segment],
	some_catch_all: Option<&str>,
	suffix: &str,
	fragment: &F,
) -> Regex
where
	F: Fn(&Segment, &mut String),
{
	let mut pattern = String::from("^");

	for segment in segments {
		pattern.push('/');
		fragment(segment, &mut pattern);
	}

	if let Some(catch_all) = some_catch_all {
		pattern.push('/');
		pattern.push_str(catch_all);
	} else if segments.is_empty() {
		pattern.push('/');
	}

	pattern.push_str(suffix);
	pattern.push('$');

	Regex::new(&pattern).expect("a compiled route template regex must be valid")
}

fn percent_decoded(value: &str) -> String {
	percent_decode_str(value).decode_utf8_lossy().into_owned()
}

// --------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, crate::ImplError)]
pub enum TemplateError {
	#[error("segment '{segment}' in route template '{template}' is missing a closing delimiter")]
	MissingClosingDelimiter { segment: Box<str>, template: Box<str> },
	#[error(
		"segment '{segment}' in route template '{template}' puts a wildcard and a parameter side by side"
	)]
	AdjacentWildcardAndParameter { segment: Box<str>, template: Box<str> },
	#[error("parameter name '{name}' is used more than once in route template '{template}'")]
	DuplicateParameterName { name: Box<str>, template: Box<str> },
}

impl TemplateError {
	#[inline]
	pub(crate) fn missing_closing_delimiter(segment: &str, template: &str) -> Self {
		Self::MissingClosingDelimiter {
			segment: segment.into(),
			template: template.into(),
		}
	}

	#[inline]
	pub(crate) fn adjacent_wildcard_and_parameter(segment: &str, template: &str) -> Self {
		Self::AdjacentWildcardAndParameter {
			segment: segment.into(),
			template: template.into(),
		}
	}
}

// --------------------------------------------------------------------------------
// --------------------------------------------------------------------------------

#[cfg(test)]
mod test {
	use super::*;

	// --------------------------------------------------
	// --------------------------------------------------

	fn template(pattern: &str) -> RouteTemplate {
		RouteTemplate::new(pattern).expect("pattern must be valid")
	}

	fn strict(pattern: &str) -> RouteTemplate {
		RouteTemplate::parse(pattern, &DelimiterConfig::brackets(), false)
			.expect("pattern must be valid")
	}

	#[test]
	fn param_round_trip() {
		let template = template("/users/{id}");

		assert!(template.matches("/users/42"));
		assert_eq!(template.path_params("/users/42").get("id"), Some("42"));
		assert!(!template.matches("/users"));
		assert!(!template.matches("/users/42/orders"));
	}

	#[test]
	fn duplicate_parameter_names_are_rejected() {
		assert_eq!(
			RouteTemplate::new("/a/{id}/b/{id}").unwrap_err(),
			TemplateError::DuplicateParameterName {
				name: "id".into(),
				template: "/a/{id}/b/{id}".into(),
			},
		);

		// Across parameter kinds and nested in mixed segments too.
		assert!(matches!(
			RouteTemplate::new("/a/{id}/b/pre-<id>"),
			Err(TemplateError::DuplicateParameterName { .. }),
		));
	}

	#[test]
	fn adjacent_wildcards_and_parameters_are_rejected() {
		for pattern in ["/a/*{x}", "/a/{x}*", "/a/*<x>", "/a/<x>*"] {
			assert!(
				matches!(
					RouteTemplate::new(pattern),
					Err(TemplateError::AdjacentWildcardAndParameter { .. }),
				),
				"pattern: {}",
				pattern,
			);
		}
	}

	#[test]
	fn unclosed_parameters_are_rejected() {
		assert!(matches!(
			RouteTemplate::new("/a/{id"),
			Err(TemplateError::MissingClosingDelimiter { .. }),
		));
	}

	#[test]
	fn wildcards_reject_slashes() {
		let template = template("/a/*");

		assert!(template.matches("/a/anything"));
		assert!(template.matches("/a/"));
		assert!(!template.matches("/a/anything/with/slashes"));
	}

	#[test]
	fn slash_accepting_params_accept_slashes() {
		let template = template("/a/<x>");

		assert!(template.matches("/a/anything/with/slashes"));
		assert_eq!(
			template.path_params("/a/anything/with/slashes").get("x"),
			Some("anything/with/slashes"),
		);

		// The slash-rejecting form stops at the segment boundary.
		assert!(!RouteTemplate::new("/a/{x}")
			.unwrap()
			.matches("/a/anything/with/slashes"));
	}

	#[test]
	fn match_every_sub_path() {
		let template = template("/files/**");

		assert!(template.matches("/files"));
		assert!(template.matches("/files/"));
		assert!(template.matches("/files/a/b/c"));
		assert!(!template.matches("/file"));

		assert_eq!(template.splats("/files/a/b/c"), ["a/b/c"]);
		assert_eq!(template.splats("/files"), Vec::<String>::new());
	}

	#[test]
	fn match_every_sub_path_with_params() {
		let template = template("/files/{dir}/**");

		assert!(template.matches("/files/etc"));
		assert!(template.matches("/files/etc/app/conf.d"));
		assert_eq!(
			template.path_params("/files/etc/app/conf.d").get("dir"),
			Some("etc"),
		);
		assert_eq!(template.splats("/files/etc/app/conf.d"), ["app/conf.d"]);
	}

	#[test]
	fn bare_sub_path_template_matches_everything() {
		let template = template("/**");

		assert!(template.matches("/"));
		assert!(template.matches("/a"));
		assert!(template.matches("/a/b/c"));
	}

	#[test]
	fn trailing_slash_modes() {
		let ignoring = template("/a/{x}");
		assert!(ignoring.matches("/a/1"));
		assert!(ignoring.matches("/a/1/"));
		assert_eq!(ignoring.path_params("/a/1/").get("x"), Some("1"));

		let exact = strict("/a/{x}");
		assert!(exact.matches("/a/1"));
		assert!(!exact.matches("/a/1/"));

		let exact_with_slash = strict("/a/{x}/");
		assert!(!exact_with_slash.matches("/a/1"));
		assert!(exact_with_slash.matches("/a/1/"));
	}

	#[test]
	fn root_template() {
		assert!(template("/").matches("/"));
		assert!(strict("/").matches("/"));
		assert!(!strict("/").matches("/a"));
	}

	#[test]
	fn splats_and_params_are_independent() {
		let template = template("/a/{id}/*");

		assert!(template.matches("/a/7/extra"));

		let params = template.path_params("/a/7/extra");
		assert_eq!(params.get("id"), Some("7"));
		assert_eq!(params.len(), 1);

		assert_eq!(template.splats("/a/7/extra"), ["extra"]);
	}

	#[test]
	fn multiple_splats_in_order() {
		let template = template("/say/*/to/*");

		assert_eq!(template.splats("/say/hello/to/world"), ["hello", "world"]);
	}

	#[test]
	fn mixed_segment_extraction() {
		let template = template("/logs/file-*.{ext}");

		assert!(template.matches("/logs/file-2024.txt"));

		let params = template.path_params("/logs/file-2024.txt");
		assert_eq!(params.get("ext"), Some("txt"));

		assert_eq!(template.splats("/logs/file-2024.txt"), ["2024"]);
	}

	#[test]
	fn bracket_scenario() {
		let template = template("/users/{id}/orders/<rest>");

		assert!(template.matches("/users/42/orders/2024/q1"));

		let params = template.path_params("/users/42/orders/2024/q1");
		assert_eq!(params.get("id"), Some("42"));
		assert_eq!(params.get("rest"), Some("2024/q1"));

		assert_eq!(
			template.splats("/users/42/orders/2024/q1"),
			Vec::<String>::new(),
		);
	}

	#[test]
	fn colon_scenario() {
		let template = RouteTemplate::parse(":id", &DelimiterConfig::colon(), true)
			.expect("pattern must be valid");

		assert!(template.matches("/123"));
		assert_eq!(template.path_params("/123").get("id"), Some("123"));
	}

	#[test]
	fn values_are_percent_decoded() {
		let template = template("/users/{name}/files/*");

		let params = template.path_params("/users/John%20Doe/files/a%2Fb");
		assert_eq!(params.get("name"), Some("John Doe"));

		assert_eq!(template.splats("/users/John%20Doe/files/a%2Fb"), ["a/b"]);
	}

	#[test]
	fn plus_is_not_a_space() {
		let template = template("/users/{name}");

		assert_eq!(template.path_params("/users/a+b").get("name"), Some("a+b"));
	}

	#[test]
	fn non_matching_paths_yield_nothing() {
		let template = template("/a/{id}/*");

		assert!(!template.matches("/b/7/extra"));
		assert!(template.path_params("/b/7/extra").is_empty());
		assert_eq!(template.splats("/b/7/extra"), Vec::<String>::new());
	}

	#[test]
	fn doubled_slashes_are_dropped() {
		let template = template("/a//b");

		assert!(template.matches("/a/b"));
		assert!(!template.matches("/a//b"));
	}

	#[test]
	fn literals_match_exactly() {
		let template = template("/file.txt");

		assert!(template.matches("/file.txt"));
		assert!(!template.matches("/fileXtxt"));
	}

	#[test]
	fn canonical_display() {
		let cases = [
			("/users/{id}/orders/<rest>", "/users/{id}/orders/<rest>"),
			("/files/**", "/files/**"),
			("/a//b/", "/a/b"),
			("/", "/"),
			("**", "/**"),
		];

		for (pattern, expected) in cases {
			assert_eq!(template(pattern).to_string(), expected, "pattern: {}", pattern);
		}

		let colon = RouteTemplate::parse("/users/:id", &DelimiterConfig::colon(), true)
			.expect("pattern must be valid");
		assert_eq!(colon.to_string(), "/users/:id");
	}

	#[test]
	fn param_names_in_declaration_order() {
		let route = template("/{a}/x/{b}-<c>/*");

		assert_eq!(route.param_names().collect::<Vec<_>>(), ["a", "b", "c"]);
		assert_eq!(route.pattern(), "/{a}/x/{b}-<c>/*");
		assert!(!route.matches_every_sub_path());
		assert!(template("/files/**").matches_every_sub_path());
	}
}
