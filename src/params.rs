use std::{fmt::Display, slice, sync::Arc};

use serde::{
	de::{DeserializeSeed, Deserializer, IntoDeserializer, MapAccess, SeqAccess, Visitor},
	forward_to_deserialize_any, Deserialize,
};

// --------------------------------------------------------------------------------
// --------------------------------------------------------------------------------

// Path parameters extracted from a matched path, in template declaration
// order. Names are unique because templates with repeated parameter names
// cannot be constructed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params(Vec<(Arc<str>, Box<str>)>);

impl Params {
	#[inline]
	pub(crate) fn new() -> Params {
		Params(Vec::new())
	}

	#[inline]
	pub(crate) fn with_capacity(capacity: usize) -> Params {
		Params(Vec::with_capacity(capacity))
	}

	#[inline]
	pub(crate) fn push(&mut self, name: Arc<str>, value: String) {
		self.0.push((name, value.into()));
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self
			.0
			.iter()
			.find(|(param_name, _)| param_name.as_ref() == name)
			.map(|(_, value)| value.as_ref())
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	#[inline]
	pub fn iter(&self) -> ParamsIter<'_> {
		ParamsIter(self.0.iter())
	}

	// Deserializes the parameters into T: structs and maps by parameter name,
	// sequences and tuples in declaration order, and a single parameter
	// directly into its value's type.
	pub fn deserialize_to<'de, T>(&'de self) -> Result<T, ParamsDeserializerError>
	where
		T: Deserialize<'de>,
	{
		T::deserialize(FromParams(&self.0))
	}
}

// -------------------------

impl<'p> IntoIterator for &'p Params {
	type Item = Param<'p>;
	type IntoIter = ParamsIter<'p>;

	#[inline]
	fn into_iter(self) -> ParamsIter<'p> {
		self.iter()
	}
}

// --------------------------------------------------

pub struct ParamsIter<'p>(slice::Iter<'p, (Arc<str>, Box<str>)>);

impl<'p> Iterator for ParamsIter<'p> {
	type Item = Param<'p>;

	fn next(&mut self) -> Option<Param<'p>> {
		self.0.next().map(|(name, value)| Param { name, value })
	}
}

// --------------------------------------------------

// Borrowed view of one extracted parameter.
#[derive(Debug, Clone, Copy)]
pub struct Param<'p> {
	name: &'p str,
	value: &'p str,
}

impl<'p> Param<'p> {
	#[inline(always)]
	pub fn name(&self) -> &'p str {
		self.name
	}

	#[inline(always)]
	pub fn value(&self) -> &'p str {
		self.value
	}
}

// --------------------------------------------------

#[derive(Debug, crate::ImplError)]
#[error("{0}")]
pub struct ParamsDeserializerError(Box<str>);

impl serde::de::Error for ParamsDeserializerError {
	fn custom<T>(msg: T) -> Self
	where
		T: Display,
	{
		Self(msg.to_string().into())
	}
}

// --------------------------------------------------

macro_rules! declare_deserialize_for_single_param {
	($($deserialize:ident)*) => {
		$(
			fn $deserialize<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
				self.single_param_value()?.$deserialize(visitor)
			}
		)*
	};
}

struct FromParams<'de>(&'de [(Arc<str>, Box<str>)]);

impl<'de> FromParams<'de> {
	fn single_param_value(&self) -> Result<FromParamValue<'de>, ParamsDeserializerError> {
		let [(_, value)] = self.0 else {
			return Err(serde::de::Error::custom(format_args!(
				"expected a single parameter, found {}",
				self.0.len(),
			)));
		};

		Ok(FromParamValue(value))
	}
}

impl<'de> Deserializer<'de> for FromParams<'de> {
	type Error = ParamsDeserializerError;

	fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		if self.0.len() == 1 {
			return self.single_param_value()?.deserialize_any(visitor);
		}

		self.deserialize_map(visitor)
	}

	declare_deserialize_for_single_param!(
		deserialize_bool
		deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
		deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
		deserialize_f32 deserialize_f64
		deserialize_char deserialize_str deserialize_string
		deserialize_bytes deserialize_byte_buf
	);

	fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		visitor.visit_some(self)
	}

	fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		visitor.visit_unit()
	}

	fn deserialize_unit_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		visitor.visit_unit()
	}

	fn deserialize_newtype_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		visitor.visit_newtype_struct(self)
	}

	fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		visitor.visit_seq(ParamsAccess::new(self.0))
	}

	fn deserialize_tuple<V: Visitor<'de>>(
		self,
		_len: usize,
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		self.deserialize_seq(visitor)
	}

	fn deserialize_tuple_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		_len: usize,
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		self.deserialize_seq(visitor)
	}

	fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		visitor.visit_map(ParamsAccess::new(self.0))
	}

	fn deserialize_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		_fields: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		self.deserialize_map(visitor)
	}

	fn deserialize_enum<V: Visitor<'de>>(
		self,
		name: &'static str,
		variants: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		self.single_param_value()?.deserialize_enum(name, variants, visitor)
	}

	fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		self.deserialize_any(visitor)
	}

	fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		visitor.visit_unit()
	}
}

// --------------------------------------------------

struct ParamsAccess<'de> {
	iter: slice::Iter<'de, (Arc<str>, Box<str>)>,
	some_value: Option<&'de str>,
}

impl<'de> ParamsAccess<'de> {
	fn new(params: &'de [(Arc<str>, Box<str>)]) -> Self {
		Self {
			iter: params.iter(),
			some_value: None,
		}
	}
}

impl<'de> MapAccess<'de> for ParamsAccess<'de> {
	type Error = ParamsDeserializerError;

	fn next_key_seed<K: DeserializeSeed<'de>>(
		&mut self,
		seed: K,
	) -> Result<Option<K::Value>, Self::Error> {
		let Some((name, value)) = self.iter.next() else {
			return Ok(None);
		};

		self.some_value = Some(value);

		seed.deserialize(name.as_ref().into_deserializer()).map(Some)
	}

	fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Self::Error> {
		let value = self
			.some_value
			.take()
			.expect("next_value_seed must follow next_key_seed");

		seed.deserialize(FromParamValue(value))
	}
}

impl<'de> SeqAccess<'de> for ParamsAccess<'de> {
	type Error = ParamsDeserializerError;

	fn next_element_seed<T: DeserializeSeed<'de>>(
		&mut self,
		seed: T,
	) -> Result<Option<T::Value>, Self::Error> {
		let Some((_, value)) = self.iter.next() else {
			return Ok(None);
		};

		seed.deserialize(FromParamValue(value)).map(Some)
	}
}

// --------------------------------------------------

macro_rules! declare_deserialize_for_parsable {
	($deserialize:ident, $visit:ident) => {
		fn $deserialize<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
			let Ok(value) = self.0.parse() else {
				return Err(serde::de::Error::custom(format_args!(
					"invalid value '{}'",
					self.0,
				)));
			};

			visitor.$visit(value)
		}
	};
}

#[derive(Clone, Copy)]
struct FromParamValue<'de>(&'de str);

impl<'de> Deserializer<'de> for FromParamValue<'de> {
	type Error = ParamsDeserializerError;

	fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		visitor.visit_borrowed_str(self.0)
	}

	declare_deserialize_for_parsable!(deserialize_bool, visit_bool);
	declare_deserialize_for_parsable!(deserialize_i8, visit_i8);
	declare_deserialize_for_parsable!(deserialize_i16, visit_i16);
	declare_deserialize_for_parsable!(deserialize_i32, visit_i32);
	declare_deserialize_for_parsable!(deserialize_i64, visit_i64);
	declare_deserialize_for_parsable!(deserialize_u8, visit_u8);
	declare_deserialize_for_parsable!(deserialize_u16, visit_u16);
	declare_deserialize_for_parsable!(deserialize_u32, visit_u32);
	declare_deserialize_for_parsable!(deserialize_u64, visit_u64);
	declare_deserialize_for_parsable!(deserialize_f32, visit_f32);
	declare_deserialize_for_parsable!(deserialize_f64, visit_f64);

	fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		let mut chars = self.0.chars();
		let (Some(value), None) = (chars.next(), chars.next()) else {
			return Err(serde::de::Error::custom(format_args!(
				"invalid value '{}'",
				self.0,
			)));
		};

		visitor.visit_char(value)
	}

	fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		visitor.visit_borrowed_str(self.0)
	}

	fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		visitor.visit_string(self.0.to_owned())
	}

	fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		visitor.visit_borrowed_bytes(self.0.as_bytes())
	}

	fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		visitor.visit_byte_buf(self.0.as_bytes().to_owned())
	}

	fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		visitor.visit_some(self)
	}

	fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		visitor.visit_unit()
	}

	fn deserialize_unit_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		visitor.visit_unit()
	}

	fn deserialize_newtype_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		visitor.visit_newtype_struct(self)
	}

	fn deserialize_enum<V: Visitor<'de>>(
		self,
		_name: &'static str,
		_variants: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		visitor.visit_enum(self.0.into_deserializer())
	}

	forward_to_deserialize_any! {
		seq tuple tuple_struct map struct identifier ignored_any
	}
}

// --------------------------------------------------------------------------------
// --------------------------------------------------------------------------------
