use serde::{
    de::DeserializeOwned,
    ser::{self, Error as _},
    Serialize, Serializer,
};
use serde_json::Value;

use crate::error::ArgumentError;

/// Dynamically typed, ordered argument list recorded with an outcome.
///
/// Values are kept as JSON values and decoded into a probe handler's
/// parameters by position, so every outcome of a set may carry arguments of
/// different types.
///
/// ```
/// use outcomes::Arguments;
///
/// let args = Arguments::encode(("ok", 200)).unwrap();
/// assert_eq!(args.len(), 2);
/// assert_eq!(args.get::<u16>(1).unwrap(), 200);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Vec<Value>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes every element of a tuple (or any other `IntoArguments`) in order.
    pub fn encode<A>(args: A) -> Result<Self, ArgumentError>
    where
        A: IntoArguments,
    {
        args.into_arguments()
    }

    /// Appends single serializable value.
    pub fn push<T>(mut self, value: T) -> Result<Self, ArgumentError>
    where
        T: Serialize,
    {
        let index = self.0.len();
        value
            .serialize(FiniteCheck)
            .map_err(|source| ArgumentError::Encode { index, source })?;
        let value =
            serde_json::to_value(value).map_err(|source| ArgumentError::Encode { index, source })?;
        self.0.push(value);
        Ok(self)
    }

    /// Decodes value at given position.
    pub fn get<T>(&self, index: usize) -> Result<T, ArgumentError>
    where
        T: FromArgument,
    {
        let value = self.0.get(index).ok_or(ArgumentError::Count {
            expected: index + 1,
            found: self.0.len(),
        })?;
        T::from_argument(index, value)
    }

    /// Fails unless exactly `expected` values were recorded.
    pub fn expect_len(&self, expected: usize) -> Result<(), ArgumentError> {
        if self.0.len() == expected {
            Ok(())
        } else {
            Err(ArgumentError::Count {
                expected,
                found: self.0.len(),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// Serializer that writes nothing and only fails on NaN or infinite floats,
/// which `serde_json` would otherwise store as `null`.
struct FiniteCheck;

macro_rules! accept {
    ($($method:ident: $ty:ty),+) => {
        $(
            fn $method(self, _v: $ty) -> Result<(), serde_json::Error> {
                Ok(())
            }
        )+
    };
}

fn finite(v: f64) -> Result<(), serde_json::Error> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(serde_json::Error::custom(format!("non-finite float {}", v)))
    }
}

impl Serializer for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    accept!(
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
        serialize_char: char,
        serialize_str: &str,
        serialize_bytes: &[u8],
        serialize_unit_struct: &'static str
    );

    fn serialize_f32(self, v: f32) -> Result<(), serde_json::Error> {
        finite(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), serde_json::Error> {
        finite(v)
    }

    fn serialize_none(self) -> Result<(), serde_json::Error> {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<(), serde_json::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), serde_json::Error> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<(), serde_json::Error> {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, serde_json::Error> {
        Ok(self)
    }
}

/// Compound types just check every element they are given.
macro_rules! check_compound {
    ($($trait:ident :: $method:ident),+) => {
        $(
            impl ser::$trait for FiniteCheck {
                type Ok = ();
                type Error = serde_json::Error;

                fn $method<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), serde_json::Error> {
                    value.serialize(FiniteCheck)
                }

                fn end(self) -> Result<(), serde_json::Error> {
                    Ok(())
                }
            }
        )+
    };
}

check_compound!(
    SerializeSeq::serialize_element,
    SerializeTuple::serialize_element,
    SerializeTupleStruct::serialize_field,
    SerializeTupleVariant::serialize_field
);

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), serde_json::Error> {
        key.serialize(FiniteCheck)
    }

    fn serialize_value<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Result<(), serde_json::Error> {
        Ok(())
    }
}

macro_rules! check_struct {
    ($($trait:ident),+) => {
        $(
            impl ser::$trait for FiniteCheck {
                type Ok = ();
                type Error = serde_json::Error;

                fn serialize_field<T: ?Sized + Serialize>(
                    &mut self,
                    _key: &'static str,
                    value: &T,
                ) -> Result<(), serde_json::Error> {
                    value.serialize(FiniteCheck)
                }

                fn end(self) -> Result<(), serde_json::Error> {
                    Ok(())
                }
            }
        )+
    };
}

check_struct!(SerializeStruct, SerializeStructVariant);

/// Allows probe handler parameters to be created from a recorded value.
///
/// Implemented for every deserializable type.
pub trait FromArgument: Sized {
    fn from_argument(index: usize, value: &Value) -> Result<Self, ArgumentError>;
}

impl<T> FromArgument for T
where
    T: DeserializeOwned,
{
    fn from_argument(index: usize, value: &Value) -> Result<Self, ArgumentError> {
        T::deserialize(value).map_err(|source| ArgumentError::Decode { index, source })
    }
}

/// Types that can be turned into an ordered `Arguments` list.
pub trait IntoArguments {
    fn into_arguments(self) -> Result<Arguments, ArgumentError>;
}

impl IntoArguments for Arguments {
    fn into_arguments(self) -> Result<Arguments, ArgumentError> {
        Ok(self)
    }
}

impl IntoArguments for () {
    fn into_arguments(self) -> Result<Arguments, ArgumentError> {
        Ok(Arguments::new())
    }
}

/// Macro for tuple `IntoArguments` implementations.
macro_rules! implement_into_arguments {
    ($($ty:ident),+) => {
        #[allow(non_snake_case)]
        impl<$($ty,)+> IntoArguments for ($($ty,)+)
        where
            $($ty: Serialize,)+
        {
            fn into_arguments(self) -> Result<Arguments, ArgumentError> {
                let ($($ty,)+) = self;
                Ok(Arguments::new()$(.push($ty)?)+)
            }
        }
    };
}

implement_into_arguments!(T1);
implement_into_arguments!(T1, T2);
implement_into_arguments!(T1, T2, T3);
implement_into_arguments!(T1, T2, T3, T4);
implement_into_arguments!(T1, T2, T3, T4, T5);
implement_into_arguments!(T1, T2, T3, T4, T5, T6);

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Tweet {
        id: u64,
        text: String,
    }

    #[test]
    fn test_encode_keeps_order() -> anyhow::Result<()> {
        let tweet = Tweet {
            id: 7,
            text: "hello".into(),
        };
        let args = Arguments::encode(("posted", tweet, true))?;

        assert_eq!(
            args.values(),
            &[json!("posted"), json!({"id": 7, "text": "hello"}), json!(true)]
        );
        assert_eq!(
            args.get::<Tweet>(1)?,
            Tweet {
                id: 7,
                text: "hello".into()
            }
        );
        Ok(())
    }

    #[derive(Serialize)]
    struct Reading {
        sensor: &'static str,
        values: Vec<f64>,
    }

    #[test]
    fn test_non_finite_floats_are_rejected() -> anyhow::Result<()> {
        assert!(matches!(
            Arguments::encode(("ok", f64::NAN)),
            Err(ArgumentError::Encode { index: 1, .. })
        ));
        assert!(matches!(
            Arguments::encode((f32::INFINITY,)),
            Err(ArgumentError::Encode { index: 0, .. })
        ));

        let reading = Reading {
            sensor: "a",
            values: vec![1.5, f64::NEG_INFINITY],
        };
        assert!(matches!(
            Arguments::new().push(reading),
            Err(ArgumentError::Encode { index: 0, .. })
        ));
        assert!(matches!(
            Arguments::new().push(Some(f64::NAN)),
            Err(ArgumentError::Encode { index: 0, .. })
        ));

        let args = Arguments::encode((2.5f64, None::<f64>))?;
        assert_eq!(args.get::<f64>(0)?, 2.5);
        assert_eq!(args.get::<Option<f64>>(1)?, None);
        Ok(())
    }

    #[test]
    fn test_get_errors() {
        let args = Arguments::from(vec![json!("not a number")]);

        assert!(matches!(
            args.get::<u32>(0),
            Err(ArgumentError::Decode { index: 0, .. })
        ));
        assert!(matches!(
            args.get::<String>(3),
            Err(ArgumentError::Count {
                expected: 4,
                found: 1
            })
        ));
        assert!(args.expect_len(1).is_ok());
        assert!(args.expect_len(0).is_err());
    }
}
