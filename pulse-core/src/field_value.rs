use serde::ser::{Error as _, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    UInteger(u64),
    Float(f64),
    Boolean(bool),
    String(String),
}

// JSON has no representation for NaN or infinities; serde_json would write
// them as `null`, so they are rejected here instead.
impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldValue::Integer(v) => serializer.serialize_i64(*v),
            FieldValue::UInteger(v) => serializer.serialize_u64(*v),
            FieldValue::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            FieldValue::Float(v) => Err(S::Error::custom(format!("unsupported float value {v}"))),
            FieldValue::Boolean(v) => serializer.serialize_bool(*v),
            FieldValue::String(v) => serializer.serialize_str(v),
        }
    }
}

/// Conversion into a field value. `None` means the field is left out of the record.
pub trait ToFieldValue {
    fn to_field_value(self) -> Option<FieldValue>;
}

impl<T: ToFieldValue + Clone> ToFieldValue for &T {
    fn to_field_value(self) -> Option<FieldValue> {
        self.clone().to_field_value()
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(self) -> Option<FieldValue> {
        self.and_then(ToFieldValue::to_field_value)
    }
}

impl ToFieldValue for FieldValue {
    fn to_field_value(self) -> Option<FieldValue> {
        Some(self)
    }
}

macro_rules! impl_scalar {
    ($($ty:ty => |$v:ident| $value:expr),* $(,)?) => {
        $(
            impl ToFieldValue for $ty {
                fn to_field_value(self) -> Option<FieldValue> {
                    let $v = self;
                    Some($value)
                }
            }

            impl From<$ty> for FieldValue {
                fn from($v: $ty) -> Self {
                    $value
                }
            }
        )*
    };
}

impl_scalar! {
    f64 => |v| FieldValue::Float(v),
    f32 => |v| FieldValue::Float(v as f64),
    i8 => |v| FieldValue::Integer(v as i64),
    i16 => |v| FieldValue::Integer(v as i64),
    i32 => |v| FieldValue::Integer(v as i64),
    i64 => |v| FieldValue::Integer(v),
    u8 => |v| FieldValue::UInteger(v as u64),
    u16 => |v| FieldValue::UInteger(v as u64),
    u32 => |v| FieldValue::UInteger(v as u64),
    u64 => |v| FieldValue::UInteger(v),
    bool => |v| FieldValue::Boolean(v),
    String => |v| FieldValue::String(v),
}

impl ToFieldValue for &str {
    fn to_field_value(self) -> Option<FieldValue> {
        Some(FieldValue::String(self.to_string()))
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}
