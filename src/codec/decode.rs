use crate::descriptor::Descriptor;
use crate::error::Error;
use crate::fixed_width::{DECIMAL128_WIDTH, DECIMAL32_WIDTH, DECIMAL64_WIDTH};
use crate::format_code::EncodingCodes;
use crate::primitives::{Binary, Symbol};
use crate::value::{Array, Tag, Value};

struct Reader<'b> {
    buf: &'b [u8],
    pos: usize,
}

impl<'b> Reader<'b> {
    fn take(&mut self, len: usize) -> Result<&'b [u8], Error> {
        let end = self.pos.checked_add(len).ok_or(Error::Underflow)?;
        let slice = self.buf.get(self.pos..end).ok_or(Error::Underflow)?;
        self.pos = end;
        Ok(slice)
    }

    fn take_u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    fn take_code(&mut self) -> Result<EncodingCodes, Error> {
        EncodingCodes::try_from(self.take_u8()?)
    }
}

/// Decodes exactly one value from the front of `bytes`. Returns the value
/// and the number of bytes consumed. Returns [`Error::Underflow`] (with
/// nothing mutated) if `bytes` does not hold a complete value.
pub fn decode(bytes: &[u8]) -> Result<(Value, usize), Error> {
    let mut r = Reader { buf: bytes, pos: 0 };
    let value = decode_value(&mut r)?;
    Ok((value, r.pos))
}

fn decode_value(r: &mut Reader<'_>) -> Result<Value, Error> {
    let code = r.take_code()?;
    decode_with_code(r, code)
}

fn decode_with_code(r: &mut Reader<'_>, code: EncodingCodes) -> Result<Value, Error> {
    use EncodingCodes::*;
    Ok(match code {
        Null => Value::Null,
        Boolean => Value::Bool(r.take_u8()? != 0),
        BooleanTrue => Value::Bool(true),
        BooleanFalse => Value::Bool(false),

        UByte => Value::UByte(r.take_u8()?),
        Byte => Value::Byte(r.take_u8()? as i8),

        UShort => Value::UShort(u16::from_be_bytes(r.take(2)?.try_into().unwrap())),
        Short => Value::Short(i16::from_be_bytes(r.take(2)?.try_into().unwrap())),

        UInt => Value::UInt(u32::from_be_bytes(r.take(4)?.try_into().unwrap())),
        SmallUint => Value::UInt(r.take_u8()? as u32),
        Uint0 => Value::UInt(0),

        Int => Value::Int(i32::from_be_bytes(r.take(4)?.try_into().unwrap())),
        SmallInt => Value::Int(r.take_u8()? as i8 as i32),

        ULong => Value::ULong(u64::from_be_bytes(r.take(8)?.try_into().unwrap())),
        SmallUlong => Value::ULong(r.take_u8()? as u64),
        Ulong0 => Value::ULong(0),

        Long => Value::Long(i64::from_be_bytes(r.take(8)?.try_into().unwrap())),
        SmallLong => Value::Long(r.take_u8()? as i8 as i64),

        Float => Value::from(f32::from_be_bytes(r.take(4)?.try_into().unwrap())),
        Double => Value::from(f64::from_be_bytes(r.take(8)?.try_into().unwrap())),

        Decimal32 => return Err(decimal_unsupported(r, DECIMAL32_WIDTH)),
        Decimal64 => return Err(decimal_unsupported(r, DECIMAL64_WIDTH)),
        Decimal128 => return Err(decimal_unsupported(r, DECIMAL128_WIDTH)),

        Char => {
            let bits = u32::from_be_bytes(r.take(4)?.try_into().unwrap());
            Value::Char(
                char::from_u32(bits)
                    .ok_or_else(|| Error::malformed(format!("0x{bits:x} is not a valid char")))?,
            )
        }

        Timestamp => Value::Timestamp(crate::primitives::Timestamp::from_milliseconds(
            i64::from_be_bytes(r.take(8)?.try_into().unwrap()),
        )),

        Uuid => Value::Uuid(crate::primitives::Uuid::try_from(r.take(16)?)?),

        VBin8 => {
            let len = r.take_u8()? as usize;
            Value::Binary(Binary(r.take(len)?.to_vec()))
        }
        VBin32 => {
            let len = u32::from_be_bytes(r.take(4)?.try_into().unwrap()) as usize;
            Value::Binary(Binary(r.take(len)?.to_vec()))
        }

        Str8 => {
            let len = r.take_u8()? as usize;
            Value::String(decode_utf8(r.take(len)?)?)
        }
        Str32 => {
            let len = u32::from_be_bytes(r.take(4)?.try_into().unwrap()) as usize;
            Value::String(decode_utf8(r.take(len)?)?)
        }

        Sym8 => {
            let len = r.take_u8()? as usize;
            Value::Symbol(decode_symbol(r.take(len)?)?)
        }
        Sym32 => {
            let len = u32::from_be_bytes(r.take(4)?.try_into().unwrap()) as usize;
            Value::Symbol(decode_symbol(r.take(len)?)?)
        }

        List0 => Value::List(Vec::new()),
        List8 => decode_compound(r, 1, 1, Value::List)?,
        List32 => decode_compound(r, 4, 4, Value::List)?,

        Map8 => decode_compound(r, 1, 1, Value::Map)?,
        Map32 => decode_compound(r, 4, 4, Value::Map)?,

        Array8 => decode_array(r, 1, 1)?,
        Array32 => decode_array(r, 4, 4)?,

        DescribedType => {
            let descriptor_value = decode_value(r)?;
            let descriptor = value_to_descriptor(descriptor_value)?;
            let body = decode_value(r)?;
            Value::Described(Box::new(crate::described::Described::new(descriptor, body)))
        }
    })
}

fn decimal_unsupported(r: &mut Reader<'_>, width: usize) -> Error {
    let _ = r.take(width);
    Error::Unsupported("decimal types are not supported by this crate".into())
}

fn decode_utf8(bytes: &[u8]) -> Result<String, Error> {
    String::from_utf8(bytes.to_vec()).map_err(|e| Error::malformed(format!("invalid UTF-8 in string: {e}")))
}

fn decode_symbol(bytes: &[u8]) -> Result<Symbol, Error> {
    if !bytes.is_ascii() {
        return Err(Error::malformed("symbol contains non-ASCII bytes"));
    }
    Ok(Symbol::new(String::from_utf8(bytes.to_vec()).expect("validated ASCII")))
}

fn value_to_descriptor(value: Value) -> Result<Descriptor, Error> {
    match value {
        Value::Symbol(s) => Ok(Descriptor::Name(s)),
        other => {
            let code = other
                .as_u64()
                .map_err(|_| Error::malformed("descriptor must be a symbol or an unsigned integer"))?;
            Ok(Descriptor::Code(code))
        }
    }
}

/// Reads a LIST or MAP body: `size_width`/`count_width` bytes each (1 for
/// the 8-bit forms, 4 for the 32-bit forms), then `count` elements packed
/// into `size - count_width` bytes.
fn decode_compound(
    r: &mut Reader<'_>,
    size_width: usize,
    count_width: usize,
    wrap: impl FnOnce(Vec<Value>) -> Value,
) -> Result<Value, Error> {
    let size = read_width(r, size_width)?;
    let count = read_width(r, count_width)?;
    let body_len = size
        .checked_sub(count_width)
        .ok_or_else(|| Error::malformed("compound size smaller than its count field"))?;
    let body = r.take(body_len)?;

    let mut inner = Reader { buf: body, pos: 0 };
    let mut items = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        items.push(decode_value(&mut inner).map_err(underflow_within_body_is_malformed)?);
    }
    if inner.pos != body.len() {
        return Err(Error::malformed("compound body has trailing bytes past its elements"));
    }
    Ok(wrap(items))
}

fn decode_array(r: &mut Reader<'_>, size_width: usize, count_width: usize) -> Result<Value, Error> {
    let size = read_width(r, size_width)?;
    let count = read_width(r, count_width)?;
    let body_len = size
        .checked_sub(count_width)
        .ok_or_else(|| Error::malformed("array size smaller than its count field"))?;
    let body = r.take(body_len)?;

    let mut inner = Reader { buf: body, pos: 0 };
    let element_code = inner.take_code().map_err(underflow_within_body_is_malformed)?;
    let element_tag = code_to_tag(element_code)?;
    let mut array = Array::new(element_tag);
    for _ in 0..count {
        let element = decode_with_code(&mut inner, element_code).map_err(underflow_within_body_is_malformed)?;
        array
            .push(element)
            .map_err(|e| Error::malformed(format!("array element mismatch: {e}")))?;
    }
    if inner.pos != body.len() {
        return Err(Error::malformed("array body has trailing bytes past its elements"));
    }
    Ok(Value::Array(array))
}

/// A compound's/array's body is already a fixed, fully-present slice once
/// extracted from the outer reader — an [`Error::Underflow`] from decoding
/// *within* it means the bytes it holds are internally inconsistent, not
/// that the caller can fix things by supplying more top-level bytes. That is
/// malformed input, not underflow.
fn underflow_within_body_is_malformed(err: Error) -> Error {
    match err {
        Error::Underflow => Error::malformed("compound or array body is internally inconsistent"),
        other => other,
    }
}

fn code_to_tag(code: EncodingCodes) -> Result<Tag, Error> {
    use EncodingCodes::*;
    Ok(match code {
        Null => Tag::Null,
        Boolean | BooleanTrue | BooleanFalse => Tag::Bool,
        UByte => Tag::UByte,
        Byte => Tag::Byte,
        UShort => Tag::UShort,
        Short => Tag::Short,
        UInt | SmallUint | Uint0 => Tag::UInt,
        Int | SmallInt => Tag::Int,
        ULong | SmallUlong | Ulong0 => Tag::ULong,
        Long | SmallLong => Tag::Long,
        Float => Tag::Float,
        Double => Tag::Double,
        Char => Tag::Char,
        Timestamp => Tag::Timestamp,
        Uuid => Tag::Uuid,
        VBin8 | VBin32 => Tag::Binary,
        Str8 | Str32 => Tag::String,
        Sym8 | Sym32 => Tag::Symbol,
        List0 | List8 | List32 => Tag::List,
        Map8 | Map32 => Tag::Map,
        other => {
            return Err(Error::malformed(format!(
                "format code {other} cannot be an array element type"
            )))
        }
    })
}

fn read_width(r: &mut Reader<'_>, width: usize) -> Result<usize, Error> {
    let bytes = r.take(width)?;
    Ok(match width {
        1 => bytes[0] as usize,
        4 => u32::from_be_bytes(bytes.try_into().unwrap()) as usize,
        _ => unreachable!("only 1- and 4-byte width fields exist"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode::encode;

    fn roundtrip(value: Value) -> Value {
        let mut buf = vec![0u8; 4096];
        let len = encode(std::slice::from_ref(&value), &mut buf).unwrap();
        let (decoded, consumed) = decode(&buf[..len]).unwrap();
        assert_eq!(consumed, len);
        decoded
    }

    #[test]
    fn scalars_roundtrip() {
        assert_eq!(roundtrip(Value::Null), Value::Null);
        assert_eq!(roundtrip(Value::Bool(true)), Value::Bool(true));
        assert_eq!(roundtrip(Value::Short(-1)), Value::Short(-1));
        assert_eq!(roundtrip(Value::ULong(300)), Value::ULong(300));
        assert_eq!(roundtrip(Value::String("hi".into())), Value::String("hi".into()));
    }

    #[test]
    fn short_minus_one_is_two_bytes_of_payload() {
        let mut buf = vec![0u8; 16];
        let len = encode(&[Value::Short(-1)], &mut buf).unwrap();
        assert_eq!(&buf[..len], &[EncodingCodes::Short as u8, 0xff, 0xff]);
    }

    #[test]
    fn nested_list_map_array_roundtrip() {
        let mut arr = Array::new(Tag::Int);
        arr.push(Value::Int(1)).unwrap();
        arr.push(Value::Int(2)).unwrap();
        let map = Value::Map(vec![Value::String("k".into()), Value::Int(9)]);
        let list = Value::List(vec![map, Value::Array(arr)]);
        assert_eq!(roundtrip(list.clone()), list);
    }

    #[test]
    fn underflow_reports_zero_consumed() {
        let mut buf = vec![0u8; 64];
        let len = encode(&[Value::String("hello world".into())], &mut buf).unwrap();
        for k in 1..len {
            let err = decode(&buf[..k]).unwrap_err();
            assert!(matches!(err, Error::Underflow), "expected underflow at k={k}");
        }
    }

    #[test]
    fn decimal_is_reported_unsupported() {
        let bytes = [EncodingCodes::Decimal32 as u8, 0, 0, 0, 0];
        assert!(matches!(decode(&bytes), Err(Error::Unsupported(_))));
    }
}
