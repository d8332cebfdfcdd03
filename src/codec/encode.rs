use crate::descriptor::Descriptor;
use crate::error::Error;
use crate::format_code::EncodingCodes;
use crate::value::{Array, Tag, Value};

struct Writer<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl<'b> Writer<'b> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let end = self.pos.checked_add(bytes.len()).ok_or(Error::Overflow)?;
        let dest = self.buf.get_mut(self.pos..end).ok_or(Error::Overflow)?;
        dest.copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    fn write_u8(&mut self, code: EncodingCodes) -> Result<(), Error> {
        self.write(&[code as u8])
    }
}

/// Encodes every value in `values`, in order, into `buf`. Returns the
/// number of bytes written, or [`Error::Overflow`] if `buf` is too small
/// (nothing beyond `buf`'s own contents is observably mutated in that case,
/// since the caller is expected to discard and retry with a bigger buffer).
pub fn encode(values: &[Value], buf: &mut [u8]) -> Result<usize, Error> {
    let mut w = Writer { buf, pos: 0 };
    for value in values {
        encode_value(&mut w, value)?;
    }
    Ok(w.pos)
}

fn encode_value(w: &mut Writer<'_>, value: &Value) -> Result<(), Error> {
    match value {
        Value::Null => w.write_u8(EncodingCodes::Null),
        Value::Bool(b) => w.write_u8(if *b {
            EncodingCodes::BooleanTrue
        } else {
            EncodingCodes::BooleanFalse
        }),
        Value::UByte(v) => {
            w.write_u8(EncodingCodes::UByte)?;
            w.write(&[*v])
        }
        Value::Byte(v) => {
            w.write_u8(EncodingCodes::Byte)?;
            w.write(&v.to_be_bytes())
        }
        Value::UShort(v) => {
            w.write_u8(EncodingCodes::UShort)?;
            w.write(&v.to_be_bytes())
        }
        Value::Short(v) => {
            w.write_u8(EncodingCodes::Short)?;
            w.write(&v.to_be_bytes())
        }
        Value::UInt(v) => encode_uint(w, *v),
        Value::Int(v) => encode_int(w, *v),
        Value::ULong(v) => encode_ulong(w, *v),
        Value::Long(v) => encode_long(w, *v),
        Value::Float(v) => {
            w.write_u8(EncodingCodes::Float)?;
            w.write(&v.0.to_be_bytes())
        }
        Value::Double(v) => {
            w.write_u8(EncodingCodes::Double)?;
            w.write(&v.0.to_be_bytes())
        }
        Value::Char(c) => {
            w.write_u8(EncodingCodes::Char)?;
            w.write(&(*c as u32).to_be_bytes())
        }
        Value::Timestamp(t) => {
            w.write_u8(EncodingCodes::Timestamp)?;
            w.write(&t.milliseconds().to_be_bytes())
        }
        Value::Uuid(u) => {
            w.write_u8(EncodingCodes::Uuid)?;
            w.write(u.as_bytes())
        }
        Value::Binary(b) => encode_bytes(w, EncodingCodes::VBin8, EncodingCodes::VBin32, b.as_slice()),
        Value::String(s) => encode_bytes(w, EncodingCodes::Str8, EncodingCodes::Str32, s.as_bytes()),
        Value::Symbol(s) => {
            if !s.is_ascii() {
                return Err(Error::encoding(format!("symbol {:?} is not 7-bit ASCII", s.as_str())));
            }
            encode_bytes(w, EncodingCodes::Sym8, EncodingCodes::Sym32, s.as_str().as_bytes())
        }
        Value::Described(d) => {
            w.write_u8(EncodingCodes::DescribedType)?;
            encode_value(w, &descriptor_to_value(&d.descriptor))?;
            encode_value(w, &d.value)
        }
        Value::List(items) => encode_compound(
            w,
            items.len(),
            Some(EncodingCodes::List0),
            EncodingCodes::List8,
            EncodingCodes::List32,
            |w| items.iter().try_for_each(|v| encode_value(w, v)),
        ),
        Value::Map(items) => {
            if items.len() % 2 != 0 {
                return Err(Error::encoding("map has an odd number of children"));
            }
            encode_compound(
                w,
                items.len(),
                None, // MAP has no zero-length shorthand
                EncodingCodes::Map8,
                EncodingCodes::Map32,
                |w| items.iter().try_for_each(|v| encode_value(w, v)),
            )
        }
        Value::Array(arr) => encode_array(w, arr),
    }
}

fn descriptor_to_value(d: &Descriptor) -> Value {
    match d {
        Descriptor::Name(s) => Value::Symbol(s.clone()),
        Descriptor::Code(c) => Value::ULong(*c),
    }
}

fn encode_uint(w: &mut Writer<'_>, v: u32) -> Result<(), Error> {
    if v == 0 {
        w.write_u8(EncodingCodes::Uint0)
    } else if v <= u8::MAX as u32 {
        w.write_u8(EncodingCodes::SmallUint)?;
        w.write(&[v as u8])
    } else {
        w.write_u8(EncodingCodes::UInt)?;
        w.write(&v.to_be_bytes())
    }
}

fn encode_int(w: &mut Writer<'_>, v: i32) -> Result<(), Error> {
    if (i8::MIN as i32..=i8::MAX as i32).contains(&v) {
        w.write_u8(EncodingCodes::SmallInt)?;
        w.write(&[(v as i8).to_be_bytes()[0]])
    } else {
        w.write_u8(EncodingCodes::Int)?;
        w.write(&v.to_be_bytes())
    }
}

fn encode_ulong(w: &mut Writer<'_>, v: u64) -> Result<(), Error> {
    if v == 0 {
        w.write_u8(EncodingCodes::Ulong0)
    } else if v <= u8::MAX as u64 {
        w.write_u8(EncodingCodes::SmallUlong)?;
        w.write(&[v as u8])
    } else {
        w.write_u8(EncodingCodes::ULong)?;
        w.write(&v.to_be_bytes())
    }
}

fn encode_long(w: &mut Writer<'_>, v: i64) -> Result<(), Error> {
    if (i8::MIN as i64..=i8::MAX as i64).contains(&v) {
        w.write_u8(EncodingCodes::SmallLong)?;
        w.write(&[(v as i8).to_be_bytes()[0]])
    } else {
        w.write_u8(EncodingCodes::Long)?;
        w.write(&v.to_be_bytes())
    }
}

fn encode_bytes(
    w: &mut Writer<'_>,
    small: EncodingCodes,
    large: EncodingCodes,
    bytes: &[u8],
) -> Result<(), Error> {
    if bytes.len() <= u8::MAX as usize {
        w.write_u8(small)?;
        w.write(&[bytes.len() as u8])?;
    } else {
        let len = u32::try_from(bytes.len())
            .map_err(|_| Error::encoding("byte payload exceeds 2^32-1 bytes"))?;
        w.write_u8(large)?;
        w.write(&len.to_be_bytes())?;
    }
    w.write(bytes)
}

/// Encodes a LIST or MAP: body is encoded to scratch first, so the size
/// prefix width (8-bit vs 32-bit) is known up front.
fn encode_compound(
    w: &mut Writer<'_>,
    child_count: usize,
    zero_code: Option<EncodingCodes>,
    small_code: EncodingCodes,
    large_code: EncodingCodes,
    write_children: impl Fn(&mut Writer<'_>) -> Result<(), Error>,
) -> Result<(), Error> {
    if child_count == 0 {
        if let Some(zero_code) = zero_code {
            return w.write_u8(zero_code);
        }
    }

    let mut scratch = vec![0u8; w.buf.len().saturating_sub(w.pos).max(INITIAL_SCRATCH)];
    let body_len = loop {
        let mut inner = Writer {
            buf: &mut scratch,
            pos: 0,
        };
        match write_children(&mut inner) {
            Ok(()) => break inner.pos,
            Err(Error::Overflow) => {
                let new_len = scratch.len() * 2;
                scratch.resize(new_len, 0);
                continue;
            }
            Err(other) => return Err(other),
        }
    };

    if body_len + 1 <= u8::MAX as usize {
        w.write_u8(small_code)?;
        w.write(&[(body_len + 1) as u8])?;
        w.write(&[child_count as u8])?;
    } else {
        let size = u32::try_from(body_len + 4)
            .map_err(|_| Error::encoding("compound body exceeds 2^32-1 bytes"))?;
        let count = u32::try_from(child_count)
            .map_err(|_| Error::encoding("compound has more than 2^32-1 children"))?;
        w.write_u8(large_code)?;
        w.write(&size.to_be_bytes())?;
        w.write(&count.to_be_bytes())?;
    }
    w.write(&scratch[..body_len])
}

const INITIAL_SCRATCH: usize = 256;

fn array_element_code(tag: Tag) -> Result<EncodingCodes, Error> {
    Ok(match tag {
        Tag::Null => EncodingCodes::Null,
        Tag::Bool => EncodingCodes::Boolean,
        Tag::UByte => EncodingCodes::UByte,
        Tag::Byte => EncodingCodes::Byte,
        Tag::UShort => EncodingCodes::UShort,
        Tag::Short => EncodingCodes::Short,
        Tag::UInt => EncodingCodes::UInt,
        Tag::Int => EncodingCodes::Int,
        Tag::ULong => EncodingCodes::ULong,
        Tag::Long => EncodingCodes::Long,
        Tag::Float => EncodingCodes::Float,
        Tag::Double => EncodingCodes::Double,
        Tag::Char => EncodingCodes::Char,
        Tag::Timestamp => EncodingCodes::Timestamp,
        Tag::Uuid => EncodingCodes::Uuid,
        Tag::Binary => EncodingCodes::VBin32,
        Tag::String => EncodingCodes::Str32,
        Tag::Symbol => EncodingCodes::Sym32,
        Tag::List => EncodingCodes::List32,
        Tag::Map => EncodingCodes::Map32,
        other => {
            return Err(Error::encoding(format!(
                "{other:?} cannot be used as an array element type"
            )))
        }
    })
}

fn encode_array_element_body(w: &mut Writer<'_>, code: EncodingCodes, value: &Value) -> Result<(), Error> {
    match (code, value) {
        (EncodingCodes::Null, Value::Null) => Ok(()),
        (EncodingCodes::Boolean, Value::Bool(b)) => w.write(&[if *b { 1 } else { 0 }]),
        (EncodingCodes::UByte, Value::UByte(v)) => w.write(&[*v]),
        (EncodingCodes::Byte, Value::Byte(v)) => w.write(&v.to_be_bytes()),
        (EncodingCodes::UShort, Value::UShort(v)) => w.write(&v.to_be_bytes()),
        (EncodingCodes::Short, Value::Short(v)) => w.write(&v.to_be_bytes()),
        (EncodingCodes::UInt, Value::UInt(v)) => w.write(&v.to_be_bytes()),
        (EncodingCodes::Int, Value::Int(v)) => w.write(&v.to_be_bytes()),
        (EncodingCodes::ULong, Value::ULong(v)) => w.write(&v.to_be_bytes()),
        (EncodingCodes::Long, Value::Long(v)) => w.write(&v.to_be_bytes()),
        (EncodingCodes::Float, Value::Float(v)) => w.write(&v.0.to_be_bytes()),
        (EncodingCodes::Double, Value::Double(v)) => w.write(&v.0.to_be_bytes()),
        (EncodingCodes::Char, Value::Char(c)) => w.write(&(*c as u32).to_be_bytes()),
        (EncodingCodes::Timestamp, Value::Timestamp(t)) => w.write(&t.milliseconds().to_be_bytes()),
        (EncodingCodes::Uuid, Value::Uuid(u)) => w.write(u.as_bytes()),
        (EncodingCodes::VBin32, Value::Binary(b)) => {
            let len = u32::try_from(b.as_slice().len())
                .map_err(|_| Error::encoding("array element exceeds 2^32-1 bytes"))?;
            w.write(&len.to_be_bytes())?;
            w.write(b.as_slice())
        }
        (EncodingCodes::Str32, Value::String(s)) => {
            let len = u32::try_from(s.len())
                .map_err(|_| Error::encoding("array element exceeds 2^32-1 bytes"))?;
            w.write(&len.to_be_bytes())?;
            w.write(s.as_bytes())
        }
        (EncodingCodes::Sym32, Value::Symbol(s)) => {
            if !s.is_ascii() {
                return Err(Error::encoding("array element symbol is not 7-bit ASCII"));
            }
            let len = u32::try_from(s.as_str().len())
                .map_err(|_| Error::encoding("array element exceeds 2^32-1 bytes"))?;
            w.write(&len.to_be_bytes())?;
            w.write(s.as_str().as_bytes())
        }
        (EncodingCodes::List32, Value::List(items)) => {
            let mut scratch = vec![0u8; INITIAL_SCRATCH];
            let len = loop {
                let mut inner = Writer { buf: &mut scratch, pos: 0 };
                match items.iter().try_for_each(|v| encode_value(&mut inner, v)) {
                    Ok(()) => break inner.pos,
                    Err(Error::Overflow) => {
                        let new_len = scratch.len() * 2;
                        scratch.resize(new_len, 0);
                    }
                    Err(other) => return Err(other),
                }
            };
            let count = u32::try_from(items.len()).unwrap_or(u32::MAX);
            let size = u32::try_from(len + 4).map_err(|_| Error::encoding("array element too large"))?;
            w.write(&size.to_be_bytes())?;
            w.write(&count.to_be_bytes())?;
            w.write(&scratch[..len])
        }
        (EncodingCodes::Map32, Value::Map(items)) => {
            if items.len() % 2 != 0 {
                return Err(Error::encoding("array element map has an odd number of children"));
            }
            let mut scratch = vec![0u8; INITIAL_SCRATCH];
            let len = loop {
                let mut inner = Writer { buf: &mut scratch, pos: 0 };
                match items.iter().try_for_each(|v| encode_value(&mut inner, v)) {
                    Ok(()) => break inner.pos,
                    Err(Error::Overflow) => {
                        let new_len = scratch.len() * 2;
                        scratch.resize(new_len, 0);
                    }
                    Err(other) => return Err(other),
                }
            };
            let count = u32::try_from(items.len()).unwrap_or(u32::MAX);
            let size = u32::try_from(len + 4).map_err(|_| Error::encoding("array element too large"))?;
            w.write(&size.to_be_bytes())?;
            w.write(&count.to_be_bytes())?;
            w.write(&scratch[..len])
        }
        (code, value) => Err(Error::encoding(format!(
            "array element {:?} does not match declared element code {code}",
            value.tag()
        ))),
    }
}

fn encode_array(w: &mut Writer<'_>, arr: &Array) -> Result<(), Error> {
    if arr.described() {
        return Err(Error::encoding(
            "arrays of described-typed elements are not supported",
        ));
    }
    let element_code = array_element_code(arr.element_tag())?;

    let mut scratch = vec![0u8; INITIAL_SCRATCH];
    let body_len = loop {
        let mut inner = Writer {
            buf: &mut scratch,
            pos: 0,
        };
        let result: Result<(), Error> = (|| {
            inner.write_u8(element_code)?;
            for el in arr.elements() {
                encode_array_element_body(&mut inner, element_code, el)?;
            }
            Ok(())
        })();
        match result {
            Ok(()) => break inner.pos,
            Err(Error::Overflow) => {
                let new_len = scratch.len() * 2;
                scratch.resize(new_len, 0);
            }
            Err(other) => return Err(other),
        }
    };

    let count = arr.elements().len();
    if body_len + 1 <= u8::MAX as usize && count <= u8::MAX as usize {
        w.write_u8(EncodingCodes::Array8)?;
        w.write(&[(body_len + 1) as u8])?;
        w.write(&[count as u8])?;
    } else {
        let size = u32::try_from(body_len + 4)
            .map_err(|_| Error::encoding("array body exceeds 2^32-1 bytes"))?;
        let count = u32::try_from(count).map_err(|_| Error::encoding("array has more than 2^32-1 elements"))?;
        w.write_u8(EncodingCodes::Array32)?;
        w.write(&size.to_be_bytes())?;
        w.write(&count.to_be_bytes())?;
    }
    w.write(&scratch[..body_len])
}
