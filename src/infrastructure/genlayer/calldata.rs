use crate::domain::error::{AppError, Result};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

const BITS_IN_TYPE: u32 = 3;

const TYPE_SPECIAL: u8 = 0;
const TYPE_PINT: u8 = 1;
const TYPE_NINT: u8 = 2;
const TYPE_BYTES: u8 = 3;
const TYPE_STR: u8 = 4;
const TYPE_ARR: u8 = 5;
const TYPE_MAP: u8 = 6;

const SPECIAL_NULL: u8 = TYPE_SPECIAL;
const SPECIAL_FALSE: u8 = (1 << BITS_IN_TYPE) | TYPE_SPECIAL;
const SPECIAL_TRUE: u8 = (2 << BITS_IN_TYPE) | TYPE_SPECIAL;
const SPECIAL_ADDR: u8 = (3 << BITS_IN_TYPE) | TYPE_SPECIAL;

const ADDRESS_LEN: usize = 20;

/// A value in GenLayer's calldata encoding.
///
/// Every value starts with a ULEB128 header whose low three bits carry the
/// type and whose remaining bits carry an integer, a length or a special tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalldataValue {
    Null,
    Bool(bool),
    Int(i128),
    Bytes(Vec<u8>),
    Str(String),
    Address([u8; ADDRESS_LEN]),
    Array(Vec<CalldataValue>),
    Map(BTreeMap<String, CalldataValue>),
}

impl CalldataValue {
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(match value {
            Value::Null => CalldataValue::Null,
            Value::Bool(b) => CalldataValue::Bool(*b),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => CalldataValue::Int(i128::from(i)),
                (None, Some(u)) => CalldataValue::Int(i128::from(u)),
                _ => {
                    return Err(AppError::ValidationError(format!(
                        "Contract arguments must be integers, got {}",
                        n
                    )))
                }
            },
            Value::String(s) => CalldataValue::Str(s.clone()),
            Value::Array(items) => CalldataValue::Array(
                items.iter().map(CalldataValue::from_json).collect::<Result<_>>()?,
            ),
            Value::Object(entries) => CalldataValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| Ok::<_, AppError>((k.clone(), CalldataValue::from_json(v)?)))
                    .collect::<Result<_>>()?,
            ),
        })
    }

    /// Addresses and byte strings become `0x` hex; integers outside the JSON range become decimal strings.
    pub fn into_json(self) -> Value {
        match self {
            CalldataValue::Null => Value::Null,
            CalldataValue::Bool(b) => Value::Bool(b),
            CalldataValue::Int(i) => {
                if let Ok(small) = i64::try_from(i) {
                    Value::Number(Number::from(small))
                } else if let Ok(unsigned) = u64::try_from(i) {
                    Value::Number(Number::from(unsigned))
                } else {
                    Value::String(i.to_string())
                }
            }
            CalldataValue::Bytes(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
            CalldataValue::Str(s) => Value::String(s),
            CalldataValue::Address(addr) => Value::String(format!("0x{}", hex::encode(addr))),
            CalldataValue::Array(items) => {
                Value::Array(items.into_iter().map(CalldataValue::into_json).collect())
            }
            CalldataValue::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(out)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader { data: bytes, pos: 0 };
        let value = reader.read_value()?;
        if reader.pos != bytes.len() {
            return Err(AppError::ParseError(format!(
                "{} trailing bytes after calldata value",
                bytes.len() - reader.pos
            )));
        }
        Ok(value)
    }

    fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            CalldataValue::Null => out.push(SPECIAL_NULL),
            CalldataValue::Bool(false) => out.push(SPECIAL_FALSE),
            CalldataValue::Bool(true) => out.push(SPECIAL_TRUE),
            CalldataValue::Address(addr) => {
                out.push(SPECIAL_ADDR);
                out.extend_from_slice(addr);
            }
            CalldataValue::Int(i) if *i >= 0 => write_header(out, *i as u128, TYPE_PINT)?,
            CalldataValue::Int(i) => write_header(out, (-(*i + 1)) as u128, TYPE_NINT)?,
            CalldataValue::Bytes(bytes) => {
                write_header(out, bytes.len() as u128, TYPE_BYTES)?;
                out.extend_from_slice(bytes);
            }
            CalldataValue::Str(s) => {
                write_header(out, s.len() as u128, TYPE_STR)?;
                out.extend_from_slice(s.as_bytes());
            }
            CalldataValue::Array(items) => {
                write_header(out, items.len() as u128, TYPE_ARR)?;
                for item in items {
                    item.write(out)?;
                }
            }
            CalldataValue::Map(entries) => {
                // BTreeMap iterates keys in byte order, which is the order the decoder expects.
                write_header(out, entries.len() as u128, TYPE_MAP)?;
                for (key, value) in entries {
                    write_uleb(out, key.len() as u128);
                    out.extend_from_slice(key.as_bytes());
                    value.write(out)?;
                }
            }
        }
        Ok(())
    }
}

/// Calldata for a contract method call: `{method, args}`, with `args` left out when empty.
pub fn method_call(method: &str, args: &[Value]) -> Result<Vec<u8>> {
    let mut call = BTreeMap::new();
    call.insert("method".to_string(), CalldataValue::Str(method.to_string()));
    if !args.is_empty() {
        let args = args
            .iter()
            .map(CalldataValue::from_json)
            .collect::<Result<Vec<_>>>()?;
        call.insert("args".to_string(), CalldataValue::Array(args));
    }
    CalldataValue::Map(call).encode()
}

/// Decodes a `gen_call` result: hex (with or without `0x`) of a calldata value.
pub fn decode_result(result: &Value) -> Result<Value> {
    let text = result.as_str().ok_or_else(|| {
        AppError::ParseError(format!("Expected a hex string from gen_call, got {}", result))
    })?;
    let digits = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(digits)
        .map_err(|e| AppError::ParseError(format!("Invalid hex in gen_call result: {}", e)))?;
    Ok(CalldataValue::decode(&bytes)?.into_json())
}

fn write_header(out: &mut Vec<u8>, payload: u128, value_type: u8) -> Result<()> {
    if payload >> (128 - BITS_IN_TYPE) != 0 {
        return Err(AppError::ValidationError(
            "Value is too large for calldata".to_string(),
        ));
    }
    write_uleb(out, (payload << BITS_IN_TYPE) | u128::from(value_type));
    Ok(())
}

fn write_uleb(out: &mut Vec<u8>, mut value: u128) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| AppError::ParseError("Calldata ended unexpectedly".to_string()))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_uleb(&mut self) -> Result<u128> {
        let mut value: u128 = 0;
        let mut shift = 0u32;
        loop {
            let byte = self.take(1)?[0];
            if shift >= 128 {
                return Err(AppError::ParseError("Calldata integer overflow".to_string()));
            }
            value |= u128::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    fn read_len(&mut self, payload: u128) -> Result<usize> {
        usize::try_from(payload)
            .ok()
            .filter(|len| *len <= self.data.len() - self.pos)
            .ok_or_else(|| AppError::ParseError(format!("Calldata length {} out of range", payload)))
    }

    fn read_str(&mut self, len: usize) -> Result<String> {
        String::from_utf8(self.take(len)?.to_vec())
            .map_err(|e| AppError::ParseError(format!("Invalid UTF-8 in calldata: {}", e)))
    }

    fn read_value(&mut self) -> Result<CalldataValue> {
        let header = self.read_uleb()?;
        let payload = header >> BITS_IN_TYPE;
        let value = match (header & 0x7) as u8 {
            TYPE_SPECIAL => match payload {
                0 => CalldataValue::Null,
                1 => CalldataValue::Bool(false),
                2 => CalldataValue::Bool(true),
                3 => {
                    let mut addr = [0u8; ADDRESS_LEN];
                    addr.copy_from_slice(self.take(ADDRESS_LEN)?);
                    CalldataValue::Address(addr)
                }
                other => {
                    return Err(AppError::ParseError(format!(
                        "Unknown calldata special value {}",
                        other
                    )))
                }
            },
            TYPE_PINT => CalldataValue::Int(int_payload(payload)?),
            TYPE_NINT => CalldataValue::Int(-1 - int_payload(payload)?),
            TYPE_BYTES => {
                let len = self.read_len(payload)?;
                CalldataValue::Bytes(self.take(len)?.to_vec())
            }
            TYPE_STR => {
                let len = self.read_len(payload)?;
                CalldataValue::Str(self.read_str(len)?)
            }
            TYPE_ARR => {
                let count = self.read_len(payload)?;
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.read_value()?);
                }
                CalldataValue::Array(items)
            }
            TYPE_MAP => {
                let count = self.read_len(payload)?;
                let mut entries = BTreeMap::new();
                for _ in 0..count {
                    let key_len = self.read_uleb()?;
                    let key_len = self.read_len(key_len)?;
                    let key = self.read_str(key_len)?;
                    entries.insert(key, self.read_value()?);
                }
                CalldataValue::Map(entries)
            }
            other => {
                return Err(AppError::ParseError(format!(
                    "Unknown calldata type {}",
                    other
                )))
            }
        };
        Ok(value)
    }
}

fn int_payload(payload: u128) -> Result<i128> {
    i128::try_from(payload)
        .map_err(|_| AppError::ParseError("Calldata integer out of range".to_string()))
}
