//! Byte serialization backing value hashing and equality.

use qy_ir::{MonoError, MonoResult, ValueId};

use super::{ValueData, ValueTable};

pub(super) fn write_scalar(data: &ValueData, out: &mut Vec<u8>) {
    match *data {
        ValueData::U1(v) => out.push(u8::from(v)),
        ValueData::U8(v) => out.push(v),
        ValueData::U16(v) => out.extend_from_slice(&v.to_le_bytes()),
        ValueData::U32(v) => out.extend_from_slice(&v.to_le_bytes()),
        ValueData::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
        ValueData::S8(v) => out.extend_from_slice(&v.to_le_bytes()),
        ValueData::S16(v) => out.extend_from_slice(&v.to_le_bytes()),
        ValueData::S32(v) => out.extend_from_slice(&v.to_le_bytes()),
        ValueData::S64(v) => out.extend_from_slice(&v.to_le_bytes()),
        ValueData::F32(v) => out.extend_from_slice(&v.to_bits().to_le_bytes()),
        ValueData::F64(v) => out.extend_from_slice(&v.to_bits().to_le_bytes()),
        ValueData::Unit
        | ValueData::String(_)
        | ValueData::Tuple(_)
        | ValueData::Array(_)
        | ValueData::Slice(_)
        | ValueData::Function(_)
        | ValueData::Pointer(_) => {}
    }
}

impl ValueTable {
    fn check_budget(&self, bytes: usize) -> MonoResult<()> {
        if bytes > self.max_hash_bytes {
            tracing::debug!(bytes, limit = self.max_hash_bytes, "value rejected by serialization budget");
            return Err(MonoError::ValueTooLarge {
                bytes,
                limit: self.max_hash_bytes,
            });
        }
        Ok(())
    }

    pub(super) fn serialize(&self, data: &ValueData) -> MonoResult<Vec<u8>> {
        match data {
            ValueData::String(chars) => {
                let size = 8 + 4 * chars.len();
                self.check_budget(size)?;
                let mut out = Vec::with_capacity(size);
                out.extend_from_slice(&(chars.len() as u64).to_le_bytes());
                for &c in chars {
                    out.extend_from_slice(&u32::from(c).to_le_bytes());
                }
                Ok(out)
            }
            ValueData::Tuple(elems) | ValueData::Array(elems) | ValueData::Slice(elems) => {
                self.concat(elems)
            }
            ValueData::Pointer(info) => Ok(u64::from(info.cell.raw()).to_le_bytes().to_vec()),
            ValueData::Unit | ValueData::Function(_) => Ok(Vec::new()),
            scalar => {
                let mut out = Vec::with_capacity(8);
                write_scalar(scalar, &mut out);
                Ok(out)
            }
        }
    }

    fn concat(&self, elems: &[ValueId]) -> MonoResult<Vec<u8>> {
        let mut size = 0usize;
        for &elem in elems {
            size = size.saturating_add(self.bytes_of(elem)?.len());
        }
        self.check_budget(size)?;
        let mut out = Vec::with_capacity(size);
        for &elem in elems {
            out.extend_from_slice(self.bytes_of(elem)?);
        }
        Ok(out)
    }
}
