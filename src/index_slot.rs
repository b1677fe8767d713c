use byteorder::{ByteOrder, LittleEndian};

/// Bytes per index record: `offset: i64`, `length: i32`, little-endian.
pub const RECORD_SIZE: usize = 12;

const NO_TEXT_OFFSET: i64 = -1;

/// In-memory form of one index record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IndexSlot {
    Empty,
    Text { offset: u64, len: u32 },
    /// Kept with its raw values so a flush writes it back unchanged.
    Corrupt { offset: i64, length: i32, reason: String },
}

impl IndexSlot {
    fn raw(&self) -> (i64, i32) {
        match self {
            IndexSlot::Empty => (NO_TEXT_OFFSET, 0),
            IndexSlot::Text { offset, len } => (*offset as i64, *len as i32),
            IndexSlot::Corrupt { offset, length, .. } => (*offset, *length),
        }
    }

    fn decode(record: &[u8], data_len: u64) -> IndexSlot {
        let offset = LittleEndian::read_i64(&record[0..8]);
        let length = LittleEndian::read_i32(&record[8..12]);
        let corrupt = |reason: String| IndexSlot::Corrupt {
            offset,
            length,
            reason,
        };

        // The sentinel offset means no text whatever the length says.
        if offset == NO_TEXT_OFFSET {
            return IndexSlot::Empty;
        }
        if offset < NO_TEXT_OFFSET {
            return corrupt(format!("negative offset {}", offset));
        }
        if length < 0 {
            return corrupt(format!("negative length {}", length));
        }
        let end = offset as u64 + length as u64;
        if end > data_len {
            return corrupt(format!(
                "span {}..{} runs past the data file ({} bytes)",
                offset, end, data_len
            ));
        }
        IndexSlot::Text {
            offset: offset as u64,
            len: length as u32,
        }
    }
}

/// Decode `slots` records from `bytes`. Records missing from a short file
/// are empty; a partial trailing record is corrupt. Bytes past the last
/// expected record are ignored and counted in the second return value.
pub(crate) fn decode_index(bytes: &[u8], slots: usize, data_len: u64) -> (Vec<IndexSlot>, usize) {
    let mut decoded = Vec::with_capacity(slots);
    for idx in 0..slots {
        let start = idx * RECORD_SIZE;
        let end = start + RECORD_SIZE;
        let slot = if end <= bytes.len() {
            IndexSlot::decode(&bytes[start..end], data_len)
        } else if start < bytes.len() {
            IndexSlot::Corrupt {
                offset: NO_TEXT_OFFSET,
                length: -1,
                reason: format!("truncated record ({} of {} bytes)", bytes.len() - start, RECORD_SIZE),
            }
        } else {
            IndexSlot::Empty
        };
        decoded.push(slot);
    }
    let extra = bytes.len().saturating_sub(slots * RECORD_SIZE);
    (decoded, extra)
}

pub(crate) fn encode_index(slots: &[IndexSlot]) -> Vec<u8> {
    let mut bytes = vec![0u8; slots.len() * RECORD_SIZE];
    for (slot, record) in slots.iter().zip(bytes.chunks_exact_mut(RECORD_SIZE)) {
        let (offset, length) = slot.raw();
        LittleEndian::write_i64(&mut record[0..8], offset);
        LittleEndian::write_i32(&mut record[8..12], length);
    }
    bytes
}
