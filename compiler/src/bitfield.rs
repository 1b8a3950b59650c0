//! Presence bits for singular primitive fields.
//!
//! A primitive field cannot hold "unset" itself, so each one that needs
//! presence gets a bit in a private `int` word of its message. Bits are
//! handed out densely in declaration order, 32 per word:
//!
//! | ordinal | word | mask |
//! |---------|------|------|
//! | 0 | `bitField0_` | `0x00000001` |
//! | 31 | `bitField0_` | `0x80000000` |
//! | 32 | `bitField1_` | `0x00000001` |

use brine_nano_schema::FieldDescriptor;
use tracing::trace;

use crate::{java_types::java_type, params::Params};

pub const BITS_PER_WORD: u32 = 32;

const BIT_MASKS: [&str; 32] = [
    "0x00000001", "0x00000002", "0x00000004", "0x00000008",
    "0x00000010", "0x00000020", "0x00000040", "0x00000080",
    "0x00000100", "0x00000200", "0x00000400", "0x00000800",
    "0x00001000", "0x00002000", "0x00004000", "0x00008000",
    "0x00010000", "0x00020000", "0x00040000", "0x00080000",
    "0x00100000", "0x00200000", "0x00400000", "0x00800000",
    "0x01000000", "0x02000000", "0x04000000", "0x08000000",
    "0x10000000", "0x20000000", "0x40000000", "0x80000000",
];

/// Dense ordinal of one presence bit within its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitIndex(pub u32);

impl BitIndex {
    pub fn word(self) -> u32 {
        self.0 / BITS_PER_WORD
    }

    pub fn bit(self) -> u32 {
        self.0 % BITS_PER_WORD
    }

    pub fn mask(self) -> &'static str {
        BIT_MASKS[self.bit() as usize]
    }

    pub fn slot(self) -> String {
        word_name(self.word())
    }

    /// `((bitField0_ & 0x00000001) != 0)`
    pub fn get_expr(self) -> String {
        format!("(({} & {}) != 0)", self.slot(), self.mask())
    }

    /// `bitField0_ |= 0x00000001`
    pub fn set_expr(self) -> String {
        format!("{} |= {}", self.slot(), self.mask())
    }

    /// `bitField0_ = (bitField0_ & ~0x00000001)`
    pub fn clear_expr(self) -> String {
        let slot = self.slot();
        format!("{} = ({} & ~{})", slot, slot, self.mask())
    }

    /// Compares this bit against the same bit of `other`.
    pub fn differ_expr(self) -> String {
        let slot = self.slot();
        let mask = self.mask();
        format!("(({} & {}) != (other.{} & {}))", slot, mask, slot, mask)
    }
}

/// Storage slot backing presence word `word`.
pub fn word_name(word: u32) -> String {
    format!("bitField{}_", word)
}

/// Whether `field` is stored as a non-nullable primitive and so needs a
/// presence bit.
pub fn needs_presence_bit(params: &Params, field: &FieldDescriptor) -> bool {
    !field.is_repeated() && !params.use_reference_types() && java_type(field.type_).is_primitive()
}

/// Presence bits of one message, indexed by field position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitAllocation {
    bits:  Vec<Option<BitIndex>>,
    count: u32,
}

impl BitAllocation {
    /// Assigns bits to the tracked fields of one message, in declaration order.
    pub fn allocate(params: &Params, fields: &[FieldDescriptor]) -> Self {
        Self::allocate_by(fields, |field| needs_presence_bit(params, field))
    }

    pub fn allocate_by<F>(fields: &[FieldDescriptor], tracked: F) -> Self
    where
        F: Fn(&FieldDescriptor) -> bool,
    {
        let mut count = 0;
        let bits = fields
            .iter()
            .map(|field| {
                if !tracked(field) {
                    return None;
                }
                let index = BitIndex(count);
                count += 1;
                trace!(field = %field.name, word = index.word(), bit = index.bit(), "presence bit");
                Some(index)
            })
            .collect();
        BitAllocation { bits, count }
    }

    /// Bit of the field at `position`, if it is tracked.
    pub fn bit_of(&self, position: usize) -> Option<BitIndex> {
        self.bits.get(position).copied().flatten()
    }

    pub fn bit_count(&self) -> u32 {
        self.count
    }

    /// Number of `int` words needed to hold every bit.
    pub fn word_count(&self) -> u32 {
        self.count.div_ceil(BITS_PER_WORD)
    }

    pub fn word_names(&self) -> Vec<String> {
        (0..self.word_count()).map(word_name).collect()
    }
}
