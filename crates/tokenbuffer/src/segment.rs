//! Fixed-capacity storage nodes and the chain that links them.
//!
//! Each [`Segment`] holds up to [`TOKENS_PER_SEGMENT`] events. Kinds are
//! packed four bits apiece into one `u64`, so structural markers, booleans and
//! nulls cost half a byte plus an empty payload slot. Slots are only ever
//! appended; nothing is overwritten.
//!
//! Native type/object ids live in a per-segment side table that is allocated
//! the first time an event in that segment carries one. The table is keyed by
//! `2 * slot` for type ids and `2 * slot + 1` for object ids.
use alloc::{collections::BTreeMap, vec, vec::Vec};

use crate::{
    NativeId, TokenKind,
    token::Payload,
};

/// Slots per segment. Bounded by the 4-bit kind encoding: 16 × 4 = 64 bits.
pub(crate) const TOKENS_PER_SEGMENT: usize = 16;

/// Ids staged by the writer for the next appended event.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PendingIds {
    pub(crate) type_id: Option<NativeId>,
    pub(crate) object_id: Option<NativeId>,
}

impl PendingIds {
    /// Takes whatever is staged, leaving nothing behind.
    pub(crate) fn take(&mut self) -> Option<PendingIds> {
        if self.type_id.is_none() && self.object_id.is_none() {
            None
        } else {
            Some(core::mem::take(self))
        }
    }
}

#[inline]
const fn type_id_key(slot: usize) -> usize {
    slot + slot
}

#[inline]
const fn object_id_key(slot: usize) -> usize {
    slot + slot + 1
}

#[derive(Debug, Clone)]
pub(crate) struct Segment {
    /// 4 bits per slot; 0 means "unused".
    kinds: u64,
    payloads: [Payload; TOKENS_PER_SEGMENT],
    native_ids: Option<BTreeMap<usize, NativeId>>,
}

impl Segment {
    pub(crate) fn new() -> Self {
        Self {
            kinds: 0,
            payloads: core::array::from_fn(|_| Payload::Absent),
            native_ids: None,
        }
    }

    #[inline]
    pub(crate) fn kind_at(&self, slot: usize) -> Option<TokenKind> {
        debug_assert!(slot < TOKENS_PER_SEGMENT);
        #[expect(clippy::cast_possible_truncation)]
        let code = ((self.kinds >> (slot << 2)) & 0xF) as u8;
        TokenKind::from_code(code)
    }

    #[inline]
    pub(crate) fn payload_at(&self, slot: usize) -> &Payload {
        &self.payloads[slot]
    }

    /// Whether any event in this segment carries a native id.
    pub(crate) fn has_ids(&self) -> bool {
        self.native_ids.is_some()
    }

    pub(crate) fn type_id_at(&self, slot: usize) -> Option<&NativeId> {
        self.native_ids.as_ref()?.get(&type_id_key(slot))
    }

    pub(crate) fn object_id_at(&self, slot: usize) -> Option<&NativeId> {
        self.native_ids.as_ref()?.get(&object_id_key(slot))
    }

    /// Writes into `index` if it fits. When the segment is full, the event
    /// goes into the first slot of a fresh segment which is returned for the
    /// caller to link in.
    pub(crate) fn append(
        &mut self,
        index: usize,
        kind: TokenKind,
        payload: Payload,
        ids: Option<PendingIds>,
    ) -> Option<Segment> {
        if index < TOKENS_PER_SEGMENT {
            self.set(index, kind, payload, ids);
            return None;
        }
        let mut next = Segment::new();
        next.set(0, kind, payload, ids);
        Some(next)
    }

    fn set(&mut self, index: usize, kind: TokenKind, payload: Payload, ids: Option<PendingIds>) {
        // Append-only: the slot must still be unused, so a plain OR suffices.
        debug_assert!(self.kind_at(index).is_none(), "slot {index} already written");
        self.kinds |= u64::from(kind.code()) << (index << 2);
        self.payloads[index] = payload;
        if let Some(ids) = ids {
            self.attach(index, ids);
        }
    }

    fn attach(&mut self, slot: usize, ids: PendingIds) {
        let table = self.native_ids.get_or_insert_with(BTreeMap::new);
        if let Some(id) = ids.type_id {
            let previous = table.insert(type_id_key(slot), id);
            debug_assert!(previous.is_none(), "type id attached twice to slot {slot}");
        }
        if let Some(id) = ids.object_id {
            let previous = table.insert(object_id_key(slot), id);
            debug_assert!(previous.is_none(), "object id attached twice to slot {slot}");
        }
    }
}

/// The buffer's storage: segments in append order plus the next free slot of
/// the last one.
///
/// Segments are linked by position; segment `n + 1` follows segment `n`.
#[derive(Debug, Clone)]
pub(crate) struct SegmentChain {
    segments: Vec<Segment>,
    append_at: usize,
}

impl SegmentChain {
    pub(crate) fn new() -> Self {
        Self {
            segments: vec![Segment::new()],
            append_at: 0,
        }
    }

    pub(crate) fn append(&mut self, kind: TokenKind, payload: Payload, ids: Option<PendingIds>) {
        let last = self.segments.len() - 1;
        match self.segments[last].append(self.append_at, kind, payload, ids) {
            None => self.append_at += 1,
            Some(next) => {
                tracing::trace!(segment = last + 1, "allocated token segment");
                self.segments.push(next);
                // the overflowing event took slot 0
                self.append_at = 1;
            }
        }
    }

    #[inline]
    pub(crate) fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    #[cfg(test)]
    pub(crate) fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of events stored.
    pub(crate) fn len(&self) -> usize {
        (self.segments.len() - 1) * TOKENS_PER_SEGMENT + self.append_at
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.append_at == 0 && self.segments.len() == 1
    }

    pub(crate) fn first_kind(&self) -> Option<TokenKind> {
        self.segments[0].kind_at(0)
    }

    pub(crate) fn has_ids(&self) -> bool {
        self.segments.iter().any(Segment::has_ids)
    }
}
