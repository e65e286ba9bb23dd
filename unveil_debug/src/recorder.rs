// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. [`decode`] reads them back as an
//! iterator of [`RecordedEvent`].
//!
//! Element targets are stored in full (index, delay, duration, opacity) so
//! that an entrance cascade can be replayed from the recording alone.

use unveil_core::time::{HostTime, Millis};
use unveil_core::trace::{
    ElementTargetEvent, EvaluateSummary, RegionEvent, RevealEvent, TraceSink, VisibilityEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_REGION_MOUNTED: u8 = 1;
const TAG_REGION_UNMOUNTED: u8 = 2;
const TAG_VISIBILITY: u8 = 3;
const TAG_REVEAL: u8 = 4;
const TAG_EVALUATE_SUMMARY: u8 = 5;
const TAG_ELEMENT_TARGETS: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_region(&mut self, e: &RegionEvent) {
        self.write_u32(e.region_index);
        self.write_u32(e.generation);
        self.write_u64(e.now.ticks());
    }
}

impl TraceSink for RecorderSink {
    fn on_region_mounted(&mut self, e: &RegionEvent) {
        self.write_u8(TAG_REGION_MOUNTED);
        self.write_region(e);
    }

    fn on_region_unmounted(&mut self, e: &RegionEvent) {
        self.write_u8(TAG_REGION_UNMOUNTED);
        self.write_region(e);
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        self.write_u8(TAG_VISIBILITY);
        self.write_region(&e.region);
        self.write_u8(u8::from(e.intersecting));
        self.write_f64(e.ratio);
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        self.write_u8(TAG_REVEAL);
        self.write_region(&e.region);
        self.write_u32(e.elements);
    }

    fn on_evaluate_summary(&mut self, s: &EvaluateSummary) {
        self.write_u8(TAG_EVALUATE_SUMMARY);
        self.write_u64(s.evaluation);
        self.write_u64(s.now.ticks());
        self.write_u32(s.live_regions);
        self.write_u32(s.measured);
        self.write_u32(s.revealed);
        self.write_u32(s.mounted);
        self.write_u32(s.unmounted);
        self.write_u32(s.interactions);
        self.write_u64(s.total_measurements);
    }

    fn on_element_targets(&mut self, region: &RegionEvent, targets: &[ElementTargetEvent]) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "element count capped at u32::MAX for recording"
        )]
        let count = targets.len().min(u32::MAX as usize) as u32;
        self.write_u8(TAG_ELEMENT_TARGETS);
        self.write_region(region);
        self.write_u32(count);
        for t in targets.iter().take(count as usize) {
            self.write_u32(t.element_index);
            self.write_u32(t.delay.get());
            self.write_u32(t.duration.get());
            self.write_u32(t.opacity.to_bits());
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A region was mounted.
    RegionMounted(RegionEvent),
    /// A region was unmounted.
    RegionUnmounted(RegionEvent),
    /// A [`VisibilityEvent`].
    Visibility(VisibilityEvent),
    /// A [`RevealEvent`].
    Reveal(RevealEvent),
    /// An [`EvaluateSummary`].
    EvaluateSummary(EvaluateSummary),
    /// The element targets of a revealed region.
    ElementTargets {
        /// The revealed region.
        region: RegionEvent,
        /// One entry per element, in element order.
        targets: Vec<ElementTargetEvent>,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_region(&mut self) -> Option<RegionEvent> {
        Some(RegionEvent {
            region_index: self.read_u32()?,
            generation: self.read_u32()?,
            now: HostTime(self.read_u64()?),
        })
    }

    fn decode_visibility(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Visibility(VisibilityEvent {
            region: self.read_region()?,
            intersecting: self.read_u8()? != 0,
            ratio: f64::from_bits(self.read_u64()?),
        }))
    }

    fn decode_reveal(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Reveal(RevealEvent {
            region: self.read_region()?,
            elements: self.read_u32()?,
        }))
    }

    fn decode_evaluate_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::EvaluateSummary(EvaluateSummary {
            evaluation: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            live_regions: self.read_u32()?,
            measured: self.read_u32()?,
            revealed: self.read_u32()?,
            mounted: self.read_u32()?,
            unmounted: self.read_u32()?,
            interactions: self.read_u32()?,
            total_measurements: self.read_u64()?,
        }))
    }

    fn decode_element_targets(&mut self) -> Option<RecordedEvent> {
        let region = self.read_region()?;
        let count = self.read_u32()? as usize;
        // Each record is 16 bytes; refuse counts the buffer cannot hold.
        if self.remaining() / 16 < count {
            return None;
        }
        let mut targets = Vec::with_capacity(count);
        for _ in 0..count {
            targets.push(ElementTargetEvent {
                element_index: self.read_u32()?,
                delay: Millis(self.read_u32()?),
                duration: Millis(self.read_u32()?),
                opacity: f32::from_bits(self.read_u32()?),
            });
        }
        Some(RecordedEvent::ElementTargets { region, targets })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_REGION_MOUNTED => self.read_region().map(RecordedEvent::RegionMounted),
            TAG_REGION_UNMOUNTED => self.read_region().map(RecordedEvent::RegionUnmounted),
            TAG_VISIBILITY => self.decode_visibility(),
            TAG_REVEAL => self.decode_reveal(),
            TAG_EVALUATE_SUMMARY => self.decode_evaluate_summary(),
            TAG_ELEMENT_TARGETS => self.decode_element_targets(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use kurbo::Rect;
    use unveil_core::orchestrator::{ElementConfig, RegionConfig, SectionOrchestrator};
    use unveil_core::stage::Stage;
    use unveil_core::trace::Tracer;
    use unveil_core::variant::AnimationVariant;

    use super::*;

    fn sample_region() -> RegionEvent {
        RegionEvent {
            region_index: 1,
            generation: 3,
            now: HostTime(2_000_000),
        }
    }

    #[test]
    fn visibility_keeps_ratio_bits() {
        let mut rec = RecorderSink::new();
        let orig = VisibilityEvent {
            region: sample_region(),
            intersecting: true,
            ratio: 0.123_456_789,
        };
        rec.on_visibility(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events, [RecordedEvent::Visibility(orig)]);
    }

    #[test]
    fn element_targets_are_stored_in_full() {
        let mut rec = RecorderSink::new();
        let targets = [
            ElementTargetEvent {
                element_index: 0,
                delay: Millis(0),
                duration: Millis(600),
                opacity: 1.0,
            },
            ElementTargetEvent {
                element_index: 1,
                delay: Millis(100),
                duration: Millis(600),
                opacity: 1.0,
            },
        ];
        rec.on_element_targets(&sample_region(), &targets);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::ElementTargets { region, targets: t } => {
                assert_eq!(*region, sample_region());
                assert_eq!(t.as_slice(), &targets);
            }
            other => panic!("expected ElementTargets, got {other:?}"),
        }
    }

    #[test]
    fn truncated_buffer_stops_cleanly() {
        let mut rec = RecorderSink::new();
        rec.on_reveal(&RevealEvent {
            region: sample_region(),
            elements: 4,
        });
        rec.on_region_mounted(&sample_region());
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 3];
        let events: Vec<_> = decode(cut).collect();
        assert_eq!(events.len(), 1, "only the complete record decodes");
        assert!(matches!(events[0], RecordedEvent::Reveal(_)));
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn records_a_traced_evaluation() {
        let mut section = SectionOrchestrator::new("projects", RegionConfig::section());
        let card = AnimationVariant::fade_rise(40.0).shared();
        let _ = section.add_element(ElementConfig::new(0, card.clone()));
        let _ = section.add_element(ElementConfig::new(1, card));

        let mut stage = Stage::new();
        stage.set_viewport(Rect::new(0.0, 0.0, 1280.0, 800.0));
        let id = stage.mount(section);
        let _ = stage.set_bounds(id, Some(Rect::new(0.0, 300.0, 1280.0, 900.0)));

        let mut rec = RecorderSink::new();
        let mut tracer = Tracer::new(&mut rec);
        let _ = stage.evaluate_traced(HostTime(10_000), &mut tracer);
        drop(tracer);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert!(matches!(events[0], RecordedEvent::RegionMounted(_)));
        assert!(matches!(events[1], RecordedEvent::Visibility(VisibilityEvent { intersecting: true, .. })));
        assert!(matches!(events[2], RecordedEvent::Reveal(RevealEvent { elements: 2, .. })));
        match &events[3] {
            RecordedEvent::ElementTargets { targets, .. } => {
                let delays: Vec<_> = targets.iter().map(|t| t.delay).collect();
                assert_eq!(delays, [Millis(0), Millis(100)]);
            }
            other => panic!("expected ElementTargets, got {other:?}"),
        }
        assert!(matches!(events[4], RecordedEvent::EvaluateSummary(_)));
        assert_eq!(events.len(), 5);
    }
}
