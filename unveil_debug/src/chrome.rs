// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Each region gets its own track (`tid` = slot index). Mounts, visibility
//! changes, and reveals are instant events; every element entrance becomes a
//! complete (`"X"`) span starting at `reveal + delay` and lasting `duration`,
//! so a stagger cascade reads as a staircase.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use unveil_core::trace::RegionEvent;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Timestamps are in microseconds, matching
/// [`HostTime`](unveil_core::time::HostTime) ticks.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::RegionMounted(e) => {
                events.push(instant("Mount", "Lifecycle", &e, json!({})));
            }
            RecordedEvent::RegionUnmounted(e) => {
                events.push(instant("Unmount", "Lifecycle", &e, json!({})));
            }
            RecordedEvent::Visibility(e) => {
                events.push(instant(
                    if e.intersecting { "Visible" } else { "Hidden" },
                    "Observer",
                    &e.region,
                    json!({ "ratio": e.ratio }),
                ));
            }
            RecordedEvent::Reveal(e) => {
                events.push(instant(
                    "Reveal",
                    "Reveal",
                    &e.region,
                    json!({ "elements": e.elements }),
                ));
            }
            RecordedEvent::EvaluateSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Evaluate",
                    "cat": "Summary",
                    "ts": s.now.ticks(),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "evaluation": s.evaluation,
                        "live_regions": s.live_regions,
                        "measured": s.measured,
                        "revealed": s.revealed,
                        "mounted": s.mounted,
                        "unmounted": s.unmounted,
                        "interactions": s.interactions,
                        "total_measurements": s.total_measurements,
                    }
                }));
            }
            RecordedEvent::ElementTargets { region, targets } => {
                for t in targets {
                    events.push(json!({
                        "ph": "X",
                        "name": format!("element {}", t.element_index),
                        "cat": "Entrance",
                        "ts": region.now.ticks() + u64::from(t.delay.get()) * 1000,
                        "dur": u64::from(t.duration.get()) * 1000,
                        "pid": 0,
                        "tid": track(&region),
                        "args": {
                            "delay_ms": t.delay.get(),
                            "opacity": t.opacity,
                        }
                    }));
                }
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn instant(name: &str, cat: &str, region: &RegionEvent, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": cat,
        "ts": region.now.ticks(),
        "pid": 0,
        "tid": track(region),
        "s": "t",
        "args": {
            "generation": region.generation,
            "detail": args,
        }
    })
}

/// Region slots start at 0; track 0 is reserved for summaries.
fn track(region: &RegionEvent) -> u64 {
    u64::from(region.region_index) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use unveil_core::time::{HostTime, Millis};
    use unveil_core::trace::{ElementTargetEvent, RevealEvent, TraceSink};

    #[test]
    fn export_produces_staircase() {
        let region = RegionEvent {
            region_index: 0,
            generation: 0,
            now: HostTime(1_000_000),
        };
        let mut rec = RecorderSink::new();
        rec.on_region_mounted(&region);
        rec.on_reveal(&RevealEvent {
            region,
            elements: 2,
        });
        rec.on_element_targets(
            &region,
            &[
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
            ],
        );

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["name"], "Mount");
        assert_eq!(parsed[1]["name"], "Reveal");
        assert_eq!(parsed[1]["tid"], 1);

        // Entrance spans start at reveal + delay.
        assert_eq!(parsed[2]["ph"], "X");
        assert_eq!(parsed[2]["ts"], 1_000_000);
        assert_eq!(parsed[3]["ts"], 1_100_000);
        assert_eq!(parsed[3]["dur"], 600_000);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
