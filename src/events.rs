use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use itertools::Itertools;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Press,
    Drag,
}

/// A pointer event in screen pixels, delivered just before `frame` is ticked.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct PointerEvent {
    pub frame: u64,
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
}

/// Reads a `frame,kind,x,y` script with a header row.
pub fn read_script<R: Read>(reader: R) -> Result<Vec<PointerEvent>> {
    let events = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect::<std::result::Result<Vec<PointerEvent>, csv::Error>>()?;

    Ok(events)
}

pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Vec<PointerEvent>> {
    read_script(std::fs::File::open(path)?)
}

/// `count` presses spread uniformly over the canvas and over `frames`.
///
/// A canvas without area gets no presses.
pub fn random_presses<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    frames: u64,
    width: f32,
    height: f32,
) -> Vec<PointerEvent> {
    if frames == 0 || !(width > 0. && height > 0.) {
        return Vec::new();
    }

    let frame_dist = Uniform::new(0, frames);
    let x_dist = Uniform::new(0f32, width);
    let y_dist = Uniform::new(0f32, height);

    (0..count)
        .map(|_| PointerEvent {
            frame: frame_dist.sample(rng),
            kind: PointerKind::Press,
            x: x_dist.sample(rng),
            y: y_dist.sample(rng),
        })
        .sorted_by_key(|e| e.frame)
        .collect()
}

/// Events grouped by the frame they belong to, capture order kept within a frame.
#[derive(Debug, Clone, Default)]
pub struct EventSchedule {
    by_frame: HashMap<u64, Vec<PointerEvent>>,
}

impl EventSchedule {
    pub fn new(events: impl IntoIterator<Item = PointerEvent>) -> Self {
        EventSchedule {
            by_frame: events.into_iter().into_group_map_by(|e| e.frame),
        }
    }

    pub fn take_frame(&mut self, frame: u64) -> Vec<PointerEvent> {
        self.by_frame.remove(&frame).unwrap_or_default()
    }

    /// Events not delivered yet.
    pub fn remaining(&self) -> usize {
        self.by_frame.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SCRIPT: &str = "frame,kind,x,y
0, press, 100, 200
0, drag, 110, 210
3, press, 2000.5, 40
";

    #[test]
    fn reads_script_rows() -> Result<()> {
        let events = read_script(SCRIPT.as_bytes())?;

        assert_eq!(
            events,
            vec![
                PointerEvent {
                    frame: 0,
                    kind: PointerKind::Press,
                    x: 100.,
                    y: 200.
                },
                PointerEvent {
                    frame: 0,
                    kind: PointerKind::Drag,
                    x: 110.,
                    y: 210.
                },
                PointerEvent {
                    frame: 3,
                    kind: PointerKind::Press,
                    x: 2000.5,
                    y: 40.
                },
            ]
        );

        Ok(())
    }

    #[test]
    fn rejects_unknown_kinds() {
        let script = "frame,kind,x,y\n1,hover,3,4\n";

        assert!(read_script(script.as_bytes()).is_err());
    }

    #[test]
    fn schedule_hands_out_each_frame_once() -> Result<()> {
        let mut schedule = EventSchedule::new(read_script(SCRIPT.as_bytes())?);

        assert_eq!(schedule.remaining(), 3);

        let first = schedule.take_frame(0);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].kind, PointerKind::Press);
        assert_eq!(first[1].kind, PointerKind::Drag);

        assert!(schedule.take_frame(0).is_empty());
        assert!(schedule.take_frame(1).is_empty());
        assert_eq!(schedule.take_frame(3).len(), 1);
        assert_eq!(schedule.remaining(), 0);

        Ok(())
    }

    #[test]
    fn random_presses_stay_on_canvas() {
        let mut rng = StdRng::seed_from_u64(9);

        let events = random_presses(&mut rng, 500, 60, 800., 600.);

        assert_eq!(events.len(), 500);
        assert!(events.windows(2).all(|w| w[0].frame <= w[1].frame));
        for e in &events {
            assert!(e.frame < 60);
            assert!((0. ..800.).contains(&e.x));
            assert!((0. ..600.).contains(&e.y));
        }

        assert!(random_presses(&mut rng, 10, 0, 800., 600.).is_empty());
    }

    #[test]
    fn random_presses_need_a_canvas_with_area() {
        let mut rng = StdRng::seed_from_u64(9);

        assert!(random_presses(&mut rng, 5, 10, 0., 0.).is_empty());
        assert!(random_presses(&mut rng, 5, 10, 800., 0.).is_empty());
        assert!(random_presses(&mut rng, 5, 10, f32::NAN, 600.).is_empty());
    }
}
