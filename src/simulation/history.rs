use crate::agent::{Ant, AntKind};

/// What playback needs to redraw one ant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntSnapshot {
    pub x: i32,
    pub y: i32,
    pub kind: AntKind,
    pub load: u32,
}

impl From<&Ant> for AntSnapshot {
    fn from(ant: &Ant) -> Self {
        Self {
            x: ant.pos.0,
            y: ant.pos.1,
            kind: ant.kind,
            load: ant.load,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub tick: u64,
    pub ants: Vec<AntSnapshot>,
}

impl Snapshot {
    pub fn capture(tick: u64, ants: &[Ant]) -> Self {
        Self {
            tick,
            ants: ants.iter().map(AntSnapshot::from).collect(),
        }
    }
}

/// Append-only record of every tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    snapshots: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot taken at the end of `tick`; ticks start at 1.
    pub fn at(&self, tick: u64) -> Option<&Snapshot> {
        let index = usize::try_from(tick.checked_sub(1)?).ok()?;
        self.snapshots.get(index)
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }
}
