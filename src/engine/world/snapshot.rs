use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use thiserror::Error;

use crate::engine::body::BodyHandle;
use crate::engine::config::SimConfig;
use crate::engine::fixed_math::FixedNum;
use super::{BodyEntry, BodyPair, ImpactRecord, World, WorldError};

pub const SNAPSHOT_VERSION: u32 = 2;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] bincode::Error),
    #[error("unsupported snapshot version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error(transparent)]
    InvalidGrid(#[from] WorldError),
    #[error("body {0:?} is registered outside the grid")]
    BodyOutsideGrid(BodyHandle),
    #[error("body {body:?} has ordinal {ordinal}, which is reused or not below {next}")]
    InvalidOrdinal { body: BodyHandle, ordinal: u64, next: u64 },
}

/// Complete simulation state of a [`World`] at a tick boundary.
///
/// Holds the bodies with their handles and ordinals, live contacts, the tick
/// counter and the constants. The grid and the ordinal index are not stored;
/// they are rebuilt on restore. Queued events are not part of the state.
///
/// Decoding rejects slot data whose versions disagree with their occupancy;
/// the free list is rebuilt from the slots, so handles given out after a
/// restore may differ from the original world's. Simulation order follows
/// ordinals and is unaffected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub(crate) version: u32,
    cell_size: FixedNum,
    cols: usize,
    rows: usize,
    config: SimConfig,
    tick: u64,
    next_ordinal: u64,
    pub(crate) bodies: SlotMap<BodyHandle, BodyEntry>,
    live_impacts: Vec<(BodyPair, ImpactRecord)>,
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.cell_size == other.cell_size
            && (self.cols, self.rows) == (other.cols, other.rows)
            && self.config == other.config
            && self.tick == other.tick
            && self.next_ordinal == other.next_ordinal
            && self.bodies.len() == other.bodies.len()
            && self.bodies.iter().eq(other.bodies.iter())
            && self.live_impacts == other.live_impacts
    }
}

impl Snapshot {
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Write as bincode inside a zlib stream.
    pub fn encode(&self, writer: impl Write) -> Result<(), SnapshotError> {
        let mut encoder = ZlibEncoder::new(writer, Compression::default());
        bincode::serialize_into(&mut encoder, self)?;
        encoder.finish()?.flush()?;
        Ok(())
    }

    pub fn decode(reader: impl Read) -> Result<Self, SnapshotError> {
        let mut decoder = ZlibDecoder::new(reader);
        let snapshot: Snapshot = bincode::deserialize_from(&mut decoder)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

impl World {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            cell_size: self.grid.cell_size(),
            cols: self.grid.cols(),
            rows: self.grid.rows(),
            config: self.config,
            tick: self.tick,
            next_ordinal: self.next_ordinal,
            bodies: self.bodies.clone(),
            live_impacts: self.live_impacts.iter().map(|(pair, record)| (*pair, *record)).collect(),
        }
    }

    /// Rebuild a world that continues exactly where the snapshot was taken.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let mut world = Self::empty(snapshot.cell_size, snapshot.cols, snapshot.rows, snapshot.config)?;
        let mut order = BTreeMap::new();
        for (handle, entry) in snapshot.bodies.iter() {
            let ordinal = entry.ordinal;
            if ordinal >= snapshot.next_ordinal || order.insert(ordinal, handle).is_some() {
                return Err(SnapshotError::InvalidOrdinal { body: handle, ordinal, next: snapshot.next_ordinal });
            }
            if !world.grid.insert(handle, entry.cell) {
                return Err(SnapshotError::BodyOutsideGrid(handle));
            }
        }
        world.bodies = snapshot.bodies;
        world.order = order;
        world.next_ordinal = snapshot.next_ordinal;
        world.live_impacts = snapshot.live_impacts.into_iter().collect();
        world.tick = snapshot.tick;
        Ok(world)
    }

    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let file = File::create(path)?;
        self.snapshot().encode(BufWriter::new(file))
    }

    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let file = File::open(path)?;
        Self::from_snapshot(Snapshot::decode(BufReader::new(file))?)
    }
}
