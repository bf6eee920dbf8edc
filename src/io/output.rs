use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::prelude::Float;
use crate::prelude::MVec;
use crate::prelude::Simulation;
use crate::prelude::SphError;
use crate::prelude::NUM_DIMENSIONS;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputParameters {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// The simulation-time interval between snapshots. With no
    /// interval configured only the final snapshot is written.
    #[serde(default)]
    pub snapshot_interval: Option<Float>,
    /// The simulation-time interval between checkpoint writes. Each
    /// write replaces `checkpoint.bin` in the output directory.
    #[serde(default)]
    pub checkpoint_interval: Option<Float>,
}

fn default_output_dir() -> PathBuf {
    "output".into()
}

impl Default for OutputParameters {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            snapshot_interval: None,
            checkpoint_interval: None,
        }
    }
}

/// One particle row of a snapshot: the canonical minimum field list
/// handed to the output collaborator.
#[derive(Clone, Debug)]
pub struct SnapshotRecord {
    pub id: usize,
    pub pos: MVec,
    pub vel: MVec,
    pub acc: MVec,
    pub mass: Float,
    pub dens: Float,
    pub pres: Float,
    pub ene: Float,
    pub sml: Float,
    pub volume: Float,
    pub neighbor_count: usize,
}

#[derive(Clone, Debug)]
pub struct Snapshot {
    pub time: Float,
    pub records: Vec<SnapshotRecord>,
    /// The auxiliary vector columns of the run (the reconstruction
    /// gradients of the Godunov variants), in registration order.
    /// Columns that have not been filled yet are left out.
    pub aux_vectors: Vec<(String, Vec<MVec>)>,
}

impl Snapshot {
    pub fn from_simulation(sim: &Simulation) -> Self {
        let records: Vec<_> = sim
            .particles
            .iter()
            .map(|particle| SnapshotRecord {
                id: particle.id,
                pos: particle.pos,
                vel: particle.vel,
                acc: particle.acc,
                mass: particle.mass,
                dens: particle.dens,
                pres: particle.pres,
                ene: particle.ene,
                sml: particle.sml,
                volume: particle.volume,
                neighbor_count: particle.neighbor_count,
            })
            .collect();
        let aux_vectors = sim
            .aux
            .vector_names()
            .filter_map(|name| {
                sim.aux
                    .vector(name)
                    .filter(|column| column.len() == records.len())
                    .map(|column| (name.to_owned(), column.to_vec()))
            })
            .collect();
        Self {
            time: sim.time,
            records,
            aux_vectors,
        }
    }
}

/// Where snapshots go. The core does not mandate a format; the
/// driver only hands over an ordered sequence of records on the
/// configured schedule.
pub trait SnapshotSink {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), SphError>;
}

/// The in-memory sink used by tests.
impl SnapshotSink for Vec<Snapshot> {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), SphError> {
        self.push(snapshot.clone());
        Ok(())
    }
}

/// Writes one delimited-text file per snapshot.
pub struct TextSnapshotWriter {
    output_dir: PathBuf,
    num_written: usize,
}

impl TextSnapshotWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            num_written: 0,
        }
    }

    fn header(snapshot: &Snapshot) -> String {
        let mut columns = vec!["t".into(), "id".into()];
        let axes = ["x", "y", "z"];
        for kind in ["pos", "vel", "acc"] {
            for axis in axes.iter().take(NUM_DIMENSIONS) {
                columns.push(format!("{}_{}", kind, axis));
            }
        }
        for name in ["mass", "dens", "pres", "ene", "sml", "volume", "neighbor"] {
            columns.push(name.into());
        }
        for (name, _) in snapshot.aux_vectors.iter() {
            for axis in axes.iter().take(NUM_DIMENSIONS) {
                columns.push(format!("{}_{}", name, axis));
            }
        }
        columns.join(",")
    }
}

impl SnapshotSink for TextSnapshotWriter {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), SphError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self
            .output_dir
            .join(format!("snapshot_{:04}.csv", self.num_written));
        let mut file = BufWriter::new(File::create(path)?);
        writeln!(file, "{}", Self::header(snapshot))?;
        for (row, record) in snapshot.records.iter().enumerate() {
            write!(file, "{:.10e},{}", snapshot.time, record.id)?;
            for vector in [&record.pos, &record.vel, &record.acc] {
                for axis in 0..NUM_DIMENSIONS {
                    write!(file, ",{:.10e}", vector[axis])?;
                }
            }
            write!(
                file,
                ",{:.10e},{:.10e},{:.10e},{:.10e},{:.10e},{:.10e},{}",
                record.mass,
                record.dens,
                record.pres,
                record.ene,
                record.sml,
                record.volume,
                record.neighbor_count
            )?;
            for (_, column) in snapshot.aux_vectors.iter() {
                for axis in 0..NUM_DIMENSIONS {
                    write!(file, ",{:.10e}", column[row][axis])?;
                }
            }
            writeln!(file)?;
        }
        self.num_written += 1;
        Ok(())
    }
}
