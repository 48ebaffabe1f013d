use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::world::World;

/// Writes the world view to pretty JSON every N turns. Snapshots are a
/// write-only observability surface for external renderers; the core never
/// reads them back.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_turns: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_turns: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_turns,
        }
    }

    pub fn maybe_write(&self, world: &World, scenario_name: &str) -> Result<Option<PathBuf>> {
        if self.interval_turns == 0 || world.turn() % self.interval_turns != 0 {
            return Ok(None);
        }
        let dir = self.dir.join(scenario_name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create snapshot directory {}", dir.display()))?;
        let path = dir.join(format!("turn_{:06}.json", world.turn()));
        let json = serde_json::to_vec_pretty(&world.snapshot(scenario_name))?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        Ok(Some(path))
    }
}
