use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use aoacore::prelude::AoaConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub frequency: u32,
    pub array_distance: f32,
    pub slot_samples_num: u16,
    pub azimuth: f32,
    pub elevation: f32,
    pub frames: usize,
    pub noise: f32,
    pub cfo_rad_per_ns: f32,
    pub seed: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let algo = AoaConfig::default();
        let generator = GeneratorConfig::default();
        Self {
            frequency: algo.frequency,
            array_distance: algo.array_distance,
            slot_samples_num: algo.slot_samples_num,
            azimuth: generator.azimuth,
            elevation: generator.elevation,
            frames: generator.frames,
            noise: generator.noise,
            cfo_rad_per_ns: generator.cfo_rad_per_ns,
            seed: generator.seed,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(azimuth: f32, elevation: f32, frames: usize) -> Self {
        Self {
            azimuth,
            elevation,
            frames,
            ..Self::default()
        }
    }

    pub fn to_aoa_config(&self) -> AoaConfig {
        AoaConfig {
            frequency: self.frequency,
            array_distance: self.array_distance,
            slot_samples_num: self.slot_samples_num,
            ..AoaConfig::default()
        }
    }

    pub fn to_generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            azimuth: self.azimuth,
            elevation: self.elevation,
            cfo_rad_per_ns: self.cfo_rad_per_ns,
            noise: self.noise,
            seed: self.seed,
            frames: self.frames,
            description: None,
        }
    }
}
