use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::gravity::GravityParameters;
use crate::hydrodynamics::HydrodynamicsParameters;
use crate::io::output::OutputParameters;
use crate::prelude::Kernel;
use crate::prelude::SimulationBox;
use crate::prelude::SphError;
use crate::prelude::NUM_DIMENSIONS;
use crate::quadtree::QuadTreeConfig;
use crate::simulation::SimulationParameters;
use crate::timestep::TimestepParameters;

/// All parameters of a run, read from one YAML file with one section
/// per module.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Parameters {
    pub simulation: SimulationParameters,
    pub box_size: SimulationBox,
    pub hydrodynamics: HydrodynamicsParameters,
    #[serde(default)]
    pub gravity: GravityParameters,
    #[serde(default)]
    pub timestep: TimestepParameters,
    #[serde(default)]
    pub tree: QuadTreeConfig,
    #[serde(default)]
    pub output: OutputParameters,
}

impl Parameters {
    pub fn from_yaml_file(path: &Path) -> Result<Self, SphError> {
        let contents = fs::read_to_string(path).map_err(|error| {
            SphError::Config(format!("failed to read parameter file {:?}: {}", path, error))
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, SphError> {
        let parameters: Self = serde_yaml::from_str(contents)
            .map_err(|error| SphError::Config(error.to_string()))?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// The kernel of the run, constructed once and shared.
    pub fn kernel(&self) -> Kernel {
        #[cfg(not(any(feature = "1d", feature = "2d")))]
        if let Some(two_and_half) = &self.hydrodynamics.two_and_half_sim {
            return Kernel::anisotropic(self.hydrodynamics.kernel, two_and_half.h_z);
        }
        Kernel::new(self.hydrodynamics.kernel, NUM_DIMENSIONS)
    }

    pub fn validate(&self) -> Result<(), SphError> {
        if self.simulation.dimension != NUM_DIMENSIONS {
            return Err(SphError::DimensionMismatch {
                compiled: NUM_DIMENSIONS,
                requested: self.simulation.dimension,
            });
        }
        for axis in 0..NUM_DIMENSIONS {
            if self.box_size.min[axis] >= self.box_size.max[axis] {
                return Err(SphError::Config(format!(
                    "box_size is empty along axis {}",
                    axis
                )));
            }
        }
        let hydro = &self.hydrodynamics;
        if hydro.gamma <= 1.0 {
            return Err(SphError::Config(format!(
                "gamma must exceed 1, got {}",
                hydro.gamma
            )));
        }
        if hydro.neighbor_number == 0 {
            return Err(SphError::Config("neighbor_number must be positive".into()));
        }
        if hydro.max_neighbor_number < hydro.neighbor_number {
            return Err(SphError::Config(format!(
                "max_neighbor_number {} is below neighbor_number {}",
                hydro.max_neighbor_number, hydro.neighbor_number
            )));
        }
        let av = &hydro.artificial_viscosity;
        if av.alpha_min > av.alpha_max {
            return Err(SphError::Config(format!(
                "alpha_min {} exceeds alpha_max {}",
                av.alpha_min, av.alpha_max
            )));
        }
        if let Some(two_and_half) = &hydro.two_and_half_sim {
            if NUM_DIMENSIONS != 3 {
                return Err(SphError::Config(
                    "two_and_half_sim requires a 3d build".into(),
                ));
            }
            if two_and_half.h_z <= 0.0 {
                return Err(SphError::Config("h_z must be positive".into()));
            }
        }
        let timestep = &self.timestep;
        for (name, value) in [
            ("cfl_sound", timestep.cfl_sound),
            ("cfl_force", timestep.cfl_force),
            ("cfl_signal", timestep.cfl_signal),
        ] {
            if value <= 0.0 {
                return Err(SphError::Config(format!("{} must be positive", name)));
            }
        }
        if timestep.min_timestep > timestep.max_timestep {
            return Err(SphError::Config(format!(
                "min_timestep {} exceeds max_timestep {}",
                timestep.min_timestep, timestep.max_timestep
            )));
        }
        if self.simulation.end_time <= 0.0 {
            return Err(SphError::Config("end_time must be positive".into()));
        }
        for (name, interval) in [
            ("snapshot_interval", self.output.snapshot_interval),
            ("checkpoint_interval", self.output.checkpoint_interval),
        ] {
            if let Some(interval) = interval {
                if interval <= 0.0 {
                    return Err(SphError::Config(format!("{} must be positive", name)));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Parameters;
    use crate::prelude::SphError;
    use crate::prelude::NUM_DIMENSIONS;

    fn minimal_yaml() -> String {
        let ones = vec!["1.0"; NUM_DIMENSIONS].join(", ");
        let zeros = vec!["0.0"; NUM_DIMENSIONS].join(", ");
        format!(
            "simulation:\n  end_time: 0.2\nbox_size:\n  min: [{}]\n  max: [{}]\nhydrodynamics:\n  sph_type: GSPH\n",
            zeros, ones
        )
    }

    #[test]
    fn minimal_parameter_file_parses() {
        let parameters = Parameters::from_yaml_str(&minimal_yaml()).unwrap();
        assert_eq!(parameters.simulation.end_time, 0.2);
        assert!(parameters.hydrodynamics.sph_type.is_godunov());
        assert!(!parameters.gravity.enabled);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let yaml = format!("{}  frobnicate: 3\n", minimal_yaml());
        assert!(matches!(
            Parameters::from_yaml_str(&yaml),
            Err(SphError::Config(_))
        ));
    }

    #[test]
    fn unknown_variants_are_rejected() {
        let yaml = minimal_yaml().replace("GSPH", "XSPH");
        assert!(matches!(
            Parameters::from_yaml_str(&yaml),
            Err(SphError::Config(_))
        ));
    }

    #[test]
    fn dimension_mismatch_is_fatal() {
        let yaml = minimal_yaml().replace(
            "simulation:\n  end_time: 0.2\n",
            &format!(
                "simulation:\n  end_time: 0.2\n  dimension: {}\n",
                NUM_DIMENSIONS + 1
            ),
        );
        let result = Parameters::from_yaml_str(&yaml);
        assert!(matches!(result, Err(SphError::DimensionMismatch { .. })));
    }
}
