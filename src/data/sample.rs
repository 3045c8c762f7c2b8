//! Synthetic two-region epidemic datasets.
//!
//! Each region is an explicit-Euler SIRD run observed through multiplicative
//! log-normal noise. Recovered and deceased counts are cumulative, so their
//! noisy observations are forced to be non-decreasing.

use std::fs::File;
use std::path::Path;

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{EulerMethod, RateParameters, SampleConfig, SirdState};
use crate::error::AppError;
use crate::models::simulate_from;

/// Observed counts for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCounts {
    pub region: String,
    pub infected: Vec<f64>,
    pub recovered: Vec<f64>,
    pub deceased: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    pub day: Vec<f64>,
    pub primary: RegionCounts,
    pub comparison: RegionCounts,
}

pub fn generate_sample(config: &SampleConfig) -> Result<SampleData, AppError> {
    if config.samples < 2 {
        return Err(AppError::new(2, "Sample count must be at least 2."));
    }
    if !(config.dt.is_finite() && config.dt > 0.0) {
        return Err(AppError::new(2, "Sample time step must be > 0."));
    }
    if !(config.population.is_finite() && config.initial_infected > 0.0 && config.initial_infected < config.population) {
        return Err(AppError::new(2, "Initial infected must be in (0, population)."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Noise level must be >= 0."));
    }
    if config.region.eq_ignore_ascii_case(&config.compare_region) {
        return Err(AppError::new(2, "Primary and comparison regions must differ."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let day: Vec<f64> = (0..config.samples).map(|i| i as f64 * config.dt).collect();

    let compare_rates = RateParameters {
        transmission: config.rates.transmission * config.compare_scale,
        ..config.rates
    };

    let primary = observe_region(config, &config.region, &config.rates, &day, &mut rng, &normal);
    let comparison = observe_region(config, &config.compare_region, &compare_rates, &day, &mut rng, &normal);

    Ok(SampleData {
        day,
        primary,
        comparison,
    })
}

fn observe_region(
    config: &SampleConfig,
    region: &str,
    rates: &RateParameters,
    day: &[f64],
    rng: &mut StdRng,
    normal: &Normal<f64>,
) -> RegionCounts {
    let initial = SirdState {
        susceptible: config.population - config.initial_infected,
        infected: config.initial_infected,
        recovered: 0.0,
        deceased: 0.0,
    };
    let trace = simulate_from(initial, day, rates, config.dt, EulerMethod::Explicit);

    let mut noisy = |v: f64| (v.max(0.0) * normal.sample(&mut *rng).exp()).round();

    let infected = trace.infected.iter().map(|&v| noisy(v)).collect();
    let recovered = running_max(trace.recovered.iter().map(|&v| noisy(v)));
    let deceased = running_max(trace.deceased.iter().map(|&v| noisy(v)));

    RegionCounts {
        region: region.to_ascii_lowercase(),
        infected,
        recovered,
        deceased,
    }
}

fn running_max(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut best = f64::NEG_INFINITY;
    values
        .map(|v| {
            best = best.max(v);
            best
        })
        .collect()
}

/// Write a generated dataset in the ingest schema.
pub fn write_sample_csv(path: &Path, sample: &SampleData) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create sample CSV '{}': {e}", path.display())))?;
    let mut wtr = csv::Writer::from_writer(file);

    let mut header = vec!["day".to_string()];
    for counts in [&sample.primary, &sample.comparison] {
        for column in ["infected", "recovered", "deceased"] {
            header.push(format!("{column}_{}", counts.region));
        }
    }
    wtr.write_record(&header)
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV header: {e}")))?;

    for (t, day) in sample.day.iter().enumerate() {
        let mut row = vec![day.to_string()];
        for counts in [&sample.primary, &sample.comparison] {
            row.push(counts.infected[t].to_string());
            row.push(counts.recovered[t].to_string());
            row.push(counts.deceased[t].to_string());
        }
        wtr.write_record(&row)
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sample CSV: {e}")))?;

    info!("wrote {} synthetic samples to {}", sample.day.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> SampleConfig {
        SampleConfig {
            output: PathBuf::from("unused.csv"),
            population: 1_000_000.0,
            samples: 30,
            dt: 10.0,
            initial_infected: 100.0,
            rates: RateParameters {
                recovery: 0.07,
                mortality: 0.002,
                transmission: 1.5e-7,
            },
            noise: 0.05,
            seed: 42,
            region: "can".to_string(),
            compare_region: "usa".to_string(),
            compare_scale: 1.3,
        }
    }

    #[test]
    fn same_seed_same_sample() {
        let a = generate_sample(&config()).unwrap();
        let b = generate_sample(&config()).unwrap();
        assert_eq!(a, b);

        let mut other = config();
        other.seed = 7;
        let c = generate_sample(&other).unwrap();
        assert_ne!(a.primary.infected, c.primary.infected);
    }

    #[test]
    fn cumulative_columns_never_decrease() {
        let sample = generate_sample(&config()).unwrap();
        for counts in [&sample.primary, &sample.comparison] {
            assert!(counts.recovered.windows(2).all(|w| w[1] >= w[0]));
            assert!(counts.deceased.windows(2).all(|w| w[1] >= w[0]));
            assert!(counts.infected.iter().all(|&v| v >= 0.0 && v.fract() == 0.0));
        }
        assert_eq!(sample.day.len(), 30);
        assert_eq!(sample.day[29], 290.0);
    }

    #[test]
    fn zero_noise_reproduces_the_solver() {
        let mut cfg = config();
        cfg.noise = 0.0;
        let sample = generate_sample(&cfg).unwrap();
        assert_eq!(sample.primary.infected[0], 100.0);
        assert_eq!(sample.primary.recovered[0], 0.0);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut cfg = config();
        cfg.samples = 1;
        assert_eq!(generate_sample(&cfg).unwrap_err().exit_code(), 2);

        let mut cfg = config();
        cfg.compare_region = "CAN".to_string();
        assert!(generate_sample(&cfg).is_err());
    }
}
