//! Build a small synthetic wine corpus and run the reduction pipeline.
//!
//! Run with logging:
//! ```sh
//! RUST_LOG=info cargo run --example basic_usage
//! ```

use anyhow::Result;
use ndarray::{Array1, Array2};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use vino_spectra::{MemoryRepository, SampleId, SpectraKind, SpectralRepository};
use vinopca_rs::{BaselineConfig, PipelineConfig, correct_matrix, run_pipeline};

const N_WAVELENGTHS: usize = 1044;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Three wines, five acquisitions each, on the usual 1044-point axis.
    let wavelengths = Array1::linspace(500.0, 3500.0, N_WAVELENGTHS);
    let mut rng = StdRng::seed_from_u64(7);

    let mut raw = Array2::zeros((N_WAVELENGTHS, 15));
    let mut labels = Vec::new();
    for wine in 0..3 {
        let peak_center = 320.0 + 160.0 * wine as f64;
        for acquisition in 0..5 {
            let column = wine * 5 + acquisition;
            labels.push(SampleId::new(format!("{:04}", wine + 1), acquisition as u32 + 1).to_string());
            for w in 0..N_WAVELENGTHS {
                let x = w as f64;
                let fluorescence = 900.0 + 1.1 * x - 0.0008 * x * x;
                let peak = 240.0 * (-((x - peak_center) / 8.0).powi(2)).exp();
                raw[[w, column]] = fluorescence + peak + rng.random_range(-2.0..2.0);
            }
        }
    }

    let corrected = correct_matrix(&raw, &BaselineConfig::default())?.corrected;

    let mut repo = MemoryRepository::new(wavelengths);
    repo.insert(SpectraKind::Raw.as_tag(), raw, labels.clone())?;
    repo.insert(SpectraKind::FluorescenceCorrected.as_tag(), corrected, labels)?;

    println!("corpus: {:?} wines", repo.group_summary()?.len());

    let config = PipelineConfig {
        n_components: 5,
        ..Default::default()
    };
    let report = run_pipeline(&repo, &config)?;

    println!(
        "reduced {} samples to {} components over {} wavelengths",
        report.pca.reduced.nrows(),
        report.pca.n_components(),
        report.wavelengths.len()
    );
    if let Some(correction) = &report.correction {
        println!(
            "baseline fits: {} samples, {} unconverged",
            correction.converged.len(),
            correction.n_unconverged()
        );
    }
    println!(
        "scree values: {}",
        serde_json::to_string(&report.scree_values().to_vec())?
    );

    for (identifier, key) in report.sample_ids.iter().zip(&report.color_keys).take(6) {
        println!("  {identifier} -> color key {key}");
    }

    Ok(())
}
