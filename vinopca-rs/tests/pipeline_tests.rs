//! End-to-end pipeline tests over a synthetic wine corpus
//!
//! Spectra are generated as a smooth fluorescence background plus
//! group-specific Gaussian peaks and a little deterministic noise, stored in
//! a MemoryRepository the way a real corpus would be, then pushed through the
//! full fetch-mask-correct-reduce pipeline.

use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::Rng;
use vino_spectra::{MemoryRepository, SampleId, SpectraError, SpectraKind, WavelengthMask};
use vinopca_rs::{
    BaselineConfig, PipelineConfig, VinoPcaError, correct_matrix, run_pipeline,
};

const N_WAVELENGTHS: usize = 1044;
const N_GROUPS: usize = 3;
const PER_GROUP: usize = 4;

fn synthetic_corpus() -> MemoryRepository {
    let wavelengths = Array1::linspace(500.0, 3500.0, N_WAVELENGTHS);
    let mut rng = StdRng::seed_from_u64(42);

    let n_samples = N_GROUPS * PER_GROUP;
    let mut raw = Array2::zeros((N_WAVELENGTHS, n_samples));
    let mut labels = Vec::with_capacity(n_samples);

    for group in 0..N_GROUPS {
        // each wine gets its own characteristic peak position
        let peak_center = 300.0 + 150.0 * group as f64;
        for acquisition in 0..PER_GROUP {
            let column = group * PER_GROUP + acquisition;
            labels.push(SampleId::new(format!("{:04}", group + 1), acquisition as u32 + 1).to_string());
            for w in 0..N_WAVELENGTHS {
                let x = w as f64;
                let fluorescence = 800.0 + 1.2 * x - 0.0009 * x * x;
                let peak = 220.0 * (-((x - peak_center) / 7.0).powi(2)).exp();
                let shared = 130.0 * (-((x - 700.0) / 9.0).powi(2)).exp();
                let noise: f64 = rng.random_range(-1.5..1.5);
                raw[[w, column]] = fluorescence + peak + shared + noise;
            }
        }
    }

    let corrected = correct_matrix(&raw, &BaselineConfig::default())
        .expect("synthetic corpus corrects")
        .corrected;

    let mut repo = MemoryRepository::new(wavelengths);
    repo.insert(SpectraKind::Raw.as_tag(), raw, labels.clone())
        .expect("raw registers");
    repo.insert(SpectraKind::FluorescenceCorrected.as_tag(), corrected, labels)
        .expect("corrected registers");
    repo
}

#[test]
fn pipeline_reduces_a_corpus_end_to_end() {
    let repo = synthetic_corpus();
    let config = PipelineConfig {
        n_components: 5,
        ..Default::default()
    };

    let report = run_pipeline(&repo, &config).unwrap();

    let n_samples = N_GROUPS * PER_GROUP;
    assert_eq!(report.sample_ids.len(), n_samples);
    assert_eq!(report.pca.reduced.dim(), (n_samples, 5));
    assert_eq!(report.wavelengths.len(), 800);
    assert_eq!(report.pca.components.nrows(), 800);

    // groups were inserted in sorted order, so keys follow insertion order
    for (index, &key) in report.color_keys.iter().enumerate() {
        assert_eq!(key, index / PER_GROUP);
    }

    let correction = report.correction.as_ref().expect("raw path keeps diagnostics");
    assert_eq!(correction.converged.len(), n_samples);
    assert!(correction.iterations.iter().all(|&count| count >= 1));

    assert!(report.scree_values().sum() <= 1.0 + 1e-9);
    assert!(
        report.scree_values()[0] >= report.scree_values()[4],
        "scree values must be ordered"
    );
}

#[test]
fn pipeline_trusts_stored_corrected_spectra_when_asked() {
    let repo = synthetic_corpus();
    let config = PipelineConfig {
        n_components: 3,
        use_stored_corrected: true,
        ..Default::default()
    };

    let report = run_pipeline(&repo, &config).unwrap();

    assert!(report.correction.is_none());
    assert_eq!(report.pca.reduced.dim(), (N_GROUPS * PER_GROUP, 3));
}

#[test]
fn pipeline_separates_wines_in_reduced_space() {
    let repo = synthetic_corpus();
    let config = PipelineConfig {
        n_components: 2,
        ..Default::default()
    };

    let report = run_pipeline(&repo, &config).unwrap();

    // within-group spread must be smaller than the spread between group
    // centroids, otherwise the reduction lost the wine identity
    let reduced = &report.pca.reduced;
    let mut centroids = Vec::new();
    for group in 0..N_GROUPS {
        let mut centroid = [0.0f64; 2];
        for acquisition in 0..PER_GROUP {
            let row = group * PER_GROUP + acquisition;
            centroid[0] += reduced[[row, 0]] / PER_GROUP as f64;
            centroid[1] += reduced[[row, 1]] / PER_GROUP as f64;
        }
        centroids.push(centroid);
    }

    let mut max_within = 0.0f64;
    for group in 0..N_GROUPS {
        for acquisition in 0..PER_GROUP {
            let row = group * PER_GROUP + acquisition;
            let dx = reduced[[row, 0]] - centroids[group][0];
            let dy = reduced[[row, 1]] - centroids[group][1];
            max_within = max_within.max((dx * dx + dy * dy).sqrt());
        }
    }

    let mut min_between = f64::INFINITY;
    for a in 0..N_GROUPS {
        for b in (a + 1)..N_GROUPS {
            let dx = centroids[a][0] - centroids[b][0];
            let dy = centroids[a][1] - centroids[b][1];
            min_between = min_between.min((dx * dx + dy * dy).sqrt());
        }
    }

    assert!(
        min_between > max_within,
        "groups overlap in reduced space: between {min_between}, within {max_within}"
    );
}

#[test]
fn pipeline_rejects_unknown_data_types() {
    let repo = synthetic_corpus();
    let config = PipelineConfig {
        raw_tag: "unregistered".to_string(),
        ..Default::default()
    };

    assert!(matches!(
        run_pipeline(&repo, &config),
        Err(VinoPcaError::Spectra(SpectraError::UnknownDataType(_)))
    ));
}

#[test]
fn pipeline_rejects_excessive_component_counts() {
    let repo = synthetic_corpus();
    let config = PipelineConfig {
        n_components: 50, // more than the 12 samples available
        ..Default::default()
    };

    assert!(matches!(
        run_pipeline(&repo, &config),
        Err(VinoPcaError::InvalidParameter(_))
    ));
}

#[test]
fn pipeline_rejects_masks_outside_the_axis() {
    let repo = synthetic_corpus();
    let config = PipelineConfig {
        mask: Some(WavelengthMask::range(200, 2000).unwrap()),
        ..Default::default()
    };

    assert!(matches!(
        run_pipeline(&repo, &config),
        Err(VinoPcaError::Spectra(SpectraError::InvalidParameter(_)))
    ));
}
