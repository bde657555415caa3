//! Provider Composition
//!
//! Turns the resolved run configuration into the two result providers. The
//! baseline is always measured live; the reference is live or replayed from
//! the fixture table. A reference implementation that cannot be loaded falls
//! back to the fixture table when one is configured, and is fatal otherwise.

use crate::config::{ReferenceStrategy, RunConfig};
use std::sync::Arc;
use tokbench_core::{
    CoreError, FixtureProvider, FixtureTable, LiveProvider, MeasurementEngine, MemorySampler,
    ResultProvider, TokenizerRegistry,
};

/// Baseline and reference providers for one run
pub struct Providers {
    /// Implementation A, always live
    pub baseline: LiveProvider,
    /// Implementation B
    pub reference: Box<dyn ResultProvider>,
}

/// Acquire tokenizers and wire up both providers
///
/// Fails with `CoreError::Unavailable` when the baseline tokenizer cannot be
/// loaded, or when a live reference cannot be loaded and no fixture table
/// exists to fall back on.
pub fn build_providers(
    run: &RunConfig,
    sampler: Arc<dyn MemorySampler>,
) -> Result<Providers, CoreError> {
    let baseline_tokenizer =
        TokenizerRegistry::acquire(&run.baseline.implementation, &run.encoding)?;
    tracing::debug!(
        implementation = %run.baseline.implementation,
        encoding = %run.encoding,
        "baseline tokenizer loaded"
    );

    let reference_spec = &run.reference.spec;
    let fixture_reference = |table: FixtureTable| -> Box<dyn ResultProvider> {
        Box::new(FixtureProvider::new(
            &reference_spec.label,
            &reference_spec.implementation,
            table,
            Arc::clone(&baseline_tokenizer),
        ))
    };

    let reference: Box<dyn ResultProvider> = match run.reference.strategy {
        ReferenceStrategy::Fixture => {
            let table = run
                .reference
                .fixture
                .clone()
                .ok_or_else(|| CoreError::Unavailable {
                    implementation: reference_spec.implementation.clone(),
                    encoding: run.encoding.clone(),
                    reason: "no fixture table configured".to_string(),
                })?;
            tracing::warn!(
                source = %table.source,
                "reference figures are pre-recorded, not measured on this machine"
            );
            fixture_reference(table)
        }
        ReferenceStrategy::Live => {
            match TokenizerRegistry::acquire(&reference_spec.implementation, &run.encoding) {
                Ok(tokenizer) => Box::new(LiveProvider::new(
                    &reference_spec.label,
                    MeasurementEngine::new(tokenizer, Arc::clone(&sampler)),
                )),
                Err(err) => match run.reference.fixture.clone() {
                    Some(table) => {
                        tracing::warn!(
                            error = %err,
                            source = %table.source,
                            "reference implementation unavailable, using pre-recorded figures"
                        );
                        fixture_reference(table)
                    }
                    None => return Err(err),
                },
            }
        }
    };

    let baseline = LiveProvider::new(
        &run.baseline.label,
        MeasurementEngine::new(baseline_tokenizer, sampler),
    );

    Ok(Providers {
        baseline,
        reference,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Overrides, TokbenchConfig};
    use tokbench_core::{FixtureFigures, MeasureParams, Provenance};

    struct FlatMemory;

    impl MemorySampler for FlatMemory {
        fn resident_megabytes(&self) -> f64 {
            10.0
        }
    }

    fn table() -> FixtureTable {
        let figures = FixtureFigures {
            encode_seconds: 4.1e-6,
            decode_seconds: 6.8e-6,
            memory_used_mb: 0.05,
        };
        FixtureTable {
            source: "recorded".to_string(),
            short: figures,
            long: figures,
        }
    }

    fn byte_level_config() -> TokbenchConfig {
        let mut config = TokbenchConfig::default();
        config.baseline.implementation = "byte-level".to_string();
        config.reference.implementation = "byte-level".to_string();
        config
    }

    #[test]
    fn test_live_reference() {
        let run = RunConfig::resolve(&byte_level_config(), &Overrides::default()).unwrap();
        let providers = build_providers(&run, Arc::new(FlatMemory)).unwrap();
        let params = MeasureParams::new(2, 0).unwrap();

        let result = providers.reference.provide("abc", &params).unwrap();
        assert_eq!(result.provenance, Provenance::Live);
        assert_eq!(result.token_count, 3);
    }

    #[test]
    fn test_fixture_reference() {
        let mut config = byte_level_config();
        config.reference.fixture = Some(table());
        config.reference.label = Some("recorded impl".to_string());
        let overrides = Overrides {
            strategy: Some(ReferenceStrategy::Fixture),
            ..Default::default()
        };
        let run = RunConfig::resolve(&config, &overrides).unwrap();
        let providers = build_providers(&run, Arc::new(FlatMemory)).unwrap();

        assert_eq!(providers.reference.label(), "recorded impl");
        let result = providers
            .reference
            .provide("abc", &MeasureParams::default())
            .unwrap();
        assert!(!result.provenance.is_live());
        // Token count comes from the baseline tokenizer
        assert_eq!(result.token_count, 3);
    }

    #[test]
    fn test_unknown_baseline_is_fatal() {
        let mut config = byte_level_config();
        config.baseline.implementation = "sentencepiece".to_string();
        let run = RunConfig::resolve(&config, &Overrides::default()).unwrap();

        let err = build_providers(&run, Arc::new(FlatMemory)).err().unwrap();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unavailable_reference_falls_back_to_fixture() {
        let mut config = byte_level_config();
        config.reference.implementation = "sentencepiece".to_string();
        config.reference.fixture = Some(table());
        let run = RunConfig::resolve(&config, &Overrides::default()).unwrap();

        let providers = build_providers(&run, Arc::new(FlatMemory)).unwrap();
        let result = providers
            .reference
            .provide("abc", &MeasureParams::default())
            .unwrap();
        assert!(matches!(result.provenance, Provenance::Fixture { .. }));

        config.reference.fixture = None;
        let run = RunConfig::resolve(&config, &Overrides::default()).unwrap();
        assert!(build_providers(&run, Arc::new(FlatMemory)).is_err());
    }
}
