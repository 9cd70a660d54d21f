//! Classifier purity: identical inputs always yield identical verdicts.

use std::path::PathBuf;

use envsweep_core::config::SweepConfig;
use envsweep_core::environment::{EnvironmentKind, HealthStatus};
use envsweep_core::health;
use envsweep_core::metadata::EnvironmentFacts;
use envsweep_core::python::PythonVersion;
use proptest::prelude::*;

fn arb_kind() -> impl Strategy<Value = EnvironmentKind> {
    prop_oneof![
        Just(EnvironmentKind::Venv),
        Just(EnvironmentKind::Virtualenv),
        Just(EnvironmentKind::Conda),
        Just(EnvironmentKind::System),
    ]
}

proptest! {
    #[test]
    fn classify_is_pure(
        kind in arb_kind(),
        has_interpreter in any::<bool>(),
        has_version in any::<bool>(),
        structurally_broken in any::<bool>(),
        days in 0u64..2000,
        count in 0u64..100,
        threshold in 0.0f64..=1.0,
        baseline_minor in prop::option::of(4u8..14),
    ) {
        let mut facts = EnvironmentFacts {
            interpreter: has_interpreter.then(|| PathBuf::from("/env/bin/python")),
            python_version: has_version.then(|| PythonVersion::new(3, 9, Some(7))),
            ..EnvironmentFacts::default()
        };
        facts.structurally_broken = structurally_broken;

        let mut config = SweepConfig::default();
        config.cleanup_confidence_threshold = threshold;
        config.python_baseline = baseline_minor.map(|minor| PythonVersion::new(3, minor, None));

        let first = health::classify(kind, &facts, days, count, &config);
        let second = health::classify(kind, &facts, days, count, &config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn missing_version_is_always_broken(days in 0u64..2000, count in 0u64..100) {
        let facts = EnvironmentFacts {
            interpreter: Some(PathBuf::from("/env/bin/python")),
            ..EnvironmentFacts::default()
        };
        let config = SweepConfig::default();
        let verdict = health::classify(EnvironmentKind::Venv, &facts, days, count, &config);
        prop_assert_eq!(verdict, HealthStatus::Broken);
    }

    #[test]
    fn healthy_envs_stay_healthy_when_recently_used(count in 0u64..100) {
        let facts = EnvironmentFacts {
            interpreter: Some(PathBuf::from("/env/bin/python")),
            python_version: Some(PythonVersion::new(3, 12, Some(1))),
            ..EnvironmentFacts::default()
        };
        let config = SweepConfig::default();
        let verdict = health::classify(EnvironmentKind::Venv, &facts, 0, count, &config);
        prop_assert_eq!(verdict, HealthStatus::Healthy);
    }
}
