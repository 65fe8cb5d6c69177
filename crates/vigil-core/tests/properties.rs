use proptest::prelude::*;

use vigil_core::algo::median_absolute_deviation;
use vigil_core::stats::{covariance, variance};
use vigil_core::trigger::{TriggerHistory, is_anomalously_anomalous};
use vigil_core::{Algorithm, EvalContext, Measurement, TriggerRecord};

proptest! {
    #[test]
    fn covariance_with_itself_is_variance(xs in prop::collection::vec(-1e6f64..1e6, 1..200)) {
        let cov = covariance(&xs, &xs);
        prop_assert!(cov >= 0.0);
        prop_assert_eq!(cov, variance(&xs));
    }

    #[test]
    fn mad_never_flags_constant_windows(value in -1e9f64..1e9, len in 1usize..500) {
        let values = vec![value; len];
        prop_assert!(!median_absolute_deviation(&values));
    }

    #[test]
    fn detectors_survive_arbitrary_windows(
        values in prop::collection::vec(prop::num::f64::ANY, 0..80),
        now in 0i64..2_000_000_000,
    ) {
        let window: Vec<Measurement> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Measurement::new(now - 4_000 + i as i64 * 50, v))
            .collect();
        let ctx = EvalContext::at(now, 86_400);
        for algorithm in Algorithm::ALL {
            let _ = algorithm.run(&window, &ctx);
        }
    }

    #[test]
    fn repeated_values_within_five_minutes_are_stored_once(
        steps in prop::collection::vec((0i64..=300, prop::bool::ANY), 1..50),
    ) {
        let mut history = TriggerHistory::new();
        let mut timestamp = 1_000_000;
        let mut value = 1.0;

        let first = is_anomalously_anomalous(history, TriggerRecord::new(timestamp, value));
        prop_assert!(first.significant);
        history = first.history;

        for (gap, change) in steps {
            timestamp += gap;
            if change {
                value += 1.0;
            }
            history = is_anomalously_anomalous(history, TriggerRecord::new(timestamp, value)).history;
        }

        for pair in history.records().windows(2) {
            let same_value = pair[0].value == pair[1].value;
            prop_assert!(!(same_value && pair[1].timestamp - pair[0].timestamp <= 300));
        }
    }
}
