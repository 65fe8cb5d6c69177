//! Reference values the detectors are calibrated against.

use vigil_core::Measurement;
use vigil_core::stats::{ewm_std, ewma, histogram, linear_regression_lse, median, two_sample_ks};

const CALIBRATION: [f64; 10] = [0.1, 1.2, 2.3, 3.4, 4.5, 5.6, 6.7, 7.8, 8.9, 9.01];

#[test]
fn test_median_calibration() {
    assert_eq!(median(&CALIBRATION), 5.05);
}

#[test]
fn test_linear_regression_sign_convention() {
    // value = 3.1 * t - 2.1, so the intercept is negative
    let window: Vec<Measurement> = (0..10)
        .map(|i| Measurement::new(i, i as f64 * 3.1 - 2.1))
        .collect();
    let (alpha, beta) = linear_regression_lse(&window).unwrap();

    assert!((beta - 3.1).abs() < 1e-12, "beta = {}", beta);
    assert!((alpha - -2.1).abs() < 1e-12, "alpha = {}", alpha);
}

#[test]
fn test_ewma_calibration() {
    let expected = [
        0.09999999999999978,
        0.6554455445544544,
        1.214520977649978,
        1.7772255876832508,
        2.3435583786886025,
        2.9135180706168184,
        3.48710309969332,
        4.064311618855566,
        4.645141498269393,
        5.121538107701817,
    ];
    let actual: Vec<f64> = ewma(&CALIBRATION, 50.0)
        .into_iter()
        .map(|v| v.expect("calibration series is finite"))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_ewm_std_calibration() {
    let expected = [
        4.9526750297502914e-09,
        0.5527160659008843,
        0.902537317532201,
        1.2357653238068602,
        1.5629953497356235,
        1.8872927402148911,
        2.209889422762198,
        2.531374353771067,
        2.8520607676954124,
        3.0195071357543375,
    ];
    let actual: Vec<f64> = ewm_std(&CALIBRATION, 50.0)
        .into_iter()
        .map(|v| v.expect("calibration series is finite"))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_histogram_calibration() {
    let (counts, edges) = histogram(&CALIBRATION, 15);

    assert_eq!(counts, vec![1, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 1, 0, 2]);
    assert_eq!(
        edges,
        vec![
            0.1,
            0.694,
            1.288,
            1.8820000000000001,
            2.476,
            3.07,
            3.664,
            4.257999999999999,
            4.851999999999999,
            5.446,
            6.039999999999999,
            6.6339999999999995,
            7.228,
            7.821999999999999,
            8.415999999999999,
            9.01,
        ]
    );
}

#[test]
fn test_two_sample_ks_calibration() {
    let reference = [
        0.1, 1.2, 2.3, 3.4, 4.5, 5.6, 6.7, 7.8, 8.9, 9.01, 1.2, 2.0, 4.0, 6.0, 9.0, 1.0, 22.0, 11.0,
        19.0, 18.9, 11.0, 14.0,
    ];
    let probe = [
        0.4, 0.1, 1.3, 2.4, 6.5, 3.6, 5.7, 6.8, 8.9, 9.0, 9.1, 11.2, 1.2, 1.3, 14.0, 4.0, 5.0,
        0.123, 9.0, 7.0, 8.1, 9.9, 2.1,
    ];

    let stat = two_sample_ks(&reference, &probe).unwrap();

    assert_eq!(stat.d, 0.18577075098814222);
    // The p-value goes through exp/ln, which may differ in the last bit
    // between math libraries.
    assert!(
        (stat.p_value - 0.789955481957006).abs() < 1e-12,
        "p = {}",
        stat.p_value
    );
}
