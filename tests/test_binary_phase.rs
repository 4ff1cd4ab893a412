use approx::assert_relative_eq;
use binphase::{
    binary_phases, constants::DPI, time::mjd_tdb_to_epoch, BinPhaseError, BinaryPhaseEngine,
    EngineConfig, ParFile, PeriastronModel, PeriodModel,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

mod common;
use common::{assert_phases_close, load_fixture, phase_distance};

#[test]
fn test_circular_orbit_quarter_phases() {
    let par = ParFile::from_values([("PB", 1.0), ("T0", 55000.0), ("OM", 90.0), ("ECC", 0.0)]);
    let phases = binary_phases(&par, &[55000.0, 55000.25, 55000.5, 55000.75]).unwrap();
    assert_phases_close(&phases, &[0.25, 0.5, 0.75, 0.0], 1e-12);
}

#[test]
fn test_frequency_series_matches_period() {
    let fb_par = ParFile::from_values([
        ("FB0", 1.0 / 86400.0),
        ("TASC", 55000.0),
        ("EPS1", 0.0),
        ("EPS2", 0.0),
    ]);
    let pb_par = ParFile::from_values([("PB", 1.0), ("T0", 55000.0), ("ECC", 0.0)]);

    let mut rng = StdRng::seed_from_u64(42);
    let mjds: Vec<f64> = (0..200)
        .map(|_| rng.random_range(54000.0..56000.0))
        .collect();

    let fb_phases = binary_phases(&fb_par, &mjds).unwrap();
    let pb_phases = binary_phases(&pb_par, &mjds).unwrap();
    assert_phases_close(&fb_phases, &pb_phases, 1e-9);
}

#[test]
fn test_ell1_fixture_phases() {
    let par = load_fixture("ell1_fb.par");
    let engine = BinaryPhaseEngine::new(&par).unwrap();

    assert!(matches!(
        engine.orbit().period,
        PeriodModel::FrequencySeries { ref fb } if fb.len() == 2
    ));
    assert!(matches!(engine.orbit().periastron, PeriastronModel::Ell1 { .. }));
    assert_eq!(engine.orbit().model_name.as_deref(), Some("ELL1"));

    // the ascending node sits at phase 0
    let pb = DPI / engine.orbit().orbital_frequency();
    let tasc = 55000.1;
    let phases = engine
        .phases(&[tasc, tasc + 0.25 * pb, tasc + 0.5 * pb, tasc + 0.75 * pb])
        .unwrap();
    assert_phases_close(&phases, &[0.0, 0.25, 0.5, 0.75], 1e-5);
}

#[test]
fn test_standard_fixture_phases() {
    let par = load_fixture("dd_standard.par");
    let engine = BinaryPhaseEngine::new(&par).unwrap();

    match engine.orbit().period {
        PeriodModel::ConstantPeriod { pb, pbdot } => {
            assert_relative_eq!(pb, 0.322997448918);
            assert_relative_eq!(pbdot, -2.423e-12, max_relative = 1e-12);
        }
        ref other => panic!("unexpected period model {other:?}"),
    }

    // at periastron U = 0, the phase is the argument of periastron
    let at_t0 = engine.phase_at(52144.90097844).unwrap();
    assert!(phase_distance(at_t0, 292.5445 / 360.0) < 1e-9);

    let mjds: Vec<f64> = (0..1000).map(|i| 52000.5 + i as f64 * 0.7371).collect();
    let phases = engine.phases(&mjds).unwrap();
    assert_eq!(phases.len(), mjds.len());
    assert!(phases.iter().all(|p| (0.0..1.0).contains(p)));

    let states = engine.orbital_states(&mjds).unwrap();
    for (state, phase) in states.iter().zip(&phases) {
        assert_eq!(state.phase, *phase);
    }
    assert!(states.windows(2).all(|w| w[0].orbit_number <= w[1].orbit_number));
}

#[test]
fn test_phases_at_tdb_epochs() {
    let par = load_fixture("dd_standard.par");
    let engine = BinaryPhaseEngine::new(&par).unwrap();

    let mjds = [52500.125, 52600.5, 52700.875];
    let epochs: Vec<_> = mjds.iter().map(|&mjd| mjd_tdb_to_epoch(mjd)).collect();

    let from_epochs = engine.phases_at_epochs(&epochs).unwrap();
    let from_mjds = engine.phases(&mjds).unwrap();
    assert_phases_close(&from_epochs, &from_mjds, 1e-6);
}

#[test]
fn test_ambiguous_fixture() {
    let par = load_fixture("ambiguous.par");

    let err = BinaryPhaseEngine::new(&par).unwrap_err();
    assert!(matches!(err, BinPhaseError::AmbiguousModel(_)));

    let lenient = EngineConfig::default().with_reject_ambiguous_models(false);
    let engine = BinaryPhaseEngine::with_config(&par, lenient).unwrap();
    assert!(matches!(
        engine.orbit().period,
        PeriodModel::ConstantPeriod { pb, .. } if pb == 1.5
    ));
    assert_phases_close(&engine.phases(&[55000.375]).unwrap(), &[0.25], 1e-12);
}

#[test]
fn test_isolated_pulsar_has_no_orbit() {
    let par = load_fixture("isolated.par");
    assert!(matches!(
        BinaryPhaseEngine::new(&par),
        Err(BinPhaseError::MissingParameter(_))
    ));
}

#[test]
fn test_empty_time_series() {
    let par = load_fixture("dd_standard.par");
    let engine = BinaryPhaseEngine::new(&par).unwrap();
    assert!(engine.phases(&[]).unwrap().is_empty());
}
