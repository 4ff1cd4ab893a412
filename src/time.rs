use hifitime::{Epoch, TimeScale, Unit};

use crate::constants::MJD;

/// J2000.0 expressed as a barycentric MJD
const J2000_MJD_TDB: MJD = 51544.5;

/// Transformation from an epoch to a barycentric modified julian date (MJD, TDB)
///
/// Argument
/// --------
/// * `epoch`: an epoch in any time scale
///
/// Return
/// ------
/// * the epoch expressed in MJD in the TDB time scale
pub fn epoch_to_mjd_tdb(epoch: &Epoch) -> MJD {
    let reference = mjd_tdb_to_epoch(J2000_MJD_TDB);
    let elapsed = epoch.to_time_scale(TimeScale::TDB) - reference;
    J2000_MJD_TDB + elapsed.to_unit(Unit::Day)
}

/// Transformation from a sequence of epochs to barycentric MJD (TDB)
///
/// Argument
/// --------
/// * `epochs`: a slice of epochs
///
/// Return
/// ------
/// * a vector of MJD (TDB), in the same order
pub fn epochs_to_mjd_tdb(epochs: &[Epoch]) -> Vec<MJD> {
    epochs.iter().map(epoch_to_mjd_tdb).collect()
}

/// Transformation from a barycentric modified julian date (MJD, TDB) to an epoch
pub fn mjd_tdb_to_epoch(mjd: MJD) -> Epoch {
    Epoch::from_mjd_in_time_scale(mjd, TimeScale::TDB)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_epoch_to_mjd_tdb() {
        let epoch = Epoch::from_gregorian(2009, 6, 18, 0, 0, 0, 0, TimeScale::TDB);
        assert_abs_diff_eq!(epoch_to_mjd_tdb(&epoch), 55000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_utc_epoch_is_shifted_to_tdb() {
        // TT − UTC = 34 leap seconds + 32.184 s in 2009; TDB − TT stays below 2 ms
        let epoch = Epoch::from_gregorian_utc_at_midnight(2009, 6, 18);
        let mjd = epochs_to_mjd_tdb(&[epoch]);
        assert_eq!(mjd.len(), 1);
        assert_abs_diff_eq!(mjd[0] - 55000.0, 66.184 / 86400.0, epsilon = 1e-7);
    }

    #[test]
    fn test_mjd_tdb_to_epoch() {
        let epoch = mjd_tdb_to_epoch(55000.25);
        assert_eq!(epoch.time_scale, TimeScale::TDB);
        assert_abs_diff_eq!(epoch_to_mjd_tdb(&epoch), 55000.25, epsilon = 1e-9);
    }

    #[test]
    fn test_mjd_tdb_round_trip() {
        for mjd in [40000.0, 51544.5, 55000.123456, 60310.999] {
            let back = epoch_to_mjd_tdb(&mjd_tdb_to_epoch(mjd));
            assert_abs_diff_eq!(back, mjd, epsilon = 1e-9);
        }

        // the same instant in TT converts to the same TDB date
        let tdb = mjd_tdb_to_epoch(55000.25);
        let tt = tdb.to_time_scale(TimeScale::TT);
        assert_abs_diff_eq!(epoch_to_mjd_tdb(&tt), 55000.25, epsilon = 1e-9);
    }
}
