use crate::core_types::parcel::Timestamp;
use chrono::TimeDelta;

/// `count` timestamps starting at `start` and stepping back by `interval`
///
/// ```
/// use backtraj_core::simulation::backward_times;
/// use chrono::{TimeDelta, TimeZone, Utc};
///
/// let t0 = Utc.with_ymd_and_hms(2017, 8, 25, 18, 0, 0).unwrap();
/// let times = backward_times(t0, TimeDelta::hours(6), 3);
/// assert_eq!(times[2], Utc.with_ymd_and_hms(2017, 8, 25, 6, 0, 0).unwrap());
/// ```
#[must_use]
pub fn backward_times(start: Timestamp, interval: TimeDelta, count: usize) -> Vec<Timestamp> {
    std::iter::successors(Some(start), |t| t.checked_sub_signed(interval))
        .take(count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_sequence_runs_backward() {
        let t0 = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        let times = backward_times(t0, TimeDelta::hours(1), 4);
        assert_eq!(times.len(), 4);
        assert_eq!(times[0], t0);
        assert!(times.windows(2).all(|w| w[0] - w[1] == TimeDelta::hours(1)));
        assert_eq!(times[3], Utc.with_ymd_and_hms(2000, 12, 31, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_empty() {
        let t0 = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        assert!(backward_times(t0, TimeDelta::hours(1), 0).is_empty());
    }
}
