//! Ultimate timing: how long a player takes to build an ultimate and how
//! long they hold it once charged.

use serde::Serialize;
use tracing::debug;

use crate::error::AnalyticsError;
use crate::models::{RoundEnd, UltimateEvent};
use crate::stream::{round_for, EventStream};

/// Both timing figures for one player on one map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UltimateTiming {
    pub player_name: String,

    /// `None` when the player never charged an ultimate
    pub average_charge_time: Option<f64>,

    pub average_hold_time: f64,
    pub charges: usize,
}

/// Mean time to build an ultimate.
///
/// The first interval is the first charge's match time. Each later interval
/// runs from the i-th `ultimate_end` to the next charge; ends are paired with
/// charges by position, not by ultimate id. Negative intervals (a charge
/// logged before the matching end across a round boundary) are discarded,
/// and pairing stops once ends run out.
pub fn average_charge_time(
    charges: &[&UltimateEvent],
    ends: &[&UltimateEvent],
) -> Result<f64, AnalyticsError> {
    let first = charges
        .first()
        .ok_or_else(|| AnalyticsError::insufficient("average ultimate charge time"))?;

    let mut intervals = vec![first.match_time];
    for (i, next) in charges.iter().enumerate().skip(1) {
        let Some(end) = ends.get(i - 1) else {
            debug!(
                "Ran out of ultimate ends after {} of {} charges",
                i,
                charges.len()
            );
            break;
        };
        let gap = next.match_time - end.match_time;
        if gap >= 0.0 {
            intervals.push(gap);
        }
    }

    Ok(intervals.iter().sum::<f64>() / intervals.len() as f64)
}

/// Mean delay between charging an ultimate and starting it.
///
/// Every charge and start is assigned a round (see [`round_for`]). Within a
/// round each charge pairs with the earliest start at or after it. No pairs
/// yields `0.0`.
pub fn average_hold_time(
    charges: &[&UltimateEvent],
    starts: &[&UltimateEvent],
    rounds: &[&RoundEnd],
) -> f64 {
    let start_rounds: Vec<(Option<i64>, f64)> = starts
        .iter()
        .map(|s| (round_for(rounds, s.match_time), s.match_time))
        .collect();

    let holds: Vec<f64> = charges
        .iter()
        .filter_map(|charge| {
            let round = round_for(rounds, charge.match_time);
            start_rounds
                .iter()
                .filter(|(r, t)| *r == round && *t >= charge.match_time)
                .map(|(_, t)| *t)
                .min_by(f64::total_cmp)
                .map(|start| start - charge.match_time)
        })
        .collect();

    if holds.is_empty() {
        return 0.0;
    }
    holds.iter().sum::<f64>() / holds.len() as f64
}

/// Both timing figures for `player`, read from the map's events.
pub fn ultimate_timing(stream: &EventStream, player: &str) -> UltimateTiming {
    let charges = stream.ultimate_charges(player);
    let starts = stream.ultimate_starts(player);
    let ends = stream.ultimate_ends(player);
    let rounds = stream.rounds();

    let average_charge_time = match average_charge_time(&charges, &ends) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("{} on {}: {}", player, stream.map_id(), e);
            None
        }
    };

    UltimateTiming {
        player_name: player.to_string(),
        average_charge_time,
        average_hold_time: average_hold_time(&charges, &starts, &rounds),
        charges: charges.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventKind, TypedEvent};
    use crate::stream::fixtures::{round_end, round_start, stream, ultimate};

    fn ult(time: f64) -> UltimateEvent {
        match ultimate(EventKind::UltimateCharged, time, "Sparky") {
            TypedEvent::UltimateCharged(u) => u,
            _ => unreachable!(),
        }
    }

    fn refs(events: &[UltimateEvent]) -> Vec<&UltimateEvent> {
        events.iter().collect()
    }

    fn round(time: f64, number: i64) -> RoundEnd {
        match round_end(time, number) {
            TypedEvent::RoundEnd(r) => r,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_charge_time_pairs_by_index() {
        let charges = vec![ult(60.0), ult(130.0), ult(220.0)];
        let ends = vec![ult(70.0), ult(140.0)];
        // 60, 130 - 70, 220 - 140
        let avg = average_charge_time(&refs(&charges), &refs(&ends)).unwrap();
        assert!((avg - (60.0 + 60.0 + 80.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_charge_time_discards_negative_gaps() {
        let charges = vec![ult(50.0), ult(90.0)];
        let ends = vec![ult(100.0)];
        let avg = average_charge_time(&refs(&charges), &refs(&ends)).unwrap();
        assert_eq!(avg, 50.0);
    }

    #[test]
    fn test_charge_time_stops_when_ends_run_out() {
        let charges = vec![ult(40.0), ult(100.0), ult(150.0)];
        let ends = vec![ult(50.0)];
        let avg = average_charge_time(&refs(&charges), &refs(&ends)).unwrap();
        assert_eq!(avg, 45.0);
    }

    #[test]
    fn test_charge_time_without_charges_is_insufficient() {
        let err = average_charge_time(&[], &[]).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData { .. }));
    }

    #[test]
    fn test_hold_time_pairs_within_round() {
        let rounds = vec![round(100.0, 1), round(200.0, 2)];
        let charges = vec![ult(10.0), ult(90.0), ult(150.0)];
        // Starts are not consumed: both round one charges pair with 95.
        let starts = vec![ult(95.0), ult(160.0)];
        let avg = average_hold_time(&refs(&charges), &refs(&starts), &refs_round(&rounds));
        assert!((avg - (85.0 + 5.0 + 10.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_hold_time_does_not_cross_rounds() {
        let rounds = vec![round(100.0, 1), round(200.0, 2)];
        let charges = vec![ult(90.0)];
        let starts = vec![ult(120.0)];
        let avg = average_hold_time(&refs(&charges), &refs(&starts), &refs_round(&rounds));
        assert_eq!(avg, 0.0);
    }

    #[test]
    fn test_hold_time_after_last_round_uses_last_round() {
        let rounds = vec![round(100.0, 1)];
        let charges = vec![ult(110.0)];
        let starts = vec![ult(118.0)];
        let avg = average_hold_time(&refs(&charges), &refs(&starts), &refs_round(&rounds));
        assert_eq!(avg, 8.0);
    }

    #[test]
    fn test_hold_time_without_pairs_is_zero() {
        assert_eq!(average_hold_time(&[], &[], &[]), 0.0);
    }

    #[test]
    fn test_ultimate_timing_from_stream() {
        let s = stream(vec![
            round_start(0.0, 1),
            ultimate(EventKind::UltimateCharged, 60.0, "Sparky"),
            ultimate(EventKind::UltimateStart, 64.0, "Sparky"),
            ultimate(EventKind::UltimateEnd, 70.0, "Sparky"),
            ultimate(EventKind::UltimateCharged, 130.0, "Sparky"),
            ultimate(EventKind::UltimateStart, 132.0, "Sparky"),
            ultimate(EventKind::UltimateEnd, 138.0, "Sparky"),
            round_end(200.0, 1),
        ]);

        let timing = ultimate_timing(&s, "Sparky");
        assert_eq!(timing.charges, 2);
        assert_eq!(timing.average_charge_time, Some(60.0));
        assert_eq!(timing.average_hold_time, 3.0);

        let nobody = ultimate_timing(&s, "Nobody");
        assert_eq!(nobody.average_charge_time, None);
        assert_eq!(nobody.average_hold_time, 0.0);
    }

    fn refs_round(rounds: &[RoundEnd]) -> Vec<&RoundEnd> {
        rounds.iter().collect()
    }
}
