//! Search time budgeting.

/// A soft and hard deadline, both in milliseconds from the start of the
/// search. The soft deadline is the normal stopping point; the hard
/// deadline is the point beyond which the search must not continue even to
/// finish extending the principal variation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeBudget {
    pub soft_ms: u64,
    pub hard_ms: u64,
}

/// Per-side clock state as reported by the UCI `go` command.
#[derive(Copy, Clone, Debug, Default)]
pub struct ClockInput {
    pub time_ms: u64,
    pub inc_ms: u64,
    pub moves_to_go: u32,
    pub move_time_ms: Option<u64>,
}

/// Computes how long to search given the side to move's remaining time,
/// increment, and moves-to-go.
pub fn compute_budget(input: ClockInput) -> TimeBudget {
    if let Some(mt) = input.move_time_ms {
        return TimeBudget { soft_ms: mt, hard_ms: mt };
    }

    let t = input.time_ms as i64;
    let inc = input.inc_ms as i64;
    let m = input.moves_to_go;

    let (soft, hard) = if m == 0 || m > 7 {
        if t <= 6 * inc {
            (t / 5, 2 * t / 5)
        } else {
            (t / 30 + inc, 2 * t / 30 + inc)
        }
    } else {
        let denom = 4 * m as i64;
        (t / denom, 2 * t / denom)
    };

    TimeBudget {
        soft_ms: soft.max(0) as u64,
        hard_ms: hard.max(0) as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_move_time_wins() {
        let b = compute_budget(ClockInput {
            time_ms: 100_000,
            inc_ms: 0,
            moves_to_go: 0,
            move_time_ms: Some(1500),
        });
        assert_eq!(b.soft_ms, 1500);
        assert_eq!(b.hard_ms, 1500);
    }

    #[test]
    fn sudden_death_uses_thirtieth_fraction() {
        let b = compute_budget(ClockInput {
            time_ms: 300_000,
            inc_ms: 0,
            moves_to_go: 0,
            move_time_ms: None,
        });
        assert_eq!(b.soft_ms, 10_000);
        assert_eq!(b.hard_ms, 20_000);
    }

    #[test]
    fn low_time_relative_to_increment_uses_fifth_fraction() {
        let b = compute_budget(ClockInput {
            time_ms: 1_000,
            inc_ms: 1_000,
            moves_to_go: 0,
            move_time_ms: None,
        });
        assert_eq!(b.soft_ms, 200);
        assert_eq!(b.hard_ms, 400);
    }

    #[test]
    fn moves_to_go_divides_by_four_times_moves() {
        let b = compute_budget(ClockInput {
            time_ms: 40_000,
            inc_ms: 0,
            moves_to_go: 10,
            move_time_ms: None,
        });
        assert_eq!(b.soft_ms, 1_000);
        assert_eq!(b.hard_ms, 2_000);
    }
}
