//! Property tests for session counters, break selection and badges.

use chrono::{Duration, TimeZone, Utc};
use focusbuddy_core::{BadgeRecord, Event, Level, SessionMachine, Settings};
use proptest::prelude::*;

fn settings(focus: u64, short: u64, long: u64, every: u32) -> Settings {
    Settings {
        focus_duration: focus,
        short_break_duration: short,
        long_break_duration: long,
        sessions_before_long_break: every,
        blocked_sites: Vec::new(),
    }
}

proptest! {
    #[test]
    fn focus_completion_bumps_both_counters_by_one(
        focus in 1u64..20,
        short in 1u64..10,
        long in 10u64..20,
        every in 1u32..6,
        cycles in 1usize..12,
    ) {
        let s = settings(focus, short, long, every);
        let mut now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let mut machine = SessionMachine::new(&s, now);

        for cycle in 1..=cycles {
            machine.start(now);
            let mut ended = None;
            while ended.is_none() {
                now += Duration::seconds(1);
                ended = machine.tick(&s, now);
            }
            match ended {
                Some(Event::FocusCompleted { total_sessions, session_count, break_seconds, .. }) => {
                    prop_assert_eq!(total_sessions, cycle as u64);
                    prop_assert_eq!(session_count, cycle as u64);
                    let expected = if cycle as u64 % u64::from(every) == 0 { long } else { short };
                    prop_assert_eq!(break_seconds, expected);
                }
                other => prop_assert!(false, "expected focus completion, got {:?}", other),
            }

            machine.start(now);
            let mut ended = None;
            while ended.is_none() {
                now += Duration::seconds(1);
                ended = machine.tick(&s, now);
            }
            prop_assert!(
                matches!(ended, Some(Event::BreakCompleted { .. })),
                "expected break completion"
            );
            prop_assert_eq!(machine.state().total_sessions, cycle as u64);
            prop_assert!(!machine.is_running());
        }
    }

    #[test]
    fn restore_never_fires_more_than_one_phase_end(
        remaining in 1u64..100,
        gap in 0i64..100_000,
        running in any::<bool>(),
    ) {
        let s = settings(remaining, 5, 15, 4);
        let start = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let mut machine = SessionMachine::new(&s, start);
        if running {
            machine.start(start);
        }
        let events = machine.restore(&s, start + Duration::seconds(gap));
        let ends = events
            .iter()
            .filter(|e| matches!(e, Event::FocusCompleted { .. } | Event::BreakCompleted { .. }))
            .count();
        prop_assert!(ends <= 1);
        prop_assert!(machine.state().total_sessions <= 1);
        if !running {
            prop_assert_eq!(ends, 0);
            prop_assert_eq!(machine.remaining_seconds(), remaining);
        }
    }

    #[test]
    fn achievements_are_never_lost(totals in proptest::collection::vec(0u64..200, 1..20)) {
        let mut badges = BadgeRecord::default();
        let mut seen: Vec<String> = Vec::new();
        for total in totals {
            let unlocked = badges.apply_total(total);
            for a in &unlocked {
                prop_assert!(!seen.contains(&a.name().to_string()), "unlocked twice: {}", a);
            }
            for old in &seen {
                prop_assert!(badges.achievements.contains(old));
            }
            seen = badges.achievements.clone();
            prop_assert_eq!(badges.level, Level::for_sessions(total));
        }
    }
}
