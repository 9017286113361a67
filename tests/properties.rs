//! Property tests for sequential delay evaluation.

use proptest::prelude::*;
use sequential_delay::{
    BatchSize, Repetitions, SequentialDelayDomainState, SequentialDelayResult,
    SequentialDelayStage, evaluate,
};

fn stage_strategy() -> impl Strategy<Value = SequentialDelayStage> {
    (
        0u64..500,
        prop::option::of(any::<bool>()),
        prop::option::of(1u64..5),
        prop::option::of(1u64..5),
    )
        .prop_map(|(delay, reset_timer, batch_size, repetitions)| SequentialDelayStage {
            delay,
            reset_timer,
            batch_size: batch_size.map(|b| BatchSize::try_from(b).unwrap()),
            repetitions: repetitions.map(|r| Repetitions::try_from(r).unwrap()),
        })
}

fn stages_strategy() -> impl Strategy<Value = Vec<SequentialDelayStage>> {
    prop::collection::vec(stage_strategy(), 0..6)
}

fn state_strategy() -> impl Strategy<Value = SequentialDelayDomainState> {
    (0u64..10_000, 0u64..40, any::<bool>(), 0u64..10_000).prop_map(
        |(timer, counter, disabled, now)| SequentialDelayDomainState {
            timer,
            counter,
            disabled,
            now,
        },
    )
}

fn quota(stages: &[SequentialDelayStage]) -> u64 {
    stages.iter().map(|s| s.attempts()).sum()
}

proptest! {
    #[test]
    fn evaluation_is_deterministic(
        stages in stages_strategy(),
        state in state_strategy(),
        attempt_time in 0u64..20_000,
    ) {
        prop_assert_eq!(
            evaluate(&stages, attempt_time, Some(state)),
            evaluate(&stages, attempt_time, Some(state))
        );
    }

    #[test]
    fn disabled_domains_are_always_rejected(
        stages in stages_strategy(),
        mut state in state_strategy(),
        attempt_time in any::<u64>(),
    ) {
        state.disabled = true;

        let r = evaluate(&stages, attempt_time, Some(state));
        prop_assert_eq!(
            r,
            SequentialDelayResult::Rejected {
                state: SequentialDelayDomainState { now: attempt_time, ..state },
                not_before: None,
            }
        );
    }

    #[test]
    fn rejection_changes_only_now(
        stages in stages_strategy(),
        state in state_strategy(),
        attempt_time in 0u64..20_000,
    ) {
        if let SequentialDelayResult::Rejected { state: next, not_before } =
            evaluate(&stages, attempt_time, Some(state))
        {
            prop_assert_eq!(next, SequentialDelayDomainState { now: attempt_time, ..state });
            if let Some(not_before) = not_before {
                prop_assert!(attempt_time < not_before);
            }
        }
    }

    #[test]
    fn acceptance_advances_counter_by_one(
        stages in stages_strategy(),
        state in state_strategy(),
        attempt_time in 0u64..20_000,
    ) {
        if let SequentialDelayResult::Accepted { state: next } =
            evaluate(&stages, attempt_time, Some(state))
        {
            prop_assert_eq!(next.counter, state.counter + 1);
            prop_assert_eq!(next.disabled, state.disabled);
            prop_assert_eq!(next.now, attempt_time);
            prop_assert!(next.timer <= attempt_time);
            prop_assert!(next.timer >= state.timer);
        }
    }

    #[test]
    fn counter_never_decreases(
        stages in stages_strategy(),
        steps in prop::collection::vec(0u64..300, 1..60),
    ) {
        let mut state = SequentialDelayDomainState::default();
        let mut now = 0u64;

        for step in steps {
            now += step;
            let next = evaluate(&stages, now, Some(state)).into_state();
            prop_assert!(next.counter >= state.counter);
            state = next;
        }
    }

    #[test]
    fn exhausted_domains_reject_without_hint(
        stages in stages_strategy(),
        extra in 0u64..10,
        timer in any::<u64>(),
        attempt_time in any::<u64>(),
    ) {
        let state = SequentialDelayDomainState {
            timer,
            counter: quota(&stages) + extra,
            disabled: false,
            now: 0,
        };

        let r = evaluate(&stages, attempt_time, Some(state));
        prop_assert!(!r.is_accepted());
        prop_assert_eq!(r.not_before(), None);
    }

    #[test]
    fn quota_is_consumed_exactly_when_attempts_are_patient(stages in stages_strategy()) {
        // Attempting at every not_before admits the whole schedule, then nothing more.
        let total = quota(&stages);
        let mut state = SequentialDelayDomainState::default();
        let mut now = 0u64;

        for _ in 0..total {
            let r = evaluate(&stages, now, Some(state));
            let r = match r.not_before() {
                Some(not_before) => {
                    now = not_before;
                    evaluate(&stages, now, Some(r.into_state()))
                }
                None => r,
            };
            prop_assert!(r.is_accepted());
            state = r.into_state();
        }

        prop_assert_eq!(state.counter, total);
        prop_assert_eq!(evaluate(&stages, u64::MAX, Some(state)).not_before(), None);
    }

    #[test]
    fn batches_charge_one_delay(
        delay in 1u64..1_000,
        batch_size in 1u64..8,
        timer in 0u64..10_000,
    ) {
        let stages = vec![
            SequentialDelayStage::new(delay)
                .with_batch_size(BatchSize::try_from(batch_size).unwrap()),
        ];
        let mut state = SequentialDelayDomainState { timer, ..Default::default() };

        let early = evaluate(&stages, timer + delay - 1, Some(state));
        prop_assert_eq!(early.not_before(), Some(timer + delay));

        let admitted_at = timer + delay;
        for _ in 0..batch_size {
            let r = evaluate(&stages, admitted_at, Some(state));
            prop_assert!(r.is_accepted());
            state = r.into_state();
        }
    }

    #[test]
    fn fixed_timer_admits_on_a_grid(
        delay in 1u64..1_000,
        repetitions in 1u64..10,
        lateness in prop::collection::vec(0u64..1_000, 10),
    ) {
        let stages = vec![
            SequentialDelayStage::new(delay)
                .with_repetitions(Repetitions::try_from(repetitions).unwrap())
                .with_reset_timer(false),
        ];
        let mut state = SequentialDelayDomainState::default();
        let mut attempt_time = 0u64;

        for (i, late) in lateness.iter().take(repetitions as usize).enumerate() {
            let deadline = (i as u64 + 1) * delay;
            attempt_time = attempt_time.max(deadline) + late;
            let r = evaluate(&stages, attempt_time, Some(state));
            prop_assert!(r.is_accepted());
            prop_assert_eq!(r.state().timer, deadline);
            state = r.into_state();
        }
    }

    #[test]
    fn reset_timer_follows_admissions(
        delay in 1u64..1_000,
        lateness in prop::collection::vec(0u64..1_000, 1..10),
    ) {
        let stages = vec![
            SequentialDelayStage::new(delay)
                .with_repetitions(Repetitions::try_from(lateness.len() as u64).unwrap()),
        ];
        let mut state = SequentialDelayDomainState::default();

        for late in lateness {
            let attempt_time = state.timer + delay + late;
            let r = evaluate(&stages, attempt_time, Some(state));
            prop_assert!(r.is_accepted());
            prop_assert_eq!(r.state().timer, attempt_time);
            state = r.into_state();
        }
    }
}
