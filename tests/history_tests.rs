//! Property tests for the undo history and the effect list.

use proptest::prelude::*;

use mage_knight::core::{Error, GameRng, Result};
use mage_knight::effects::{Effect, EffectList};
use mage_knight::source::ManaSource;
use mage_knight::stack::{Command, TransactionStack};

#[derive(Clone, Debug)]
enum Op {
    Push(i32),
    Pop,
}

impl Command<Vec<i32>> for Op {
    fn execute(&self, target: &mut Vec<i32>) -> Result<()> {
        match self {
            Op::Push(value) => target.push(*value),
            Op::Pop => {
                target.pop().ok_or_else(|| Error::invalid("empty"))?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
enum Step {
    /// One macro pushing these values, aborted if `fail` is set.
    Action { values: Vec<i32>, fail: bool },
    Undo,
    Redo,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (prop::collection::vec(-50i32..50, 0..4), any::<bool>())
            .prop_map(|(values, fail)| Step::Action { values, fail }),
        1 => Just(Step::Undo),
        1 => Just(Step::Redo),
    ]
}

// =============================================================================
// Transaction Stack
// =============================================================================

proptest! {
    /// The target always equals the snapshot the history index points at.
    #[test]
    fn prop_history_matches_snapshots(steps in prop::collection::vec(step(), 0..40)) {
        let mut target: Vec<i32> = Vec::new();
        let mut stack: TransactionStack<Op> = TransactionStack::new();
        let mut snapshots = vec![Vec::new()];
        let mut index = 0;

        for step in steps {
            match step {
                Step::Action { values, fail } => {
                    stack.begin_macro();
                    for value in &values {
                        stack.push(&mut target, Op::Push(*value), Op::Pop).unwrap();
                    }
                    if fail {
                        stack.abort_macro(&mut target).unwrap();
                    } else {
                        stack.end_macro(true).unwrap();
                        if !values.is_empty() {
                            snapshots.truncate(index + 1);
                            snapshots.push(target.clone());
                            index += 1;
                        }
                    }
                }
                Step::Undo => {
                    let undone = stack.undo(&mut target).unwrap();
                    prop_assert_eq!(undone, index > 0);
                    index = index.saturating_sub(1);
                }
                Step::Redo => {
                    let redone = stack.redo(&mut target).unwrap();
                    prop_assert_eq!(redone, index + 1 < snapshots.len());
                    if redone {
                        index += 1;
                    }
                }
            }
            prop_assert_eq!(&target, &snapshots[index]);
            prop_assert_eq!(stack.index(), index);
        }
    }

    /// Jumping anywhere in the history restores that snapshot.
    #[test]
    fn prop_set_index(actions in prop::collection::vec(1i32..9, 1..12), jump in 0usize..12) {
        let mut target: Vec<i32> = Vec::new();
        let mut stack: TransactionStack<Op> = TransactionStack::new();
        for value in &actions {
            stack.push(&mut target, Op::Push(*value), Op::Pop).unwrap();
        }
        let jump = jump.min(actions.len());
        stack.set_index(&mut target, jump).unwrap();
        prop_assert_eq!(&target[..], &actions[..jump]);
        stack.set_index(&mut target, actions.len()).unwrap();
        prop_assert_eq!(target, actions);
    }
}

// =============================================================================
// Effect List
// =============================================================================

proptest! {
    /// Points of one kind merge into a single entry holding their sum.
    #[test]
    fn prop_points_merge(points in prop::collection::vec(1i32..6, 1..8)) {
        let mut list = EffectList::new();
        for p in &points {
            list.add(&Effect::movement(*p));
        }
        let total: i32 = points.iter().sum();
        prop_assert_eq!(list.len(), 1);
        prop_assert_eq!(list.move_points(), total);

        prop_assert!(list.remove(&Effect::movement(total + 1)).is_err());
        prop_assert_eq!(list.move_points(), total);
        list.remove(&Effect::movement(total)).unwrap();
        prop_assert!(list.is_empty());
    }

    /// Interleaved gains and payments keep one entry holding the running
    /// sum. A payment that is not covered leaves the list untouched.
    #[test]
    fn prop_add_remove_sequences(
        ops in prop::collection::vec(
            (any::<bool>(), prop_oneof![-6i32..0, 1i32..7]),
            1..30,
        )
    ) {
        let mut list = EffectList::new();
        let mut total = 0;
        for (gain, points) in ops {
            if gain {
                list.add(&Effect::influence(points));
                total += points;
            } else {
                let points = points.abs();
                let rest = total - points;
                let covered = total != 0 && (rest == 0 || rest >= total.min(0));
                let before = list.clone();
                match list.remove(&Effect::influence(points)) {
                    Ok(()) => {
                        prop_assert!(covered);
                        total = rest;
                    }
                    Err(err) => {
                        prop_assert!(!covered);
                        prop_assert!(matches!(err, Error::Insufficient { .. }), "expected Error::Insufficient");
                        prop_assert_eq!(&list, &before);
                    }
                }
            }
            prop_assert!(list.len() <= 1);
            prop_assert_eq!(list.len(), usize::from(total != 0));
            prop_assert_eq!(list.influence_points(), total);
        }
    }

    /// A planned edit and its inverse cancel out.
    #[test]
    fn prop_edit_inverse(moves in 0i32..5, influence in 1i32..5) {
        let mut list = EffectList::new();
        if moves > 0 {
            list.add(&Effect::movement(moves));
        }
        let before = list.clone();
        let edit = list.plan_add(&Effect::influence(influence));
        list.apply(&edit).unwrap();
        prop_assert_eq!(list.influence_points(), influence);
        list.apply(&edit.inverse()).unwrap();
        prop_assert_eq!(list, before);
    }
}

// =============================================================================
// Mana Source
// =============================================================================

proptest! {
    /// At least half of the dice show a basic colour, whatever the seed.
    #[test]
    fn prop_source_mostly_basic(seed in any::<u64>(), count in 1usize..12) {
        let mut rng = GameRng::new(seed);
        let mut source = ManaSource::new(count, &mut rng);
        for _ in 0..3 {
            let basic = source.dice().filter(|c| c.is_basic()).count();
            prop_assert_eq!(source.len(), count);
            prop_assert!(basic >= (count + 1) / 2);
            source.shuffle(&mut rng);
        }
    }
}
