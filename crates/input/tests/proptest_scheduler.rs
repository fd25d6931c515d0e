//! Property tests for frame scheduler registration and removal

use proptest::prelude::*;
use vrdock_input::FrameScheduler;

proptest! {
    /// Property: removed handles never run again and survivors keep
    /// registration order
    #[test]
    fn unregister_removes_only_matching_handle(
        count in 1usize..16,
        removals in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) {
        let mut scheduler: FrameScheduler<Vec<usize>> = FrameScheduler::new();
        let handles: Vec<_> = (0..count)
            .map(|i| scheduler.register(move |log: &mut Vec<usize>| log.push(i)))
            .collect();

        let mut removed = vec![false; count];
        for index in removals {
            let slot = index.index(count);
            let was_present = !removed[slot];
            prop_assert_eq!(scheduler.unregister(handles[slot]), was_present);
            removed[slot] = true;
        }

        let mut log = Vec::new();
        scheduler.run_all(&mut log);
        scheduler.run_all(&mut log);

        let survivors: Vec<usize> = (0..count).filter(|i| !removed[*i]).collect();
        let expected: Vec<usize> = survivors.iter().chain(survivors.iter()).copied().collect();
        prop_assert_eq!(log, expected);
    }
}
