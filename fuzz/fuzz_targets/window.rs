#![no_main]
use libfuzzer_sys::fuzz_target;
use roster_board::{
    schedule::{ActiveEntry, ScheduleEntry},
    time::Moment,
};

fuzz_target!(|data: (Vec<ScheduleEntry>, Moment)| {
    #[cfg(feature = "log")]
    let _ = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Trace)
        .chain(std::io::stdout())
        .apply();

    let (schedule, moment) = data;
    let active = schedule.iter().active_at(moment);

    match active {
        Some(entry) => {
            assert_eq!(entry.day, moment.day, "Matched an entry on another day");
            assert!(
                entry.start <= moment.time && moment.time <= entry.end,
                "Matched {:?} outside of its window at {}",
                entry,
                moment
            );

            let first = schedule
                .iter()
                .position(|e| e.is_active_at(moment))
                .expect("an active entry exists");
            assert!(
                std::ptr::eq(entry, &schedule[first]),
                "Returned entry is not the first match"
            );
        }
        None => assert!(
            schedule.iter().all(|e| !e.is_active_at(moment)),
            "Missed an entry active at {}",
            moment
        ),
    }

    assert_eq!(
        active,
        schedule.iter().active_at(moment),
        "Matching is not deterministic"
    );
});
