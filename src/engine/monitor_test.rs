use crate::engine::critical::{CriticalActionExecutor, CriticalStatus, TerminationOutcome};
use crate::engine::monitor::{Monitor, TickReport, TickSummary};
use crate::engine::tracker::TierStatus;
use crate::notify::Dispatcher;
use crate::shared::config::Settings;
use crate::test_helpers::factory::Factory;
use crate::test_helpers::factories::at_hours;
use crate::test_helpers::fakes::{FakeExecutor, FakeSampler, RecordingNotifier};

struct Rig {
    monitor: Monitor,
    notifier: RecordingNotifier,
}

fn rig(settings: Settings, sampler: FakeSampler, executor: Option<FakeExecutor>) -> Rig {
    crate::logging::init_for_tests();
    let config = settings.validate().unwrap();
    let notifier = RecordingNotifier::new();
    let dispatcher = Dispatcher::new(
        Box::new(notifier.clone()),
        config.recipients.clone(),
        "[mem]",
        "testhost",
    );
    let executor = executor.map(|e| Box::new(e) as Box<dyn CriticalActionExecutor>);
    let monitor = Monitor::new(&config, Box::new(sampler), dispatcher, executor).unwrap();
    Rig { monitor, notifier }
}

fn summary(report: TickReport) -> TickSummary {
    match report {
        TickReport::Evaluated(summary) => summary,
        TickReport::Skipped => panic!("tick was skipped"),
    }
}

#[tokio::test]
async fn test_two_tier_scenario_end_to_end() {
    let mut sampler = FakeSampler::new();
    for _ in 0..3 {
        sampler.push(Factory::sample().process(1, 55).create());
    }
    let mut rig = rig(Factory::settings().create(), sampler, None);

    let s0 = summary(rig.monitor.tick(at_hours(0.0)).await);
    assert_eq!(s0.warned_tier, Some(0));
    assert_eq!(s0.statuses[1], TierStatus::Waiting { remaining: crate::test_helpers::factories::hours(6.0) });

    let s1 = summary(rig.monitor.tick(at_hours(0.5)).await);
    assert_eq!(s1.warned_tier, None);
    assert_eq!(s1.statuses[0], TierStatus::Muted);

    let s2 = summary(rig.monitor.tick(at_hours(1.5)).await);
    assert_eq!(s2.warned_tier, Some(0));
    assert_eq!(
        rig.monitor.tracker().states()[0].last_warned_at,
        Some(at_hours(1.5))
    );

    let sent = rig.notifier.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|m| m.subject == "[mem] Memory Usage Warning: testhost"));
    assert!(sent.iter().all(|m| m.recipient == "ops@example.com"));
}

#[tokio::test]
async fn test_failed_sample_leaves_state_untouched() {
    let mut sampler = FakeSampler::new();
    sampler.push(Factory::sample().process(1, 30).create());
    sampler.push_failure();
    sampler.push(Factory::sample().process(1, 30).create());
    let mut rig = rig(Factory::settings().create(), sampler, None);

    summary(rig.monitor.tick(at_hours(0.0)).await);
    let before = rig.monitor.tracker().states().to_vec();
    let critical_before = *rig.monitor.critical_state();

    assert_eq!(rig.monitor.tick(at_hours(3.0)).await, TickReport::Skipped);
    assert_eq!(rig.monitor.tracker().states(), before.as_slice());
    assert_eq!(*rig.monitor.critical_state(), critical_before);

    // the 6h clock kept running through the failed tick
    let s = summary(rig.monitor.tick(at_hours(6.0)).await);
    assert_eq!(s.warned_tier, Some(1));
}

#[tokio::test]
async fn test_zero_total_memory_is_skipped() {
    let mut sampler = FakeSampler::new();
    sampler.push(Factory::sample().total(0).process(1, 30).create());
    let settings = Factory::settings()
        .with(|s| s.memory.total_bytes = None)
        .create();
    let mut rig = rig(settings, sampler, None);
    assert_eq!(rig.monitor.tick(at_hours(0.0)).await, TickReport::Skipped);
    assert!(rig.monitor.tracker().states().iter().all(|s| s.exceeded_since.is_none()));
}

#[tokio::test]
async fn test_failed_delivery_counts_against_cap() {
    let mut sampler = FakeSampler::new();
    sampler.push(Factory::sample().process(1, 60).create());
    sampler.push(Factory::sample().process(1, 60).create());
    let mut rig = rig(Factory::settings().create(), sampler, None);
    rig.notifier.fail_for("ops@example.com");

    let s0 = summary(rig.monitor.tick(at_hours(0.0)).await);
    let delivery = s0.warning_delivery.unwrap();
    assert!(!delivery.delivered());
    assert_eq!(
        rig.monitor.tracker().states()[0].last_warned_at,
        Some(at_hours(0.0))
    );

    let s1 = summary(rig.monitor.tick(at_hours(0.5)).await);
    assert_eq!(s1.warned_tier, None);
    assert_eq!(rig.notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_idle_exclusion_changes_fired_tier() {
    let build = || {
        let mut sampler = FakeSampler::new();
        sampler.push(
            Factory::sample()
                .process(1, 50)
                .idle_process(2, 30)
                .create(),
        );
        sampler
    };
    let settings = |exclude| {
        Factory::settings()
            .tiers(&[(0.6, 0.0), (0.2, 0.0)])
            .exclude_idle(exclude)
            .create()
    };

    let mut raw = rig(settings(false), build(), None);
    let s = summary(raw.monitor.tick(at_hours(0.0)).await);
    assert!((s.usage_fraction - 0.8).abs() < 1e-9);
    assert_eq!(s.warned_tier, Some(0));

    let mut excluded = rig(settings(true), build(), None);
    let s = summary(excluded.monitor.tick(at_hours(0.0)).await);
    assert!((s.usage_fraction - 0.5).abs() < 1e-9);
    assert_eq!(s.warned_tier, Some(1));
}

#[tokio::test]
async fn test_critical_warning_without_termination() {
    let mut sampler = FakeSampler::new();
    sampler.push(Factory::sample().used(95).process(1, 10).create());
    let executor = FakeExecutor::new();
    let mut rig = rig(Factory::settings().create(), sampler, Some(executor.clone()));

    let s = summary(rig.monitor.tick(at_hours(0.0)).await);
    assert_eq!(s.critical.status, CriticalStatus::Firing { terminate: false });
    assert_eq!(s.termination, Some(TerminationOutcome::NotAttempted));
    assert_eq!(executor.calls(), 0);

    let sent = rig.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "[mem] System Memory Critical");
}

#[tokio::test]
async fn test_critical_termination_runs_once_per_cap() {
    let mut sampler = FakeSampler::new();
    for _ in 0..2 {
        sampler.push(
            Factory::sample()
                .used(97)
                .process(1, 10)
                .process(2, 40)
                .create(),
        );
    }
    let executor = FakeExecutor::new();
    let settings = Factory::settings().terminate(true, Some(0.95)).create();
    let mut rig = rig(settings, sampler, Some(executor.clone()));

    let s0 = summary(rig.monitor.tick(at_hours(0.0)).await);
    match s0.termination {
        Some(TerminationOutcome::Terminated(victim)) => assert_eq!(victim.pid, 2),
        other => panic!("unexpected termination outcome {other:?}"),
    }
    assert_eq!(executor.calls(), 1);
    assert_eq!(executor.calls.lock().unwrap()[0].len(), 2);
    assert!(
        rig.notifier
            .sent()
            .iter()
            .any(|m| m.subject == "[mem] System Memory Critical (Terminated 2)")
    );

    let s1 = summary(rig.monitor.tick(at_hours(0.5)).await);
    assert_eq!(s1.critical.status, CriticalStatus::Muted);
    assert_eq!(executor.calls(), 1);
}

#[tokio::test]
async fn test_failed_critical_action_still_advances_cap() {
    let mut sampler = FakeSampler::new();
    for _ in 0..2 {
        sampler.push(Factory::sample().used(97).process(1, 10).create());
    }
    let executor = FakeExecutor::failing();
    let settings = Factory::settings().terminate(true, None).create();
    let mut rig = rig(settings, sampler, Some(executor.clone()));

    let s0 = summary(rig.monitor.tick(at_hours(0.0)).await);
    assert!(matches!(s0.termination, Some(TerminationOutcome::Failed(_))));
    assert_eq!(
        rig.monitor.critical_state().last_action_at,
        Some(at_hours(0.0))
    );

    summary(rig.monitor.tick(at_hours(0.1)).await);
    assert_eq!(executor.calls(), 1);
}

#[tokio::test]
async fn test_process_and_critical_warnings_are_independent() {
    let mut sampler = FakeSampler::new();
    sampler.push(Factory::sample().used(95).process(1, 60).create());
    let mut rig = rig(Factory::settings().create(), sampler, None);

    let s = summary(rig.monitor.tick(at_hours(0.0)).await);
    assert_eq!(s.warned_tier, Some(0));
    assert!(s.critical.fires());
    assert_eq!(rig.notifier.sent().len(), 2);
}
