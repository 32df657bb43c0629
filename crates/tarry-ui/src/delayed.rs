use tarry_core::{
    DelayConfig, DelayedRender, Phase, Propagation, forget_key, peek_key, remember_with_key,
    scheduler,
};

fn slot_key(key: &str) -> String {
    format!("delayed:{key}")
}

/// Drive the keyed controller with `active`; returns `(mounted, rendered)` for this frame.
///
/// The controller is created on first use with the scheduler from
/// [`tarry_core::with_scheduler`] and lives until [`forget_delayed`].
/// `config` and `propagation` are re-applied every call; a new config only
/// affects timers scheduled afterwards.
pub fn delayed_render(
    key: impl Into<String>,
    active: bool,
    config: DelayConfig,
    propagation: Propagation,
) -> (bool, bool) {
    let key = slot_key(&key.into());
    let dr = remember_with_key(key, || {
        DelayedRender::with_propagation(scheduler(), active, config, propagation.clone())
    });
    dr.set_config(config);
    dr.set_propagation(propagation);
    dr.set_active(active);
    dr.read()
}

/// Current phase of a keyed controller, if one exists.
pub fn delayed_phase(key: &str) -> Option<Phase> {
    peek_key::<DelayedRender>(&slot_key(key)).map(|dr| dr.phase())
}

/// Drops the keyed controller, cancelling its timers.
pub fn forget_delayed(key: &str) -> bool {
    let existed = forget_key(&slot_key(key));
    if existed {
        log::debug!("delayed_render '{key}' forgotten");
    }
    existed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarry_core::{Signal, TimerQueue, Trigger, compose, signal, with_scheduler};
    use web_time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn cfg() -> DelayConfig {
        DelayConfig::new().enter_delay(ms(20)).exit_delay(ms(40))
    }

    #[test]
    fn silent_frames_follow_timers() {
        let (timers, _clock) = TimerQueue::manual();
        let mut lines = Vec::new();

        for frame in 0..8u32 {
            if frame > 0 {
                timers.advance(ms(16));
            }
            let active = (1..=3).contains(&frame);
            let out = compose(|| {
                with_scheduler(timers.clone(), || {
                    delayed_render("panel-silent", active, cfg(), Propagation::Silent)
                })
            });
            lines.push(format!("{frame} active={active} {out:?}"));
        }
        forget_delayed("panel-silent");

        insta::assert_snapshot!(lines.join("\n"), @r"
        0 active=false (false, false)
        1 active=true (true, false)
        2 active=true (true, false)
        3 active=true (true, true)
        4 active=false (true, false)
        5 active=false (true, false)
        6 active=false (true, false)
        7 active=false (false, false)
        ");
    }

    #[test]
    fn notify_wakes_an_idle_host() {
        let (timers, _clock) = TimerQueue::manual();
        let rev: Signal<u64> = signal(0);
        let propagation = Propagation::notify(Trigger::revision(&rev));

        let frame = |active: bool| {
            compose(|| {
                with_scheduler(timers.clone(), || {
                    delayed_render("panel-notify", active, cfg(), propagation.clone())
                })
            })
        };

        assert_eq!(frame(true), (true, false));
        // the host sleeps until the trigger bumps the revision
        timers.advance(ms(20));
        assert_eq!(rev.get(), 1);
        assert_eq!(frame(true), (true, true));

        assert_eq!(frame(false), (true, false));
        timers.advance(ms(40));
        assert_eq!(rev.get(), 2);
        assert_eq!(frame(false), (false, false));

        forget_delayed("panel-notify");
    }

    #[test]
    fn forget_cancels_pending_timers() {
        let (timers, _clock) = TimerQueue::manual();
        with_scheduler(timers.clone(), || {
            delayed_render("panel-forget", true, cfg(), Propagation::Silent)
        });
        assert_eq!(timers.pending(), 1);
        assert_eq!(delayed_phase("panel-forget"), Some(Phase::Entering));

        assert!(forget_delayed("panel-forget"));
        assert_eq!(timers.pending(), 0);
        assert!(!forget_delayed("panel-forget"));
        assert_eq!(delayed_phase("panel-forget"), None);
    }
}
