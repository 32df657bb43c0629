//! Simulated frame loop: a panel is toggled on and off and each frame prints
//! what the host would draw.
//!
//! ```text
//! cargo run -p delayed-toggle -- '{"enter_delay_ms": 32, "exit_delay_ms": 120}'
//! ```

use tarry_core::*;
use tarry_ui::{delayed_phase, delayed_render, forget_delayed};
use web_time::Duration;

const FRAME: Duration = Duration::from_millis(16);
const FRAMES: u32 = 24;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(json) => DelayConfig::from_json(&json)?,
        None => DelayConfig::new()
            .enter_delay(Duration::from_millis(32))
            .exit_delay(Duration::from_millis(120)),
    };
    log::info!("config {}", config.to_json()?);

    let (timers, _clock) = TimerQueue::manual();

    // Redraw only when the input changed or a timer said so.
    let rev = signal(0u64);
    let propagation = Propagation::notify(Trigger::revision(&rev));
    let mut drawn_rev = u64::MAX;
    let mut last_active = None;

    for frame in 0..FRAMES {
        if frame > 0 {
            timers.advance(FRAME);
        }
        let active = (2..10).contains(&frame) || (14..16).contains(&frame);
        if last_active == Some(active) && drawn_rev == rev.get() {
            println!("{frame:>3}  {:<6} (idle)", active);
            continue;
        }
        last_active = Some(active);
        drawn_rev = rev.get();

        let (mounted, rendered) = compose(|| {
            with_scheduler(timers.clone(), || {
                delayed_render("panel", active, config, propagation.clone())
            })
        });
        let phase = delayed_phase("panel")
            .map(|p| format!("{p:?}"))
            .unwrap_or_default();
        println!("{frame:>3}  {active:<6} mounted={mounted:<5} rendered={rendered:<5} {phase}");
    }

    forget_delayed("panel");
    log::info!("done; {} timers left", timers.pending());
    Ok(())
}
