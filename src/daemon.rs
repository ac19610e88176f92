//! Async daemon loop: publishes frames, reports status and follows config changes

use std::error::Error;
use std::time::Duration;

use futures::future::OptionFuture;
use rgb_sync_core::{ColorFrame, DevicePool, Reconfigure, Rgb};
use tokio::runtime::Handle;
use tokio::task::block_in_place;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::Config;
use crate::detection::{DeviceKind, HidDiscovery};

fn frame_interval(fps: f32) -> Interval {
    let mut interval = interval(Duration::from_secs_f32(1.0 / fps.max(1.0).min(1000.0)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// `None` when the period is zero
fn optional_interval(period: Duration) -> Option<Interval> {
    (!period.is_zero()).then(|| {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    })
}

/// Run until ctrl-c, painting every device with the configured color
pub async fn run(mut config: Config, kind: DeviceKind) -> Result<(), Box<dyn Error>> {
    let mut discovery = HidDiscovery::new(kind, config.handshake_config())?;
    let mut pool = DevicePool::new(Handle::current(), config.pool_config());
    let started = block_in_place(|| pool.initialize(&mut discovery));
    if started == 0 {
        warn!("no devices found, waiting for config changes");
    }

    let mut color = config.general.fill_color()?;
    let mut frames = frame_interval(config.general.fps);
    let mut status = optional_interval(config.general.status_interval);
    let mut poll = optional_interval(config.general.config_poll);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
            _ = frames.tick() => {
                pool.publish(ColorFrame::filled(color));
            }
            Some(_) = OptionFuture::from(status.as_mut().map(|i| i.tick())) => {
                info!("{}", pool.details());
                if !pool.is_empty() {
                    info!("last update: {}", pool.performance());
                }
            }
            Some(_) = OptionFuture::from(poll.as_mut().map(|i| i.tick())) => {
                let next = match Config::load() {
                    Ok(next) => next,
                    Err(e) => {
                        warn!("failed to reload config: {e}");
                        continue;
                    }
                };
                if next == config {
                    continue;
                }
                info!("config changed");

                if let Ok(next_color) = next.general.fill_color() {
                    color = next_color;
                }
                if next.general.fps != config.general.fps {
                    frames = frame_interval(next.general.fps);
                }
                if next.general.status_interval != config.general.status_interval {
                    status = optional_interval(next.general.status_interval);
                }
                if next.general.config_poll != config.general.config_poll {
                    poll = optional_interval(next.general.config_poll);
                }
                discovery.set_handshake(next.handshake_config());

                match block_in_place(|| pool.apply_config(next.pool_config(), &mut discovery)) {
                    Reconfigure::Unchanged => {},
                    Reconfigure::Removed(n) => info!("removed {n} disabled device(s)"),
                    Reconfigure::Restarted(n) => info!("restarted with {n} device(s)"),
                }
                config = next;
            }
        }
    }

    block_in_place(|| pool.shutdown());
    Ok(())
}

/// Paint every device once, hold the color, then release them
pub async fn set(
    config: Config,
    kind: DeviceKind,
    color: Rgb,
    hold: Duration,
) -> Result<(), Box<dyn Error>> {
    let mut discovery = HidDiscovery::new(kind, config.handshake_config())?;
    let mut pool = DevicePool::new(Handle::current(), config.pool_config());
    if block_in_place(|| pool.initialize(&mut discovery)) == 0 {
        return Err("no devices found".into());
    }

    let frame = std::sync::Arc::new(ColorFrame::filled(color));
    pool.publish(frame.clone());
    tokio::time::sleep(hold).await;
    // a device may have failed while holding, report it before releasing
    pool.publish(frame);
    info!("{}", pool.details());

    block_in_place(|| pool.shutdown());
    Ok(())
}
