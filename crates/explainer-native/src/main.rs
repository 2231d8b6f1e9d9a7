//! Headless driver: plays the explainer on a virtual clock, logs the
//! timeline, and optionally snapshots each scene as SVG.

use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use explainer_core::constants::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use explainer_core::{
    DrawList, ManualClock, SceneId, Stage, StageConfig, Surface, TickOutcome, Viewport,
};

mod svg;

#[derive(Parser, Debug)]
#[command(name = "explainer", version, about = "Run the explainer timeline headlessly")]
struct Args {
    /// Seed for every engine; omit for a fresh layout each run.
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated animation frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    #[arg(long, default_value_t = DEFAULT_VIEWPORT_WIDTH)]
    width: f32,

    #[arg(long, default_value_t = DEFAULT_VIEWPORT_HEIGHT)]
    height: f32,

    /// Directory for `scene-{index}.svg` snapshots taken halfway through each scene.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pause once this much of the timeline has played.
    #[arg(long)]
    pause_at_ms: Option<f64>,

    /// How long the pause lasts in virtual wall-clock time.
    #[arg(long, default_value_t = 2000.0)]
    pause_for_ms: f64,
}

/// Zero-based like the scene canvases, so `scene-3.svg` is the Decision scene.
fn snapshot_file_name(scene_index: usize) -> String {
    format!("scene-{}.svg", scene_index)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if args.fps == 0 {
        anyhow::bail!("--fps must be at least 1");
    }

    let viewport = Viewport::new(args.width, args.height);
    if !viewport.is_drawable() {
        anyhow::bail!("viewport {}x{} has no area", args.width, args.height);
    }
    if let Some(dir) = &args.out {
        fs::create_dir_all(dir).with_context(|| format!("create '{}'", dir.display()))?;
    }

    let config = StageConfig {
        seed: args.seed,
        ..StageConfig::default()
    };
    let timeline = config.timeline.clone();
    let clock = ManualClock::new(0.0);
    let mut stage = Stage::new(config, clock.clone())?;
    stage.resize(viewport);

    let mut ambient = DrawList::new(viewport.size());
    let mut scenes: Vec<DrawList> = SceneId::ALL
        .iter()
        .map(|_| DrawList::new(viewport.size()))
        .collect();
    let mut captured = vec![false; scenes.len()];

    let frame_ms = 1000.0 / args.fps as f64;
    let tick_ms = timeline.tick_interval_ms as f64;
    // generous upper bound so a stuck timeline cannot spin forever
    let deadline_ms = timeline.total_duration_ms() + args.pause_for_ms.max(0.0) + 10_000.0;

    let mut now = 0.0;
    let mut next_tick = tick_ms;
    let mut resume_at: Option<f64> = None;
    let mut pause_done = args.pause_at_ms.is_none();

    while now <= deadline_ms {
        clock.set(now);

        while next_tick <= now {
            if stage.tick() == TickOutcome::Completed {
                log::info!(
                    "completed at {:.0} ms wall time, progress {:.1}%",
                    now,
                    stage.playback().progress() * 100.0
                );
            }
            next_tick += tick_ms;
        }

        if let (false, Some(at)) = (pause_done, args.pause_at_ms) {
            if resume_at.is_none() && stage.playback().elapsed_ms() >= at {
                stage.toggle_pause();
                resume_at = Some(now + args.pause_for_ms);
                log::info!("paused at {:.0} ms played", stage.playback().elapsed_ms());
            }
        }
        if let Some(at) = resume_at {
            if now >= at {
                stage.toggle_pause();
                resume_at = None;
                pause_done = true;
                log::info!("resumed at {:.0} ms played", stage.playback().elapsed_ms());
            }
        }

        stage.frame_ambient(Some(&mut ambient as &mut dyn Surface));
        let current = stage.playback().current_scene();
        for (i, list) in scenes.iter_mut().enumerate() {
            stage.frame_scene(i, Some(list as &mut dyn Surface));
        }

        if let Some(dir) = &args.out {
            let into_scene =
                stage.playback().elapsed_ms() - current as f64 * timeline.scene_duration_ms;
            if !captured[current] && into_scene >= timeline.scene_duration_ms * 0.5 {
                captured[current] = true;
                let mut doc = svg::SvgDocument::new(viewport.size());
                doc.push_layer(ambient.commands());
                doc.push_layer(scenes[current].commands());
                let path = dir.join(snapshot_file_name(current));
                fs::write(&path, doc.finish())
                    .with_context(|| format!("write '{}'", path.display()))?;
                log::info!("wrote {}", path.display());
            }
        }

        if stage.playback().is_complete() {
            break;
        }
        now += frame_ms;
    }

    for scene in SceneId::ALL {
        if let Some(sim) = stage.scene(scene.index()) {
            log::info!(
                "{:<16} {:<18} {:>5} frames",
                scene.label(),
                sim.name(),
                sim.frames()
            );
        }
    }
    if !stage.playback().is_complete() {
        log::warn!("timeline did not complete before {:.0} ms", deadline_ms);
    }
    stage.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_names_use_the_scene_index() {
        assert_eq!(snapshot_file_name(0), "scene-0.svg");
        assert_eq!(snapshot_file_name(SceneId::Decision.index()), "scene-3.svg");
        assert_eq!(snapshot_file_name(SceneId::Cta.index()), "scene-4.svg");
    }
}
