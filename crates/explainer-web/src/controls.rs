// Pure transport helpers shared by the DOM layer and host-side tests.
// Keep this file free of web_sys so it can be `include!`d on the host.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Replay,
    Seek(usize),
}

/// Space toggles, `r` replays, digits `1`..=`scene_count` jump to a scene.
#[inline]
pub fn command_for_key(key: &str, scene_count: usize) -> Option<Command> {
    match key {
        " " | "Spacebar" => Some(Command::TogglePause),
        "r" | "R" => Some(Command::Replay),
        _ => {
            let mut chars = key.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return None;
            };
            let digit = c.to_digit(10)? as usize;
            (1..=scene_count)
                .contains(&digit)
                .then(|| Command::Seek(digit - 1))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DotState {
    Past,
    Current,
    Future,
}

impl DotState {
    pub fn as_str(self) -> &'static str {
        match self {
            DotState::Past => "past",
            DotState::Current => "current",
            DotState::Future => "future",
        }
    }
}

#[inline]
pub fn dot_state(index: usize, current: usize) -> DotState {
    match index.cmp(&current) {
        std::cmp::Ordering::Less => DotState::Past,
        std::cmp::Ordering::Equal => DotState::Current,
        std::cmp::Ordering::Greater => DotState::Future,
    }
}

/// Markers sit on the boundaries before scenes 2..=N; marker `k` belongs to scene `k + 1`.
#[inline]
pub fn marker_reached(marker: usize, current: usize) -> bool {
    current > marker
}

#[inline]
pub fn progress_width_css(progress: f64) -> String {
    format!("width: {:.2}%", progress.clamp(0.0, 1.0) * 100.0)
}

#[inline]
pub fn bool_attr(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
