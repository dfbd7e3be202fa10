//! Output (monitor) and display-mode selection.

/// What mode selection needs to know about one output.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OutputInfo {
    pub position: (i32, i32),
    pub is_primary: bool,
}

/// Picks the output to go fullscreen on: the primary one if the platform
/// marks one, otherwise the leftmost, with topmost breaking ties.
pub(crate) fn pick_output(outputs: &[OutputInfo]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, output) in outputs.iter().enumerate() {
        if output.is_primary {
            return Some(index);
        }
        let better = match best {
            None => true,
            Some(current) => {
                let (bx, by) = outputs[current].position;
                let (x, y) = output.position;
                x < bx || (x == bx && y < by)
            }
        };
        if better {
            best = Some(index);
        }
    }
    best
}

/// A candidate display mode: size plus refresh rate in millihertz.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ModeCandidate {
    pub width: u32,
    pub height: u32,
    pub refresh_mhz: u32,
}

/// Picks the highest-refresh mode exactly matching the wanted size.
pub(crate) fn best_mode(modes: &[ModeCandidate], want: (u32, u32)) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, mode) in modes.iter().enumerate() {
        if (mode.width, mode.height) != want {
            continue;
        }
        match best {
            Some(current) if modes[current].refresh_mhz >= mode.refresh_mhz => {}
            _ => best = Some(index),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_output_wins_regardless_of_position() {
        let outputs = [
            OutputInfo {
                position: (-1920, 0),
                is_primary: false,
            },
            OutputInfo {
                position: (0, 0),
                is_primary: true,
            },
        ];
        assert_eq!(pick_output(&outputs), Some(1));
    }

    #[test]
    fn without_a_primary_the_leftmost_topmost_wins() {
        let outputs = [
            OutputInfo {
                position: (0, 0),
                is_primary: false,
            },
            OutputInfo {
                position: (-1920, 200),
                is_primary: false,
            },
            OutputInfo {
                position: (-1920, 0),
                is_primary: false,
            },
        ];
        assert_eq!(pick_output(&outputs), Some(2));
    }

    #[test]
    fn no_outputs_no_pick() {
        assert_eq!(pick_output(&[]), None);
    }

    #[test]
    fn best_mode_prefers_highest_refresh_at_exact_size() {
        let modes = [
            ModeCandidate {
                width: 1920,
                height: 1080,
                refresh_mhz: 60_000,
            },
            ModeCandidate {
                width: 1920,
                height: 1080,
                refresh_mhz: 144_000,
            },
            ModeCandidate {
                width: 1280,
                height: 720,
                refresh_mhz: 240_000,
            },
        ];
        assert_eq!(best_mode(&modes, (1920, 1080)), Some(1));
        assert_eq!(best_mode(&modes, (1280, 720)), Some(2));
        assert_eq!(best_mode(&modes, (640, 480)), None);
    }
}
