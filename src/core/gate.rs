/// Host policy deciding whether a tick may touch simulation state.
///
/// Ticking runs only while the viewport is visible and reduced motion has not
/// been requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityGate {
    pub visible: bool,
    pub reduced_motion: bool,
}

impl Default for ActivityGate {
    fn default() -> Self {
        Self {
            visible: true,
            reduced_motion: false,
        }
    }
}

impl ActivityGate {
    pub fn is_open(&self) -> bool {
        self.visible && !self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_only_when_visible_without_reduced_motion() {
        let cases = [
            (true, false, true),
            (false, false, false),
            (true, true, false),
            (false, true, false),
        ];
        for (visible, reduced_motion, open) in cases {
            let gate = ActivityGate {
                visible,
                reduced_motion,
            };
            assert_eq!(gate.is_open(), open);
        }
        assert!(ActivityGate::default().is_open());
    }
}
