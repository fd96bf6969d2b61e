/// Pointer and click input from the map surface, keyed by feature name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapEvent {
    PointerEnter(String),
    PointerLeave(String),
    FeatureClick(String),
    BackgroundClick,
}

/// Tells the binding layer whether the DOM event must stop propagating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The event set a selection; the map-level click handler must not see it.
    Consumed,
    Propagate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionPhase<'a> {
    Idle,
    Hovering(&'a str),
    Selected(&'a str),
    SelectedHovering { selected: &'a str, hovered: &'a str },
}

/// Owns the selection and hover state of the map.
///
/// The hovered feature is never the selected one: entering the selected
/// feature clears hover, and selecting the hovered feature absorbs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionController {
    selected: Option<String>,
    hovered: Option<String>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn phase(&self) -> InteractionPhase<'_> {
        match (self.selected.as_deref(), self.hovered.as_deref()) {
            (None, None) => InteractionPhase::Idle,
            (None, Some(hovered)) => InteractionPhase::Hovering(hovered),
            (Some(selected), None) => InteractionPhase::Selected(selected),
            (Some(selected), Some(hovered)) => {
                InteractionPhase::SelectedHovering { selected, hovered }
            }
        }
    }

    pub fn handle(&mut self, event: MapEvent) -> Disposition {
        match event {
            MapEvent::PointerEnter(name) => {
                self.hovered = if self.selected.as_deref() == Some(name.as_str()) {
                    None
                } else {
                    Some(name)
                };
                Disposition::Propagate
            }
            MapEvent::PointerLeave(name) => {
                if self.hovered.as_deref() == Some(name.as_str()) {
                    self.hovered = None;
                }
                Disposition::Propagate
            }
            MapEvent::FeatureClick(name) => {
                if self.hovered.as_deref() == Some(name.as_str()) {
                    self.hovered = None;
                }
                self.selected = Some(name);
                Disposition::Consumed
            }
            MapEvent::BackgroundClick => {
                self.selected = None;
                Disposition::Propagate
            }
        }
    }

    /// Resolve one physical click into exactly one of feature-click or
    /// background-click, based on what was under the pointer.
    pub fn dispatch_click(&mut self, hit: Option<&str>) -> Disposition {
        match hit {
            Some(name) => self.handle(MapEvent::FeatureClick(name.to_string())),
            None => self.handle(MapEvent::BackgroundClick),
        }
    }

    /// Select a feature from outside the map surface (inset panels).
    pub fn select(&mut self, name: &str) {
        self.handle(MapEvent::FeatureClick(name.to_string()));
    }

    pub fn reset(&mut self) {
        self.selected = None;
        self.hovered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enter(name: &str) -> MapEvent {
        MapEvent::PointerEnter(name.into())
    }

    fn leave(name: &str) -> MapEvent {
        MapEvent::PointerLeave(name.into())
    }

    fn click(name: &str) -> MapEvent {
        MapEvent::FeatureClick(name.into())
    }

    #[test]
    fn starts_idle() {
        assert_eq!(InteractionController::new().phase(), InteractionPhase::Idle);
    }

    #[test]
    fn hover_enter_and_leave() {
        let mut c = InteractionController::new();
        assert_eq!(c.handle(enter("Ohio")), Disposition::Propagate);
        assert_eq!(c.phase(), InteractionPhase::Hovering("Ohio"));
        c.handle(leave("Ohio"));
        assert_eq!(c.phase(), InteractionPhase::Idle);
    }

    #[test]
    fn stale_leave_does_not_clear_newer_hover() {
        let mut c = InteractionController::new();
        c.handle(enter("Ohio"));
        c.handle(enter("Indiana"));
        c.handle(leave("Ohio"));
        assert_eq!(c.hovered(), Some("Indiana"));
    }

    #[test]
    fn feature_click_selects_and_is_consumed() {
        let mut c = InteractionController::new();
        c.handle(enter("California"));
        assert_eq!(c.handle(click("California")), Disposition::Consumed);
        assert_eq!(c.phase(), InteractionPhase::Selected("California"));
    }

    #[test]
    fn selection_persists_across_hover_on_other_features() {
        let mut c = InteractionController::new();
        c.handle(click("California"));
        c.handle(enter("Nevada"));
        assert_eq!(
            c.phase(),
            InteractionPhase::SelectedHovering {
                selected: "California",
                hovered: "Nevada"
            }
        );
        c.handle(leave("Nevada"));
        c.handle(enter("Oregon"));
        c.handle(leave("Oregon"));
        assert_eq!(c.phase(), InteractionPhase::Selected("California"));
    }

    #[test]
    fn entering_selected_feature_does_not_hover_it() {
        let mut c = InteractionController::new();
        c.handle(click("California"));
        c.handle(enter("Nevada"));
        c.handle(enter("California"));
        assert_eq!(c.phase(), InteractionPhase::Selected("California"));
    }

    #[test]
    fn background_click_clears_selection() {
        let mut c = InteractionController::new();
        c.handle(click("California"));
        assert_eq!(c.handle(MapEvent::BackgroundClick), Disposition::Propagate);
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn dispatch_click_routes_exactly_one_transition() {
        let mut c = InteractionController::new();
        assert_eq!(c.dispatch_click(Some("Texas")), Disposition::Consumed);
        assert_eq!(c.selected(), Some("Texas"));
        assert_eq!(c.dispatch_click(None), Disposition::Propagate);
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn reselecting_moves_selection() {
        let mut c = InteractionController::new();
        c.select("Alaska");
        c.handle(click("Hawaii"));
        assert_eq!(c.selected(), Some("Hawaii"));
        c.reset();
        assert_eq!(c.phase(), InteractionPhase::Idle);
    }
}
