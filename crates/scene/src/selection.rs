//! Click-selection state machine for the route graph.
//!
//! Selection is persisted by an external selection manager; local state
//! must not change until that manager acknowledges a request. Every click
//! therefore splits into an issued [`SelectionCommand`] and a deferred
//! mutation applied when the matching [`SelectionReply`] arrives.
//!
//! Requests are serialized: one command is in flight at a time and later
//! clicks queue in arrival order. A `Failed` reply drops only that click's
//! deferred mutation.
//!
//! Propagation depths are asymmetric and pinned by tests:
//! - Arc click: the clicked arc toggles, its two endpoint markers take the
//!   arc's new state, then each sibling arc on those markers takes the
//!   marker's state. Propagation stops there.
//! - Marker click: the marker toggles, every connected arc takes the
//!   marker's new state, then each of those arcs' other markers takes the
//!   arc's state.

use std::collections::VecDeque;

use crate::graph::{DrawableId, RouteMapDataView, SelectionId};

/// Identifies one selection-manager round trip.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

/// A click event as resolved by the host's hit dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub target: ClickTarget,
    pub multi_select: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    Arc(String),
    Marker(String),
    Background,
}

/// Request to the external selection manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCommand {
    Select {
        token: RequestToken,
        ids: Vec<SelectionId>,
        multi_select: bool,
    },
    Clear {
        token: RequestToken,
    },
}

impl SelectionCommand {
    pub fn token(&self) -> RequestToken {
        match self {
            SelectionCommand::Select { token, .. } => *token,
            SelectionCommand::Clear { token } => *token,
        }
    }
}

/// Reply from the external selection manager.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectionReply {
    Acknowledged(RequestToken),
    Failed(RequestToken),
}

/// Visual restyle for one drawable, applied by the host surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StyleChange {
    pub drawable: DrawableId,
    pub selected: bool,
}

/// Result of feeding a reply into the machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplyOutcome {
    pub styles: Vec<StyleChange>,
    /// Next queued command to forward to the selection manager, if any.
    pub command: Option<SelectionCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Arc { key: String, multi_select: bool },
    Marker { key: String, multi_select: bool },
    ClearAll,
}

#[derive(Debug)]
pub struct SelectionMachine {
    first_click_of_gesture: bool,
    next_token: u64,
    in_flight: Option<(RequestToken, Pending)>,
    queue: VecDeque<Click>,
}

impl Default for SelectionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self {
            first_click_of_gesture: true,
            next_token: 0,
            in_flight: None,
            queue: VecDeque::new(),
        }
    }

    pub fn first_click_of_gesture(&self) -> bool {
        self.first_click_of_gesture
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none() && self.queue.is_empty()
    }

    /// Feeds a click. Returns the command to forward to the selection
    /// manager, or `None` when the click is ignored or queued behind an
    /// in-flight request.
    pub fn on_click(&mut self, view: &RouteMapDataView, click: Click) -> Option<SelectionCommand> {
        if self.in_flight.is_some() {
            self.queue.push_back(click);
            return None;
        }
        self.begin(view, click)
    }

    /// Feeds the selection manager's reply for the in-flight request.
    ///
    /// `Acknowledged` applies the deferred mutation; `Failed` drops it. In
    /// both cases the next queued click (if any) is promoted and its
    /// command returned for forwarding.
    pub fn on_reply(&mut self, view: &mut RouteMapDataView, reply: SelectionReply) -> ReplyOutcome {
        let Some((token, pending)) = self.in_flight.take() else {
            return ReplyOutcome::default();
        };

        let mut outcome = ReplyOutcome::default();
        match reply {
            SelectionReply::Acknowledged(t) if t == token => {
                outcome.styles = self.apply(view, pending);
            }
            SelectionReply::Failed(t) if t == token => {}
            _ => {
                // Reply for some other token: keep waiting.
                self.in_flight = Some((token, pending));
                return outcome;
            }
        }

        while let Some(click) = self.queue.pop_front() {
            if let Some(command) = self.begin(view, click) {
                outcome.command = Some(command);
                break;
            }
        }
        outcome
    }

    fn begin(&mut self, view: &RouteMapDataView, click: Click) -> Option<SelectionCommand> {
        let Click {
            target,
            multi_select,
        } = click;
        match target {
            ClickTarget::Arc(key) => {
                let arc = view.arcs.get(&key)?;
                if arc.selected && !multi_select {
                    return None;
                }
                let ids = vec![arc.selection_id];
                let token = self.issue(Pending::Arc { key, multi_select });
                Some(SelectionCommand::Select {
                    token,
                    ids,
                    multi_select,
                })
            }
            ClickTarget::Marker(key) => {
                let marker = view.markers.get(&key)?;
                if marker.selected && !multi_select {
                    return None;
                }
                // A selected marker re-requests only its selected arcs; an
                // unselected one requests all of them.
                let ids: Vec<SelectionId> = marker
                    .arcs
                    .iter()
                    .filter_map(|arc_key| view.arcs.get(arc_key))
                    .filter(|arc| !marker.selected || arc.selected)
                    .map(|arc| arc.selection_id)
                    .collect();
                let token = self.issue(Pending::Marker { key, multi_select });
                Some(SelectionCommand::Select {
                    token,
                    ids,
                    multi_select,
                })
            }
            ClickTarget::Background => {
                if multi_select || !view.has_selection() {
                    return None;
                }
                let token = self.issue(Pending::ClearAll);
                Some(SelectionCommand::Clear { token })
            }
        }
    }

    fn issue(&mut self, pending: Pending) -> RequestToken {
        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.in_flight = Some((token, pending));
        token
    }

    fn apply(&mut self, view: &mut RouteMapDataView, pending: Pending) -> Vec<StyleChange> {
        match pending {
            Pending::Arc { key, multi_select } => self.apply_arc(view, &key, multi_select),
            Pending::Marker { key, multi_select } => self.apply_marker(view, &key, multi_select),
            Pending::ClearAll => self.apply_clear(view),
        }
    }

    fn apply_arc(&mut self, view: &mut RouteMapDataView, key: &str, multi_select: bool) -> Vec<StyleChange> {
        let mut styles = Vec::new();
        let Some(arc) = view.arcs.get(key) else {
            // The snapshot was rebuilt while the request was in flight.
            return styles;
        };
        let endpoints: Vec<String> = arc.markers.clone();

        if self.first_click_of_gesture || !multi_select {
            deselect_arcs_except(view, &mut styles, |k| k == key);
            deselect_markers_except(view, &mut styles, |k| endpoints.iter().any(|e| e == k));
            self.first_click_of_gesture = false;
        }

        let Some(arc) = view.arcs.get_mut(key) else {
            return styles;
        };
        arc.selected = !arc.selected;
        let arc_selected = arc.selected;
        styles.push(StyleChange {
            drawable: arc.curve,
            selected: arc_selected,
        });
        styles.push(StyleChange {
            drawable: arc.icon,
            selected: arc_selected,
        });

        // Endpoint markers take the clicked arc's new state; siblings on
        // those markers then take the marker's state. No further hop.
        for marker_key in &endpoints {
            let Some(marker) = view.markers.get_mut(marker_key) else {
                continue;
            };
            if marker.selected != arc_selected {
                marker.selected = arc_selected;
                styles.push(StyleChange {
                    drawable: marker.point,
                    selected: arc_selected,
                });
            }
            let marker_selected = marker.selected;
            let siblings: Vec<String> = marker
                .arcs
                .iter()
                .filter(|k| k.as_str() != key)
                .cloned()
                .collect();
            for sibling_key in siblings {
                let Some(sibling) = view.arcs.get_mut(&sibling_key) else {
                    continue;
                };
                if sibling.selected != marker_selected {
                    sibling.selected = marker_selected;
                    styles.push(StyleChange {
                        drawable: sibling.curve,
                        selected: marker_selected,
                    });
                    styles.push(StyleChange {
                        drawable: sibling.icon,
                        selected: marker_selected,
                    });
                }
            }
        }
        styles
    }

    fn apply_marker(&mut self, view: &mut RouteMapDataView, key: &str, multi_select: bool) -> Vec<StyleChange> {
        let mut styles = Vec::new();
        let Some(marker) = view.markers.get(key) else {
            return styles;
        };
        let touching: Vec<String> = marker.arcs.clone();

        if self.first_click_of_gesture || !multi_select {
            deselect_markers_except(view, &mut styles, |k| k == key);
            deselect_arcs_except(view, &mut styles, |k| touching.iter().any(|t| t == k));
            self.first_click_of_gesture = false;
        }

        let Some(marker) = view.markers.get_mut(key) else {
            return styles;
        };
        marker.selected = !marker.selected;
        let marker_selected = marker.selected;
        styles.push(StyleChange {
            drawable: marker.point,
            selected: marker_selected,
        });

        // Connected arcs take the marker's new state, and each updated
        // arc's other markers follow one hop further.
        for arc_key in touching {
            let Some(arc) = view.arcs.get_mut(&arc_key) else {
                continue;
            };
            if arc.selected == marker_selected {
                continue;
            }
            arc.selected = marker_selected;
            styles.push(StyleChange {
                drawable: arc.curve,
                selected: marker_selected,
            });
            styles.push(StyleChange {
                drawable: arc.icon,
                selected: marker_selected,
            });
            let other_markers: Vec<String> = arc
                .markers
                .iter()
                .filter(|k| k.as_str() != key)
                .cloned()
                .collect();
            for other_key in other_markers {
                let Some(other) = view.markers.get_mut(&other_key) else {
                    continue;
                };
                if other.selected != marker_selected {
                    other.selected = marker_selected;
                    styles.push(StyleChange {
                        drawable: other.point,
                        selected: marker_selected,
                    });
                }
            }
        }
        styles
    }

    fn apply_clear(&mut self, view: &mut RouteMapDataView) -> Vec<StyleChange> {
        let mut styles = Vec::new();
        for arc in view.arcs.values_mut() {
            arc.selected = false;
            styles.push(StyleChange {
                drawable: arc.curve,
                selected: false,
            });
            styles.push(StyleChange {
                drawable: arc.icon,
                selected: false,
            });
        }
        for marker in view.markers.values_mut() {
            marker.selected = false;
            styles.push(StyleChange {
                drawable: marker.point,
                selected: false,
            });
        }
        self.first_click_of_gesture = true;
        styles
    }
}

fn deselect_arcs_except<F>(view: &mut RouteMapDataView, styles: &mut Vec<StyleChange>, keep: F)
where
    F: Fn(&str) -> bool,
{
    for arc in view.arcs.values_mut() {
        if keep(&arc.market) || !arc.selected {
            continue;
        }
        arc.selected = false;
        styles.push(StyleChange {
            drawable: arc.curve,
            selected: false,
        });
        styles.push(StyleChange {
            drawable: arc.icon,
            selected: false,
        });
    }
}

fn deselect_markers_except<F>(view: &mut RouteMapDataView, styles: &mut Vec<StyleChange>, keep: F)
where
    F: Fn(&str) -> bool,
{
    let keys: Vec<String> = view.markers.keys().cloned().collect();
    for key in keys {
        if keep(&key) {
            continue;
        }
        let Some(marker) = view.markers.get_mut(&key) else {
            continue;
        };
        if marker.selected {
            marker.selected = false;
            styles.push(StyleChange {
                drawable: marker.point,
                selected: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Click, ClickTarget, SelectionCommand, SelectionMachine, SelectionReply,
    };
    use crate::graph::{
        DrawableId, RenderLayerId, RouteMapArc, RouteMapDataView, RouteMapMarker, SelectionId,
    };
    use foundation::math::LatLng;

    fn add_arc(view: &mut RouteMapDataView, market: &str, row: u32, from: &str, to: &str) {
        let base = (view.arcs.len() as u64 + 1) * 100;
        view.arcs.insert(
            market.into(),
            RouteMapArc {
                market: market.into(),
                curve: DrawableId(base),
                icon: DrawableId(base + 1),
                markers: vec![from.into(), to.into()],
                tooltip: Vec::new(),
                selected: false,
                selection_id: SelectionId(row),
            },
        );
        for code in [from, to] {
            let point = DrawableId(1_000 + view.markers.len() as u64);
            let marker = view
                .markers
                .entry(code.into())
                .or_insert_with(|| RouteMapMarker {
                    code: code.into(),
                    shifted: false,
                    position: LatLng::new(0.0, 0.0),
                    point,
                    arcs: Vec::new(),
                    selected: false,
                });
            if !marker.arcs.iter().any(|k| k == market) {
                marker.arcs.push(market.into());
            }
        }
    }

    // A: M1-M2, B: M1-M3 (shares M1 with A), C: M4-M5 (unrelated).
    fn sample_view() -> RouteMapDataView {
        let mut view = RouteMapDataView::new(RenderLayerId(0), RenderLayerId(1));
        add_arc(&mut view, "A", 0, "M1", "M2");
        add_arc(&mut view, "B", 1, "M1", "M3");
        add_arc(&mut view, "C", 2, "M4", "M5");
        assert!(view.is_closed());
        view
    }

    fn click(target: ClickTarget, multi_select: bool) -> Click {
        Click {
            target,
            multi_select,
        }
    }

    fn roundtrip(
        machine: &mut SelectionMachine,
        view: &mut RouteMapDataView,
        target: ClickTarget,
        multi_select: bool,
    ) -> Option<SelectionCommand> {
        let command = machine.on_click(view, click(target, multi_select))?;
        let outcome = machine.on_reply(view, SelectionReply::Acknowledged(command.token()));
        assert!(outcome.command.is_none(), "no queued click expected");
        Some(command)
    }

    fn selected_arcs(view: &RouteMapDataView) -> Vec<&str> {
        view.arcs
            .values()
            .filter(|a| a.selected)
            .map(|a| a.market.as_str())
            .collect()
    }

    fn selected_markers(view: &RouteMapDataView) -> Vec<&str> {
        view.markers
            .values()
            .filter(|m| m.selected)
            .map(|m| m.code.as_str())
            .collect()
    }

    #[test]
    fn arc_click_selects_arc_and_endpoints() {
        let mut view = sample_view();
        let mut machine = SelectionMachine::new();

        let command = roundtrip(&mut machine, &mut view, ClickTarget::Arc("C".into()), false)
            .expect("command issued");
        match command {
            SelectionCommand::Select {
                ids, multi_select, ..
            } => {
                assert_eq!(ids, vec![SelectionId(2)]);
                assert!(!multi_select);
            }
            other => panic!("expected Select, got {other:?}"),
        }

        assert_eq!(selected_arcs(&view), vec!["C"]);
        assert_eq!(selected_markers(&view), vec!["M4", "M5"]);
        assert!(!machine.first_click_of_gesture());
    }

    #[test]
    fn arc_click_cascades_to_arcs_sharing_an_endpoint() {
        let mut view = sample_view();
        let mut machine = SelectionMachine::new();

        roundtrip(&mut machine, &mut view, ClickTarget::Arc("A".into()), false);

        // B shares M1 with A and takes M1's state; B's far marker M3 does not.
        assert_eq!(selected_arcs(&view), vec!["A", "B"]);
        assert_eq!(selected_markers(&view), vec!["M1", "M2"]);
    }

    #[test]
    fn second_click_moves_the_selection() {
        let mut view = sample_view();
        let mut machine = SelectionMachine::new();

        roundtrip(&mut machine, &mut view, ClickTarget::Arc("C".into()), false);
        roundtrip(&mut machine, &mut view, ClickTarget::Arc("A".into()), false);

        assert_eq!(selected_arcs(&view), vec!["A", "B"]);
        assert_eq!(selected_markers(&view), vec!["M1", "M2"]);
        assert!(!view.arcs["C"].selected);
        assert!(!view.markers["M4"].selected);
        assert!(!view.markers["M5"].selected);
    }

    #[test]
    fn clicking_a_selected_arc_without_multi_select_is_ignored() {
        let mut view = sample_view();
        let mut machine = SelectionMachine::new();

        roundtrip(&mut machine, &mut view, ClickTarget::Arc("C".into()), false);
        let before = view.clone();

        let command = machine.on_click(&view, click(ClickTarget::Arc("C".into()), false));
        assert!(command.is_none());
        assert_eq!(view, before);
        assert!(machine.is_idle());
    }

    #[test]
    fn multi_select_accumulates_after_the_first_click() {
        let mut view = sample_view();
        let mut machine = SelectionMachine::new();

        roundtrip(&mut machine, &mut view, ClickTarget::Arc("C".into()), true);
        assert!(!machine.first_click_of_gesture());

        roundtrip(&mut machine, &mut view, ClickTarget::Arc("A".into()), true);

        let arcs = selected_arcs(&view);
        assert!(arcs.contains(&"A") && arcs.contains(&"C"));
        assert!(view.markers["M4"].selected && view.markers["M1"].selected);
    }

    #[test]
    fn multi_select_toggle_deselects_a_selected_arc() {
        let mut view = sample_view();
        let mut machine = SelectionMachine::new();

        roundtrip(&mut machine, &mut view, ClickTarget::Arc("C".into()), false);
        roundtrip(&mut machine, &mut view, ClickTarget::Arc("C".into()), true);

        assert!(!view.arcs["C"].selected);
        assert!(!view.markers["M4"].selected);
        assert!(!view.markers["M5"].selected);
    }

    #[test]
    fn marker_click_requests_all_arcs_when_unselected() {
        let mut view = sample_view();
        let mut machine = SelectionMachine::new();

        let command = machine
            .on_click(&view, click(ClickTarget::Marker("M1".into()), false))
            .expect("command issued");
        match &command {
            SelectionCommand::Select { ids, .. } => {
                assert_eq!(ids, &vec![SelectionId(0), SelectionId(1)]);
            }
            other => panic!("expected Select, got {other:?}"),
        }
        machine.on_reply(&mut view, SelectionReply::Acknowledged(command.token()));

        assert_eq!(selected_arcs(&view), vec!["A", "B"]);
        // One extra hop: the far markers of A and B follow their arcs.
        assert_eq!(selected_markers(&view), vec!["M1", "M2", "M3"]);
    }

    #[test]
    fn selected_marker_requests_only_its_selected_arcs() {
        let mut view = sample_view();
        let mut machine = SelectionMachine::new();

        roundtrip(&mut machine, &mut view, ClickTarget::Marker("M1".into()), false);
        view.arcs.get_mut("B").expect("arc B").selected = false;

        let command = machine
            .on_click(&view, click(ClickTarget::Marker("M1".into()), true))
            .expect("command issued");
        match command {
            SelectionCommand::Select { ids, .. } => assert_eq!(ids, vec![SelectionId(0)]),
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn background_click_clears_everything_and_resets_the_gesture() {
        let mut view = sample_view();
        let mut machine = SelectionMachine::new();

        roundtrip(&mut machine, &mut view, ClickTarget::Arc("C".into()), false);
        assert!(!machine.first_click_of_gesture());

        let command = machine
            .on_click(&view, click(ClickTarget::Background, false))
            .expect("clear issued");
        assert!(matches!(command, SelectionCommand::Clear { .. }));
        let outcome = machine.on_reply(&mut view, SelectionReply::Acknowledged(command.token()));

        assert!(selected_arcs(&view).is_empty());
        assert!(selected_markers(&view).is_empty());
        assert!(machine.first_click_of_gesture());
        // Every drawable was restyled to the deselected style.
        assert_eq!(outcome.styles.len(), view.arcs.len() * 2 + view.markers.len());
        assert!(outcome.styles.iter().all(|s| !s.selected));
    }

    #[test]
    fn background_click_without_selection_is_a_no_op() {
        let view = sample_view();
        let mut machine = SelectionMachine::new();
        assert!(
            machine
                .on_click(&view, click(ClickTarget::Background, false))
                .is_none()
        );
        assert!(
            machine
                .on_click(&view, click(ClickTarget::Background, true))
                .is_none()
        );
    }

    #[test]
    fn overlapping_clicks_are_serialized() {
        let mut view = sample_view();
        let mut machine = SelectionMachine::new();

        let first = machine
            .on_click(&view, click(ClickTarget::Arc("A".into()), false))
            .expect("first command");
        // Second click lands before the first reply: it must queue.
        assert!(
            machine
                .on_click(&view, click(ClickTarget::Arc("C".into()), false))
                .is_none()
        );

        let outcome = machine.on_reply(&mut view, SelectionReply::Acknowledged(first.token()));
        assert!(view.arcs["A"].selected);
        let second = outcome.command.expect("queued click promoted");
        match &second {
            SelectionCommand::Select { ids, .. } => assert_eq!(ids, &vec![SelectionId(2)]),
            other => panic!("expected Select, got {other:?}"),
        }

        let outcome = machine.on_reply(&mut view, SelectionReply::Acknowledged(second.token()));
        assert!(outcome.command.is_none());
        assert_eq!(selected_arcs(&view), vec!["C"]);
        assert!(machine.is_idle());
    }

    #[test]
    fn failed_reply_leaves_state_untouched() {
        let mut view = sample_view();
        let mut machine = SelectionMachine::new();

        let command = machine
            .on_click(&view, click(ClickTarget::Arc("A".into()), false))
            .expect("command issued");
        let before = view.clone();
        let outcome = machine.on_reply(&mut view, SelectionReply::Failed(command.token()));

        assert!(outcome.styles.is_empty());
        assert_eq!(view, before);
        assert!(machine.first_click_of_gesture());
        assert!(machine.is_idle());
    }

    #[test]
    fn mismatched_reply_token_keeps_waiting() {
        let mut view = sample_view();
        let mut machine = SelectionMachine::new();

        let command = machine
            .on_click(&view, click(ClickTarget::Arc("A".into()), false))
            .expect("command issued");
        let stale = SelectionReply::Acknowledged(super::RequestToken(command.token().0 + 40));
        let outcome = machine.on_reply(&mut view, stale);
        assert!(outcome.styles.is_empty());
        assert!(!view.arcs["A"].selected);

        let outcome = machine.on_reply(&mut view, SelectionReply::Acknowledged(command.token()));
        assert!(!outcome.styles.is_empty());
        assert!(view.arcs["A"].selected);
    }
}
