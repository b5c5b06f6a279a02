use crate::towers::model::Radio;
use crate::ui::controls::OperatorSelect;
use crate::view::MapView;

/// Keeps the radio checkboxes and operator dropdown in step with the map.
///
/// Filter state lives in the controls; nothing here caches it.
pub struct FilterSync<S> {
    select: S,
}

impl<S: OperatorSelect> FilterSync<S> {
    pub fn new(select: S) -> Self {
        Self { select }
    }

    /// Checkbox for `radio` changed. Returns `false` for radio values
    /// without a marker group.
    pub fn on_radio_toggled(&self, view: &mut MapView, radio: &str, checked: bool) -> bool {
        let shown = view.set_radio_visible(&Radio::from(radio), checked);
        if !shown {
            log::debug!("no marker group for radio '{}'", radio);
        }
        shown
    }

    /// Dropdown selection changed
    pub fn on_operator_changed(&self, view: &mut MapView) {
        view.filter_by_operator(&self.select.selected());
    }

    /// Repopulates the dropdown from the towers currently plotted
    pub fn refresh_operator_dropdown(&mut self, view: &MapView) {
        let operators = view.unique_operators();
        log::debug!("operator dropdown: {} operators", operators.len());
        self.select.set_options(&operators);
    }

    pub fn select(&self) -> &S {
        &self.select
    }

    pub fn select_mut(&mut self) -> &mut S {
        &mut self.select
    }
}
