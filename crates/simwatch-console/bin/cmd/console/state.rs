/// Represents which UI component has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Form,
    Logs,
    Inspect,
}

/// Editable fields of the request form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    SwLat,
    SwLng,
    NeLat,
    NeLng,
    PilotQuery,
    SubscriptionId,
}

impl FormField {
    pub(crate) const ALL: [FormField; 6] = [
        FormField::SwLat,
        FormField::SwLng,
        FormField::NeLat,
        FormField::NeLng,
        FormField::PilotQuery,
        FormField::SubscriptionId,
    ];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            FormField::SwLat => "SW lat",
            FormField::SwLng => "SW lng",
            FormField::NeLat => "NE lat",
            FormField::NeLng => "NE lng",
            FormField::PilotQuery => "Query",
            FormField::SubscriptionId => "Object id",
        }
    }

    fn position(self) -> usize {
        self as usize
    }

    pub(crate) fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub(crate) fn previous(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub(crate) fn is_bounds(&self) -> bool {
        matches!(
            self,
            FormField::SwLat | FormField::SwLng | FormField::NeLat | FormField::NeLng
        )
    }
}

/// Raw text of the request form. Nothing is validated until submit.
#[derive(Debug)]
pub(crate) struct FormState {
    values: [String; 6],
    pub(crate) focused: FormField,
    pub(crate) include_uncontrolled: bool,
}

impl FormState {
    pub(crate) fn new() -> Self {
        // Whole world until the user narrows it down
        Self {
            values: [
                "-90".to_string(),
                "-180".to_string(),
                "90".to_string(),
                "180".to_string(),
                String::new(),
                String::new(),
            ],
            focused: FormField::SwLat,
            include_uncontrolled: false,
        }
    }

    pub(crate) fn value(&self, field: FormField) -> &str {
        &self.values[field.position()]
    }

    pub(crate) fn push_char(&mut self, c: char) {
        self.values[self.focused.position()].push(c);
    }

    pub(crate) fn pop_char(&mut self) {
        self.values[self.focused.position()].pop();
    }

    pub(crate) fn clear_focused(&mut self) {
        self.values[self.focused.position()].clear();
    }

    pub(crate) fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub(crate) fn focus_previous(&mut self) {
        self.focused = self.focused.previous();
    }

    /// Raw SW lat, SW lng, NE lat, NE lng
    pub(crate) fn bounds_input(&self) -> [&str; 4] {
        [
            self.value(FormField::SwLat),
            self.value(FormField::SwLng),
            self.value(FormField::NeLat),
            self.value(FormField::NeLng),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = FormState::new();
        for _ in 0..FormField::ALL.len() {
            form.focus_next();
        }
        assert_eq!(form.focused, FormField::SwLat);

        form.focus_previous();
        assert_eq!(form.focused, FormField::SubscriptionId);
        assert!(!form.focused.is_bounds());
    }

    #[test]
    fn test_editing_focused_field() {
        let mut form = FormState::new();
        form.focused = FormField::PilotQuery;
        for c in "N123ABX".chars() {
            form.push_char(c);
        }
        form.pop_char();
        assert_eq!(form.value(FormField::PilotQuery), "N123AB");
        assert_eq!(form.value(FormField::SwLat), "-90");

        form.clear_focused();
        assert_eq!(form.value(FormField::PilotQuery), "");
    }

    #[test]
    fn test_bounds_input_order() {
        let mut form = FormState::new();
        assert_eq!(form.bounds_input(), ["-90", "-180", "90", "180"]);

        form.focused = FormField::NeLat;
        form.clear_focused();
        form.push_char('x');
        assert_eq!(form.bounds_input(), ["-90", "-180", "x", "180"]);
    }
}
