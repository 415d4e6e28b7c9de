//! Best-effort password field filling.
//!
//! Hosts that can see a live form (a browser extension, an accessibility
//! bridge, a test double) implement [`Page`]; [`fill`] picks the most likely
//! password field and populates it. Finding nothing is a normal outcome.

/// The `type` attribute of an input element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    Password,
    /// `type="text"` or no type attribute.
    Text,
    Other(String),
}

/// Snapshot of one input element on the page.
#[derive(Debug, Clone)]
pub struct Field {
    pub kind: InputKind,
    pub name: String,
    pub id: String,
    pub visible: bool,
    pub disabled: bool,
    pub read_only: bool,
}

impl Field {
    pub fn new(kind: InputKind) -> Self {
        Self {
            kind,
            name: String::new(),
            id: String::new(),
            visible: true,
            disabled: false,
            read_only: false,
        }
    }

    fn is_password(&self) -> bool {
        self.kind == InputKind::Password
    }

    fn is_editable(&self) -> bool {
        self.visible && !self.disabled && !self.read_only
    }

    fn looks_like_password(&self) -> bool {
        let name = self.name.to_lowercase();
        let id = self.id.to_lowercase();
        ["pass", "pwd"]
            .iter()
            .any(|hint| name.contains(hint) || id.contains(hint))
    }
}

/// Notifications dispatched after a value is set, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    Input,
    Change,
    Blur,
}

/// A host document exposing its input elements by index.
pub trait Page {
    fn fields(&self) -> &[Field];

    /// Index of the focused element, if it is an input.
    fn focused(&self) -> Option<usize>;

    fn focus(&mut self, index: usize);

    fn set_value(&mut self, index: usize, value: &str);

    fn dispatch(&mut self, index: usize, event: FieldEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    Filled(usize),
    NotFound,
}

/// Chooses the field to fill, most specific match first.
pub fn locate(page: &impl Page) -> Option<usize> {
    let fields = page.fields();

    page.focused()
        .filter(|&i| i < fields.len())
        .or_else(|| {
            fields
                .iter()
                .position(|f| f.is_password() && f.is_editable())
        })
        .or_else(|| {
            fields
                .iter()
                .position(|f| f.kind == InputKind::Text && f.visible && f.looks_like_password())
        })
        .or_else(|| fields.iter().position(Field::is_password))
}

/// Writes `code` into the located field and fires input, change and blur.
pub fn fill(page: &mut impl Page, code: &str) -> FillOutcome {
    let Some(index) = locate(&*page) else {
        tracing::debug!(fields = page.fields().len(), "no password field found");
        return FillOutcome::NotFound;
    };

    page.focus(index);
    page.set_value(index, code);
    for event in [FieldEvent::Input, FieldEvent::Change, FieldEvent::Blur] {
        page.dispatch(index, event);
    }

    tracing::debug!(index, "filled password field");
    FillOutcome::Filled(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakePage {
        fields: Vec<Field>,
        focused: Option<usize>,
        values: Vec<(usize, String)>,
        events: Vec<(usize, FieldEvent)>,
        focus_calls: Vec<usize>,
    }

    impl Page for FakePage {
        fn fields(&self) -> &[Field] {
            &self.fields
        }

        fn focused(&self) -> Option<usize> {
            self.focused
        }

        fn focus(&mut self, index: usize) {
            self.focus_calls.push(index);
        }

        fn set_value(&mut self, index: usize, value: &str) {
            self.values.push((index, value.to_string()));
        }

        fn dispatch(&mut self, index: usize, event: FieldEvent) {
            self.events.push((index, event));
        }
    }

    fn named(kind: InputKind, name: &str) -> Field {
        Field {
            name: name.to_string(),
            ..Field::new(kind)
        }
    }

    #[test]
    fn focused_input_wins() {
        let mut page = FakePage {
            fields: vec![Field::new(InputKind::Password), Field::new(InputKind::Text)],
            focused: Some(1),
            ..Default::default()
        };
        assert_eq!(fill(&mut page, "c507"), FillOutcome::Filled(1));
        assert_eq!(page.values, vec![(1, "c507".to_string())]);
    }

    #[test]
    fn editable_password_field_is_preferred() {
        let hidden = Field {
            visible: false,
            ..Field::new(InputKind::Password)
        };
        let read_only = Field {
            read_only: true,
            ..Field::new(InputKind::Password)
        };
        let page = FakePage {
            fields: vec![
                Field::new(InputKind::Text),
                hidden,
                read_only,
                Field::new(InputKind::Password),
            ],
            ..Default::default()
        };
        assert_eq!(locate(&page), Some(3));
    }

    #[test]
    fn text_field_named_like_password_is_next() {
        let page = FakePage {
            fields: vec![
                named(InputKind::Text, "username"),
                Field {
                    id: "UserPwd".to_string(),
                    ..Field::new(InputKind::Text)
                },
                named(InputKind::Text, "passcode"),
            ],
            ..Default::default()
        };
        assert_eq!(locate(&page), Some(1));
    }

    #[test]
    fn hidden_password_field_is_last_resort() {
        let disabled = Field {
            disabled: true,
            ..Field::new(InputKind::Password)
        };
        let page = FakePage {
            fields: vec![named(InputKind::Text, "email"), disabled],
            ..Default::default()
        };
        assert_eq!(locate(&page), Some(1));
    }

    #[test]
    fn other_input_kinds_are_ignored_by_name_match() {
        let page = FakePage {
            fields: vec![named(InputKind::Other("email".into()), "password")],
            ..Default::default()
        };
        assert_eq!(locate(&page), None);
    }

    #[test]
    fn nothing_found_reports_not_found() {
        let mut page = FakePage {
            fields: vec![named(InputKind::Text, "search")],
            ..Default::default()
        };
        assert_eq!(fill(&mut page, "abc"), FillOutcome::NotFound);
        assert!(page.values.is_empty());
        assert!(page.events.is_empty());
    }

    #[test]
    fn fill_focuses_then_dispatches_in_order() {
        let mut page = FakePage {
            fields: vec![Field::new(InputKind::Password)],
            ..Default::default()
        };
        fill(&mut page, "abc");
        assert_eq!(page.focus_calls, vec![0]);
        assert_eq!(
            page.events,
            vec![
                (0, FieldEvent::Input),
                (0, FieldEvent::Change),
                (0, FieldEvent::Blur)
            ]
        );
    }

    #[test]
    fn stale_focus_index_is_ignored() {
        let page = FakePage {
            fields: vec![Field::new(InputKind::Password)],
            focused: Some(7),
            ..Default::default()
        };
        assert_eq!(locate(&page), Some(0));
    }
}
