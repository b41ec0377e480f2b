//! Headquarter picker in the top bar

use sede_core::{encode_selection, Preference, ALL_HEADQUARTERS};
use tracing::debug;

use crate::error::{Error, Result};
use crate::selection::HeadquarterSelection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    /// `"all"` or the decimal id
    pub value: String,
    pub label: String,
}

pub struct HeadquarterPicker {
    selection: HeadquarterSelection,
}

impl HeadquarterPicker {
    pub fn new(selection: HeadquarterSelection) -> Self {
        Self { selection }
    }

    /// "All locations" followed by the directory, in backend order
    pub fn options(&self) -> Vec<PickerOption> {
        let directory = self.selection.headquarters();
        let mut options = Vec::with_capacity(directory.len() + 1);
        options.push(PickerOption {
            value: ALL_HEADQUARTERS.to_string(),
            label: "All locations".to_string(),
        });
        options.extend(directory.iter().map(|hq| PickerOption {
            value: hq.id.to_string(),
            label: hq.name.clone(),
        }));
        options
    }

    pub fn current_value(&self) -> String {
        encode_selection(self.selection.selected_headquarter_id())
    }

    /// Apply a picked value (`"all"` or an id)
    pub fn on_headquarter_change(&self, value: &str) -> Result<()> {
        let selected = match Preference::parse(Some(value)) {
            Preference::All => None,
            Preference::One(id) => Some(id),
            Preference::Unset => {
                return Err(Error::Input(format!("not a headquarter: {value:?}")));
            }
        };
        debug!(value, "Picker changed");
        self.selection.set_selected_headquarter(selected)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::tests::{two_locations, FakeDirectory};
    use crate::viewmodel::tests::selection_with;

    #[tokio::test]
    async fn test_options_and_change() {
        let (selection, _) = selection_with(FakeDirectory::new(two_locations()));
        selection.ensure_loaded().await.unwrap();
        let picker = HeadquarterPicker::new(selection.clone());

        let values: Vec<_> = picker.options().into_iter().map(|o| o.value).collect();
        assert_eq!(values, ["all", "1", "2"]);
        assert_eq!(picker.current_value(), "1");

        picker.on_headquarter_change("all").unwrap();
        assert_eq!(selection.selected_headquarter_id(), None);
        picker.on_headquarter_change("2").unwrap();
        assert_eq!(picker.current_value(), "2");

        assert!(picker.on_headquarter_change("north").is_err());
        assert_eq!(selection.selected_headquarter_id(), Some(2));
    }
}
