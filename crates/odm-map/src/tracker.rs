//! Selection tracking for the field-to-variable mapping workflow.
//!
//! The tracker flattens the workbook into a linear slot list: one slot
//! per sheet header followed by one slot per field, in sheet order.
//! Three assignment vectors (event, form, variable) run parallel to the
//! slot list and fill in as the user advances through the selection
//! stages. [`SelectionTracker::finalize`] derives the maps the reshaper
//! and document builder consume.

use std::collections::BTreeMap;

use tracing::debug;

use odm_model::{
    ChosenSelection, FormVariables, Selection, SelectionMapping, SheetFields, Workbook,
};

/// Role of one position in the flattened sheet/field list.
///
/// The four-way split matters downstream: chosen values are collected
/// from `FieldSlot` positions only, and sheet-level propagation is
/// bounded by `SheetMarker` positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Header of a sheet with at least one checked field.
    SheetMarker { sheet: String },
    /// A checked field awaiting (or holding) a choice.
    FieldSlot { sheet: String, field: String },
    /// Header of a sheet with no checked fields, and everything under it.
    EmptySheet,
    /// An unchecked field under a marked sheet.
    EmptyField,
}

/// The three selection stages, in the order the user completes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Events,
    Forms,
    Variables,
}

#[derive(Debug, Clone)]
pub struct SelectionTracker {
    slots: Vec<Slot>,
    events: Vec<Option<String>>,
    forms: Vec<Option<String>>,
    variables: Vec<Option<String>>,
}

impl SelectionTracker {
    /// Build the slot list from the workbook outline and the checked
    /// (sheet, field) pairs.
    pub fn new(workbook: &Workbook, checked: &[SheetFields]) -> Self {
        let mut slots = Vec::new();
        for sheet in &workbook.sheets {
            let checked_fields = checked
                .iter()
                .find(|entry| entry.sheet == sheet.name)
                .map(|entry| entry.fields.as_slice())
                .unwrap_or(&[]);
            let marked = sheet
                .fields()
                .iter()
                .any(|field| checked_fields.iter().any(|checked| checked == field));
            if marked {
                slots.push(Slot::SheetMarker {
                    sheet: sheet.name.clone(),
                });
            } else {
                slots.push(Slot::EmptySheet);
            }
            for field in sheet.fields() {
                if checked_fields.iter().any(|checked| checked == field) {
                    slots.push(Slot::FieldSlot {
                        sheet: sheet.name.clone(),
                        field: field.to_string(),
                    });
                } else if marked {
                    slots.push(Slot::EmptyField);
                } else {
                    slots.push(Slot::EmptySheet);
                }
            }
        }
        let len = slots.len();
        Self {
            slots,
            events: vec![None; len],
            forms: vec![None; len],
            variables: vec![None; len],
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn assignments(&self, stage: Stage) -> &[Option<String>] {
        match stage {
            Stage::Events => &self.events,
            Stage::Forms => &self.forms,
            Stage::Variables => &self.variables,
        }
    }

    /// Slot index of a sheet's marker, if the sheet has checked fields.
    pub fn marker_index(&self, sheet: &str) -> Option<usize> {
        self.slots.iter().position(
            |slot| matches!(slot, Slot::SheetMarker { sheet: name } if name == sheet),
        )
    }

    /// Slot index of a checked field.
    pub fn field_index(&self, sheet: &str, field: &str) -> Option<usize> {
        self.slots.iter().position(|slot| {
            matches!(slot, Slot::FieldSlot { sheet: s, field: f } if s == sheet && f == field)
        })
    }

    /// Assign a value at a slot.
    ///
    /// At a `SheetMarker` the value propagates to every following
    /// `FieldSlot` up to the next `SheetMarker` or the end of the list,
    /// overwriting prior per-field choices. At a `FieldSlot` only that
    /// slot is set. Other slots ignore the assignment.
    pub fn assign(&mut self, stage: Stage, index: usize, value: &str) {
        let Some(slot) = self.slots.get(index) else {
            return;
        };
        match slot {
            Slot::SheetMarker { sheet } => {
                debug!(sheet = %sheet, ?stage, value, "propagating sheet-level choice");
                let targets: Vec<usize> = self.slots[index + 1..]
                    .iter()
                    .enumerate()
                    .take_while(|(_, slot)| !matches!(slot, Slot::SheetMarker { .. }))
                    .filter(|(_, slot)| matches!(slot, Slot::FieldSlot { .. }))
                    .map(|(offset, _)| index + 1 + offset)
                    .collect();
                let assignments = self.assignments_mut(stage);
                for target in targets {
                    assignments[target] = Some(value.to_string());
                }
            }
            Slot::FieldSlot { .. } => {
                self.assignments_mut(stage)[index] = Some(value.to_string());
            }
            Slot::EmptySheet | Slot::EmptyField => {}
        }
    }

    /// Restore previously captured assignment vectors. Vectors shorter
    /// than the slot list leave the remainder unassigned.
    pub fn restore_assignments(
        &mut self,
        stage: Stage,
        values: &[Option<String>],
    ) {
        let assignments = self.assignments_mut(stage);
        for (slot, value) in assignments.iter_mut().zip(values.iter()) {
            slot.clone_from(value);
        }
    }

    /// True when at least one field slot has a value for the stage.
    pub fn stage_started(&self, stage: Stage) -> bool {
        self.assignments(stage).iter().any(Option::is_some)
    }

    /// The checked fields per sheet, in slot order. This is the
    /// selection the reshaper scans, available before any stage choices
    /// are made.
    pub fn selected_sheets(&self) -> Vec<SheetFields> {
        let mut selected: Vec<SheetFields> = Vec::new();
        for slot in &self.slots {
            if let Slot::FieldSlot { sheet, field } = slot {
                match selected.iter_mut().find(|entry| entry.sheet == *sheet) {
                    Some(entry) => entry.fields.push(field.clone()),
                    None => selected.push(SheetFields {
                        sheet: sheet.clone(),
                        fields: vec![field.clone()],
                    }),
                }
            }
        }
        selected
    }

    /// Derive the final selection state.
    ///
    /// Field slots with a missing choice at any stage are skipped rather
    /// than rejected; downstream treats the absence as "no value".
    pub fn finalize(&self) -> Selection {
        let mut chosen = ChosenSelection::default();
        let mut mapping = SelectionMapping::default();

        for (idx, slot) in self.slots.iter().enumerate() {
            let Slot::FieldSlot { sheet, field } = slot else {
                continue;
            };
            if let Some(event) = &self.events[idx] {
                push_unique(&mut chosen.events, event);
            }
            if let Some(form) = &self.forms[idx] {
                push_unique(&mut chosen.forms, form);
            }
            if let Some(variable) = &self.variables[idx] {
                push_unique(&mut chosen.variables, variable);
                mapping.bind(sheet, field, variable);
            }
        }

        for form in &chosen.forms {
            let mut variables: Vec<String> = Vec::new();
            for (idx, slot) in self.slots.iter().enumerate() {
                if !matches!(slot, Slot::FieldSlot { .. }) {
                    continue;
                }
                if self.forms[idx].as_deref() == Some(form.as_str()) {
                    if let Some(variable) = &self.variables[idx] {
                        push_unique(&mut variables, variable);
                    }
                }
            }
            chosen.form_variables.push(FormVariables {
                form: form.clone(),
                variables,
            });
        }

        let mut occurrence: BTreeMap<String, usize> = BTreeMap::new();
        for (idx, slot) in self.slots.iter().enumerate() {
            if !matches!(slot, Slot::FieldSlot { .. }) {
                continue;
            }
            if let Some(form) = &self.forms[idx] {
                *occurrence.entry(form.clone()).or_insert(0) += 1;
            }
        }
        chosen.form_occurrence = occurrence;

        Selection { mapping, chosen }
    }

    fn assignments_mut(&mut self, stage: Stage) -> &mut Vec<Option<String>> {
        match stage {
            Stage::Events => &mut self.events,
            Stage::Forms => &mut self.forms,
            Stage::Variables => &mut self.variables,
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
