//! The session form's field catalog.
//!
//! Order matters: it is the column order of the generated INSERT and the
//! display order of `form show`.

/// Allowed range and precision of a number spinner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
    pub decimals: u32,
}

impl NumberRange {
    const fn new(min: f64, max: f64, decimals: u32) -> Self {
        Self { min, max, decimals }
    }

    /// Round a value to this range's precision
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimals as i32);
        (value * factor).round() / factor
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_integral(&self) -> bool {
        self.decimals == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text { max_len: Option<usize> },
    /// Multi-line free text
    Notes,
    YesNo,
    Number(NumberRange),
    Date,
    Time,
}

impl FieldKind {
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Text { max_len: Some(max) } => format!("text (max {max})"),
            FieldKind::Text { max_len: None } => "text".to_string(),
            FieldKind::Notes => "notes".to_string(),
            FieldKind::YesNo => "yes/no".to_string(),
            FieldKind::Number(range) => format!(
                "number {:.*}..{:.*}",
                range.decimals as usize, range.min, range.decimals as usize, range.max
            ),
            FieldKind::Date => "date (YYYY-MM-DD)".to_string(),
            FieldKind::Time => "time (HH:MM)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    SessionInfo,
    AnimalCare,
    Experiment,
    Hardware,
    Notes,
}

impl FieldGroup {
    pub fn title(&self) -> &'static str {
        match self {
            FieldGroup::SessionInfo => "Session Info",
            FieldGroup::AnimalCare => "Animal Care",
            FieldGroup::Experiment => "Experiment",
            FieldGroup::Hardware => "Hardware / Setup",
            FieldGroup::Notes => "Notes",
        }
    }

    pub fn all() -> [FieldGroup; 5] {
        [
            FieldGroup::SessionInfo,
            FieldGroup::AnimalCare,
            FieldGroup::Experiment,
            FieldGroup::Hardware,
            FieldGroup::Notes,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Key used on the command line and in the draft file
    pub key: &'static str,
    /// Column name in the monkeyLog table
    pub column: &'static str,
    pub label: &'static str,
    pub group: FieldGroup,
    pub kind: FieldKind,
}

const fn field(
    key: &'static str,
    column: &'static str,
    label: &'static str,
    group: FieldGroup,
    kind: FieldKind,
) -> FieldSpec {
    FieldSpec {
        key,
        column,
        label,
        group,
        kind,
    }
}

const TEXT: FieldKind = FieldKind::Text { max_len: None };
const AMOUNT: FieldKind = FieldKind::Text { max_len: Some(14) };
const TRIALS: FieldKind = FieldKind::Number(NumberRange::new(0.0, 99999.0, 0));

use FieldGroup::*;

pub const FIELDS: &[FieldSpec] = &[
    field("subject", "Subject", "Subject", SessionInfo, TEXT),
    field("experiment_date", "ExperimentDate", "Experiment Date", SessionInfo, FieldKind::Date),
    field("trainer", "Trainer", "Trainer", SessionInfo, TEXT),
    field("water", "Water", "Water", AnimalCare, AMOUNT),
    field(
        "weight",
        "Weight",
        "Weight (kg)",
        AnimalCare,
        FieldKind::Number(NumberRange::new(0.0, 50.0, 2)),
    ),
    field("enrichment", "Enrichment", "Enrichment", AnimalCare, TEXT),
    field("fruit_vegetable", "FruitVegetable", "Fruit / Vegetable", AnimalCare, TEXT),
    field("trained", "Trained", "Trained", Experiment, FieldKind::YesNo),
    field("start_time", "StartTime", "Start Time", Experiment, FieldKind::Time),
    field("end_time", "EndTime", "End Time", Experiment, FieldKind::Time),
    field("task", "Task", "Task", Experiment, TEXT),
    field("total_trials", "TotalTrials", "Total Trials", Experiment, TRIALS),
    field("successful_trials", "SuccessfulTrials", "Successful Trials", Experiment, TRIALS),
    field(
        "success_rate",
        "SuccessRate",
        "Success Rate (%)",
        Experiment,
        FieldKind::Number(NumberRange::new(0.0, 100.0, 2)),
    ),
    field("parameter_file", "ParameterFile", "Parameter File", Experiment, TEXT),
    field("tank", "Tank", "Tank", Experiment, TEXT),
    field("controller", "Controller", "Controller", Experiment, TEXT),
    field("experiment_stage", "ExperimentStage", "Experiment Stage", Experiment, TEXT),
    field("task_arm", "TaskArm", "Task Arm", Experiment, TEXT),
    field("implant", "Implant", "Implant", Hardware, TEXT),
    field("health_notes", "HealthNotes", "Health Notes", Notes, FieldKind::Notes),
    field("system_notes", "SystemNotes", "System Notes", Notes, FieldKind::Notes),
    field("notes", "Notes", "General Notes", Notes, FieldKind::Notes),
    field("cleaned_margins", "CleanedMargins", "Cleaned Margins", AnimalCare, FieldKind::YesNo),
    field("trimmed_hair", "TrimmedHair", "Trimmed Hair", AnimalCare, FieldKind::YesNo),
    field("eyes_tracked", "EyesTracked", "Eyes Tracked", Hardware, FieldKind::YesNo),
    field("publish_quality", "PublishQuality", "Publish Quality", Hardware, FieldKind::YesNo),
    field(
        "rig",
        "Rig",
        "Rig",
        SessionInfo,
        FieldKind::Number(NumberRange::new(0.0, 99.0, 0)),
    ),
    field("extra_water", "ExtraWater", "Extra Water", AnimalCare, AMOUNT),
];

/// The one field a submission cannot go without
pub const REQUIRED_DATE: &str = "experiment_date";

/// Look up a field by its key
pub fn find(key: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_keys_and_columns_are_unique() {
        let keys: HashSet<_> = FIELDS.iter().map(|f| f.key).collect();
        let columns: HashSet<_> = FIELDS.iter().map(|f| f.column).collect();
        assert_eq!(keys.len(), FIELDS.len());
        assert_eq!(columns.len(), FIELDS.len());
        assert_eq!(FIELDS.len(), 29);
    }

    #[test]
    fn required_date_is_a_date_field() {
        let spec = find(REQUIRED_DATE).unwrap();
        assert_eq!(spec.kind, FieldKind::Date);
        assert_eq!(spec.column, "ExperimentDate");
    }

    #[test]
    fn number_range_rounds_to_decimals() {
        let range = NumberRange::new(0.0, 50.0, 2);
        assert_eq!(range.round(12.3456), 12.35);
        let whole = NumberRange::new(0.0, 99.0, 0);
        assert_eq!(whole.round(3.6), 4.0);
        assert!(whole.is_integral());
        assert!(!range.contains(50.01));
    }

    #[test]
    fn every_group_has_fields() {
        for group in FieldGroup::all() {
            assert!(FIELDS.iter().any(|f| f.group == group), "{}", group.title());
        }
    }
}
