//! Small in-memory datasets for unit tests.

use crate::error::LoadError;

use super::model::{Dataset, SchemaMode};

/// Every known field (in `Field::ALL` order) plus two extra numeric columns.
pub const HEADERS: [&str; 17] = [
    "Department",
    "JobRole",
    "Gender",
    "OverTime",
    "Attrition",
    "BusinessTravel",
    "WorkLifeBalance",
    "JobSatisfaction",
    "EnvironmentSatisfaction",
    "PerformanceRating",
    "RelationshipSatisfaction",
    "TrainingTimesLastYear",
    "Age",
    "MonthlyIncome",
    "YearsAtCompany",
    "DistanceFromHome",
    "EmployeeCount",
];

/// A row matching the first fifteen [`HEADERS`].
pub const DEFAULT_ROW: [&str; 15] = [
    "Sales",
    "Sales Executive",
    "Male",
    "No",
    "No",
    "Travel_Rarely",
    "3",
    "3",
    "3",
    "3",
    "3",
    "2",
    "35",
    "5000",
    "5",
];

#[rustfmt::skip]
const EMPLOYEES: [[&str; 17]; 8] = [
    ["Sales", "Sales Executive", "Male", "Yes", "Yes", "Travel_Frequently", "1", "1", "2", "3", "1", "2", "28", "4000", "2", "20", "1"],
    ["Sales", "Sales Executive", "Female", "No", "No", "Travel_Rarely", "3", "4", "3", "3", "3", "3", "41", "6000", "10", "5", "1"],
    ["Sales", "Manager", "Male", "No", "No", "Travel_Rarely", "3", "3", "4", "4", "4", "2", "50", "15000", "20", "2", "1"],
    ["R&D", "Research Scientist", "Female", "Yes", "Yes", "Travel_Rarely", "2", "2", "1", "3", "2", "3", "25", "3000", "1", "15", "1"],
    ["R&D", "Research Scientist", "Male", "No", "No", "Non-Travel", "3", "4", "4", "3", "3", "2", "37", "3500", "7", "3", "1"],
    ["R&D", "Laboratory Technician", "Female", "Yes", "No", "Travel_Rarely", "2", "3", "3", "4", "4", "4", "33", "3200", "5", "9", "1"],
    ["Human Resources", "Human Resources", "Female", "No", "Yes", "Travel_Frequently", "1", "1", "1", "3", "2", "0", "30", "2800", "3", "25", "1"],
    ["Human Resources", "Manager", "Male", "No", "No", "Non-Travel", "4", "4", "3", "3", "4", "3", "45", "12000", "15", "1", "1"],
];

pub fn try_dataset(
    headers: &[&str],
    rows: &[&[&str]],
    mode: SchemaMode,
) -> Result<Dataset, LoadError> {
    let headers = headers.iter().map(|h| h.to_string()).collect();
    let rows = rows
        .iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect();
    Dataset::from_text_rows(headers, rows, mode)
}

/// Lenient dataset from literal rows; panics on invalid input.
pub fn dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
    try_dataset(headers, rows, SchemaMode::Lenient).expect("fixture dataset")
}

/// Eight employees covering every known field, loaded in strict mode.
pub fn employees() -> Dataset {
    let rows: Vec<&[&str]> = EMPLOYEES.iter().map(|r| r.as_slice()).collect();
    try_dataset(&HEADERS, &rows, SchemaMode::Strict).expect("employee fixture")
}
