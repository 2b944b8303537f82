//! CSV renderings of an initiative collection.

use crate::types::Initiative;

const EXPORT_HEADER: [&str; 10] = [
    "name",
    "state",
    "scheme",
    "category",
    "year",
    "progress",
    "schools",
    "students",
    "scholarships",
    "budget",
];

const LEGACY_HEADER: [&str; 11] = [
    "Initiative",
    "State",
    "Scheme",
    "Category",
    "Year",
    "Status",
    "Progress",
    "Schools Impacted",
    "Students Impacted",
    "Scholarships Awarded",
    "Budget Utilized (Cr)",
];

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_row<I, S>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let row: Vec<String> = fields.into_iter().map(|f| escape(f.as_ref())).collect();
    out.push_str(&row.join(","));
    out.push_str("\r\n");
}

/// Whole-number percentage, e.g. `0.73` → `73%`.
fn percent(progress: f64) -> String {
    format!("{:.0}%", progress * 100.0)
}

/// Decimal with at least one fractional digit, e.g. `12.0`, `7.35`.
fn decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// `/api/v1/exports/data.csv` body.
pub fn export_csv(initiatives: &[Initiative]) -> String {
    let mut out = String::new();
    push_row(&mut out, EXPORT_HEADER);
    for item in initiatives {
        push_row(
            &mut out,
            [
                item.name.clone(),
                item.state.clone(),
                item.scheme.clone(),
                item.category.clone(),
                item.year.to_string(),
                percent(item.progress),
                item.schools_impacted.to_string(),
                item.students_impacted.to_string(),
                item.scholarships_awarded.to_string(),
                decimal(item.budget_utilized),
            ],
        );
    }
    out
}

/// `/reports/download/` body: the legacy download layout including status.
pub fn legacy_report_csv(initiatives: &[Initiative]) -> String {
    let mut out = String::new();
    push_row(&mut out, LEGACY_HEADER);
    for item in initiatives {
        push_row(
            &mut out,
            [
                item.name.clone(),
                item.state.clone(),
                item.scheme.clone(),
                item.category.clone(),
                item.year.to_string(),
                item.status.clone(),
                percent(item.progress),
                item.schools_impacted.to_string(),
                item.students_impacted.to_string(),
                item.scholarships_awarded.to_string(),
                decimal(item.budget_utilized),
            ],
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Initiative {
        Initiative {
            id: 7,
            name: "GIAN - Goa".to_string(),
            state: "Goa".to_string(),
            scheme: "GIAN".to_string(),
            category: "Skill Development".to_string(),
            year: 2024,
            status: "On Track".to_string(),
            progress: 0.73,
            schools_impacted: 120,
            students_impacted: 9000,
            scholarships_awarded: 45,
            budget_utilized: 12.0,
        }
    }

    #[test]
    fn test_export_layout() {
        let csv = export_csv(&[sample()]);
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(
            lines[0],
            "name,state,scheme,category,year,progress,schools,students,scholarships,budget"
        );
        assert_eq!(lines[1], "GIAN - Goa,Goa,GIAN,Skill Development,2024,73%,120,9000,45,12.0");
        assert_eq!(lines[2], "");
    }

    #[test]
    fn test_legacy_layout_includes_status() {
        let csv = legacy_report_csv(&[sample()]);
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].starts_with("Initiative,State,Scheme"));
        assert!(lines[0].ends_with("Budget Utilized (Cr)"));
        assert_eq!(lines[1], "GIAN - Goa,Goa,GIAN,Skill Development,2024,On Track,73%,120,9000,45,12.0");
    }

    #[test]
    fn test_fields_are_quoted_when_needed() {
        let mut item = sample();
        item.name = "Odd, \"quoted\" name".to_string();
        item.budget_utilized = 7.35;
        let csv = export_csv(&[item]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Odd, \"\"quoted\"\" name\",Goa"));
        assert!(row.ends_with(",7.35"));
    }

    #[test]
    fn test_empty_collection_is_header_only() {
        assert_eq!(export_csv(&[]).lines().count(), 1);
    }
}
